use crate::{
    api::ResetPassword,
    context::AppContext,
    model::NewToast,
    navigation::Route,
    validation::{Fields, Rule, Schema},
};

use super::{submit, InFlight, RequestError, SubmitError, SubmitOutcome};

#[derive(Clone, Default, serde::Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl Fields for ResetPasswordForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "password" => Some(&self.password),
            "password_confirmation" => Some(&self.password_confirmation),
            _ => None,
        }
    }
}

pub fn schema() -> Schema {
    Schema::new()
        .field("password", [Rule::Required("Senha obrigatória")])
        .field(
            "password_confirmation",
            [Rule::Matches {
                field: "password",
                message: "Confirmação de senha incorreta",
            }],
        )
}

pub struct ResetPasswordPage {
    ctx: AppContext,
    in_flight: InFlight,
}

impl ResetPasswordPage {
    pub fn new(ctx: AppContext) -> ResetPasswordPage {
        ResetPasswordPage {
            ctx,
            in_flight: InFlight::default(),
        }
    }

    /// `token` comes from the `token` query parameter of the link the user
    /// got by e-mail.
    pub async fn handle_submit(&self, token: Option<&str>, form: &ResetPasswordForm) -> SubmitOutcome {
        let failure = NewToast::error("Erro ao resetar senha")
            .description("Ocorreu um erro ao resetar sua senha");
        submit(
            "reset password",
            &self.in_flight,
            &self.ctx,
            failure,
            self.attempt(token, form),
        )
        .await
    }

    async fn attempt(
        &self,
        token: Option<&str>,
        form: &ResetPasswordForm,
    ) -> Result<SubmitOutcome, SubmitError> {
        schema().validate(form)?;

        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(RequestError::MissingResetToken.into()),
        };

        let reset = ResetPassword {
            password: form.password.clone(),
            password_confirmation: form.password_confirmation.clone(),
            token: token.to_string(),
        };
        self.ctx.api.reset_password(&reset).await?;

        Ok(SubmitOutcome::Navigate(Route::SignIn))
    }
}
