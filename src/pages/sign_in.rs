use crate::{
    context::AppContext,
    model::{Credentials, NewToast},
    navigation::Route,
    validation::{Fields, Rule, Schema},
};

use super::{submit, InFlight, SubmitError, SubmitOutcome};

#[derive(Clone, Default, serde::Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Fields for SignInForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

pub fn schema() -> Schema {
    Schema::new()
        .field(
            "email",
            [
                Rule::Required("Email obrigatório"),
                Rule::Email("Digite um email válido"),
            ],
        )
        .field("password", [Rule::Required("Senha obrigatória")])
}

pub struct SignInPage {
    ctx: AppContext,
    in_flight: InFlight,
}

impl SignInPage {
    pub fn new(ctx: AppContext) -> SignInPage {
        SignInPage {
            ctx,
            in_flight: InFlight::default(),
        }
    }

    pub async fn handle_submit(&self, form: &SignInForm) -> SubmitOutcome {
        let failure = NewToast::error("Erro na autenticação")
            .description("Ocorreu um erro ao fazer login cheque credenciais.");
        submit("sign in", &self.in_flight, &self.ctx, failure, self.attempt(form)).await
    }

    async fn attempt(&self, form: &SignInForm) -> Result<SubmitOutcome, SubmitError> {
        schema().validate(form)?;

        let credentials = Credentials {
            email: form.email.clone(),
            password: form.password.clone(),
        };
        self.ctx.session.sign_in(&credentials).await?;

        Ok(SubmitOutcome::Navigate(Route::Dashboard))
    }
}
