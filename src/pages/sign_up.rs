use crate::{
    api::NewUser,
    context::AppContext,
    model::NewToast,
    navigation::Route,
    validation::{Fields, Rule, Schema},
};

use super::{submit, InFlight, SubmitError, SubmitOutcome};

#[derive(Clone, Default, serde::Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Fields for SignUpForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

pub fn schema() -> Schema {
    Schema::new()
        .field("name", [Rule::Required("Nome obrigatório")])
        .field(
            "email",
            [
                Rule::Required("Email obrigatório"),
                Rule::Email("Digite um email válido"),
            ],
        )
        .field("password", [Rule::Min(6, "No mínimo 6 digitos")])
}

pub struct SignUpPage {
    ctx: AppContext,
    in_flight: InFlight,
}

impl SignUpPage {
    pub fn new(ctx: AppContext) -> SignUpPage {
        SignUpPage {
            ctx,
            in_flight: InFlight::default(),
        }
    }

    pub async fn handle_submit(&self, form: &SignUpForm) -> SubmitOutcome {
        let failure = NewToast::error("Erro no cadastro")
            .description("Ocorreu um erro ao fazer cadastro. Tente novamente");
        submit("sign up", &self.in_flight, &self.ctx, failure, self.attempt(form)).await
    }

    async fn attempt(&self, form: &SignUpForm) -> Result<SubmitOutcome, SubmitError> {
        schema().validate(form)?;

        let user = NewUser {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
        };
        self.ctx.api.create_user(&user).await?;

        self.ctx.toasts.add_toast(
            NewToast::success("Cadastro realizado")
                .description("Você já pode fazer seu logon GoBarber!"),
        );
        Ok(SubmitOutcome::Navigate(Route::SignIn))
    }
}
