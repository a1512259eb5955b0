use crate::{
    context::AppContext,
    model::NewToast,
    validation::{Fields, Rule, Schema},
};

use super::{submit, InFlight, SubmitError, SubmitOutcome};

#[derive(Clone, Default, serde::Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

impl Fields for ForgotPasswordForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

pub fn schema() -> Schema {
    Schema::new().field(
        "email",
        [
            Rule::Required("Email obrigatório"),
            Rule::Email("Digite um email válido"),
        ],
    )
}

pub struct ForgotPasswordPage {
    ctx: AppContext,
    in_flight: InFlight,
}

impl ForgotPasswordPage {
    pub fn new(ctx: AppContext) -> ForgotPasswordPage {
        ForgotPasswordPage {
            ctx,
            in_flight: InFlight::default(),
        }
    }

    /// True while a recovery request is on its way.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_loading()
    }

    pub async fn handle_submit(&self, form: &ForgotPasswordForm) -> SubmitOutcome {
        let failure = NewToast::error("Erro na recuperação de senha")
            .description("Ocorreu um erro ao tentar recuperar senha, tente novamente");
        submit(
            "forgot password",
            &self.in_flight,
            &self.ctx,
            failure,
            self.attempt(form),
        )
        .await
    }

    async fn attempt(&self, form: &ForgotPasswordForm) -> Result<SubmitOutcome, SubmitError> {
        schema().validate(form)?;

        self.ctx.api.forgot_password(&form.email).await?;

        self.ctx.toasts.add_toast(
            NewToast::success("E-mail enviado")
                .description("E-mail de recuperação enviado. Cheque sua caixa de email"),
        );
        Ok(SubmitOutcome::Stay)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{model::ToastType, pages::test_support};

    fn form(email: &str) -> ForgotPasswordForm {
        ForgotPasswordForm {
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn sends_recovery_email_and_stays() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/forgot"))
            .and(body_json(serde_json::json!({ "email": "john@email.com" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let ctx = test_support::context(&server.uri());
        let page = ForgotPasswordPage::new(ctx.clone());

        let outcome = page.handle_submit(&form("john@email.com")).await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert!(!page.is_loading());
        let toasts = ctx.toasts.messages();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastType::Success);
    }

    #[tokio::test]
    async fn loading_while_request_is_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/forgot"))
            .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(200)))
            .expect(1)
            .mount(&server)
            .await;
        let ctx = test_support::context(&server.uri());
        let page = ForgotPasswordPage::new(ctx);
        let form = form("john@email.com");

        let (first, second) = tokio::join!(page.handle_submit(&form), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(page.is_loading());
            page.handle_submit(&form).await
        });

        assert_eq!(first, SubmitOutcome::Stay);
        assert_eq!(second, SubmitOutcome::Busy);
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn empty_email_is_required() {
        let ctx = test_support::context("http://127.0.0.1:9");
        let page = ForgotPasswordPage::new(ctx.clone());

        let outcome = page.handle_submit(&form("")).await;

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors, got {outcome:?}");
        };
        assert_eq!(errors.get("email"), Some("Email obrigatório"));
        assert!(ctx.toasts.messages().is_empty());
    }
}
