use log::info;

use crate::{
    api::{requests::PasswordChange, ProfileUpdate, Upload},
    context::AppContext,
    model::NewToast,
    validation::{Fields, Rule, Schema},
};

use super::{submit, InFlight, RequestError, SubmitError, SubmitOutcome};

#[derive(Clone, Default, serde::Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl Fields for ProfileForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "old_password" => Some(&self.old_password),
            "password" => Some(&self.password),
            "password_confirmation" => Some(&self.password_confirmation),
            _ => None,
        }
    }
}

impl ProfileForm {
    fn to_update(&self) -> ProfileUpdate {
        let password = (!self.old_password.is_empty()).then(|| PasswordChange {
            old_password: self.old_password.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        });

        ProfileUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            password,
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
        .field(
            "password",
            [Rule::RequiredWith {
                field: "old_password",
                message: "Senha obrigatória",
            }],
        )
        .field(
            "password_confirmation",
            [Rule::Matches {
                field: "password",
                message: "Confirmação de senha incorreta",
            }],
        )
}

pub struct ProfilePage {
    ctx: AppContext,
    in_flight: InFlight,
    uploading: InFlight,
}

impl ProfilePage {
    pub fn new(ctx: AppContext) -> ProfilePage {
        ProfilePage {
            ctx,
            in_flight: InFlight::default(),
            uploading: InFlight::default(),
        }
    }

    pub async fn handle_submit(&self, form: &ProfileForm) -> SubmitOutcome {
        let failure = NewToast::error("Erro ao atualizar perfil!")
            .description("Ocorreu um erro ao atualizar perfil, tente novamente");
        submit("profile", &self.in_flight, &self.ctx, failure, self.attempt(form)).await
    }

    /// Replace the signed in user's avatar.
    pub async fn handle_avatar(&self, upload: Upload) -> SubmitOutcome {
        let failure = NewToast::error("Erro na atualização do avatar")
            .description("Ocorreu um erro ao atualizar o avatar, tente novamente.");
        submit(
            "avatar",
            &self.uploading,
            &self.ctx,
            failure,
            self.upload(upload),
        )
        .await
    }

    async fn attempt(&self, form: &ProfileForm) -> Result<SubmitOutcome, SubmitError> {
        schema().validate(form)?;

        if !self.ctx.session.is_authenticated() {
            return Err(RequestError::SignedOut.into());
        }

        let user = self.ctx.api.update_profile(&form.to_update()).await?;
        info!("Updated profile of user {}", user.id);
        self.ctx.session.update_user(user);

        self.ctx.toasts.add_toast(
            NewToast::success("Perfil atualizado!")
                .description("Informações do perfil atualizadas com sucesso!"),
        );
        Ok(SubmitOutcome::Stay)
    }

    async fn upload(&self, upload: Upload) -> Result<SubmitOutcome, SubmitError> {
        if !self.ctx.session.is_authenticated() {
            return Err(RequestError::SignedOut.into());
        }

        let user = self.ctx.api.update_avatar(upload).await?;
        self.ctx.session.update_user(user);

        self.ctx.toasts.add_toast(NewToast::success("Avatar atualizado!"));
        Ok(SubmitOutcome::Stay)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{model::ToastType, pages::test_support};

    fn form(old_password: &str, password: &str, confirmation: &str) -> ProfileForm {
        ProfileForm {
            name: "John Doe".to_string(),
            email: "john@email.com".to_string(),
            old_password: old_password.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    fn updated_user() -> serde_json::Value {
        serde_json::json!({
            "id": "user-123",
            "name": "John Doe",
            "email": "john@email.com",
            "avatar_url": "http://localhost:3333/files/avatar.png",
        })
    }

    #[tokio::test]
    async fn updates_profile_without_password_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/profile"))
            .and(header("authorization", "Bearer token-123"))
            .and(body_json(serde_json::json!({
                "name": "John Doe",
                "email": "john@email.com",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated_user()))
            .expect(1)
            .mount(&server)
            .await;
        let ctx = test_support::context_with(&server.uri(), test_support::signed_in_storage());
        let page = ProfilePage::new(ctx.clone());

        let outcome = page.handle_submit(&form("", "", "")).await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert_eq!(ctx.session.user().unwrap().name, "John Doe");
        let toasts = ctx.toasts.messages();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastType::Success);
    }

    #[tokio::test]
    async fn sends_password_change_with_old_password() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/profile"))
            .and(body_json(serde_json::json!({
                "name": "John Doe",
                "email": "john@email.com",
                "old_password": "old-pass",
                "password": "new-pass",
                "password_confirmation": "new-pass",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated_user()))
            .expect(1)
            .mount(&server)
            .await;
        let ctx = test_support::context_with(&server.uri(), test_support::signed_in_storage());
        let page = ProfilePage::new(ctx);

        let outcome = page
            .handle_submit(&form("old-pass", "new-pass", "new-pass"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Stay);
    }

    #[tokio::test]
    async fn new_password_required_with_old_password() {
        let ctx = test_support::context_with("http://127.0.0.1:9", test_support::signed_in_storage());
        let page = ProfilePage::new(ctx.clone());

        let outcome = page.handle_submit(&form("old-pass", "", "")).await;

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors, got {outcome:?}");
        };
        assert_eq!(errors.get("password"), Some("Senha obrigatória"));
        assert!(ctx.toasts.messages().is_empty());
    }

    #[tokio::test]
    async fn avatar_upload_updates_user() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/avatar"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated_user()))
            .expect(1)
            .mount(&server)
            .await;
        let ctx = test_support::context_with(&server.uri(), test_support::signed_in_storage());
        let page = ProfilePage::new(ctx.clone());

        let outcome = page
            .handle_avatar(Upload {
                file_name: "avatar.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![0x89, b'P', b'N', b'G'],
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert_eq!(
            ctx.session.user().unwrap().avatar_url.as_deref(),
            Some("http://localhost:3333/files/avatar.png")
        );
        let toasts = ctx.toasts.messages();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Avatar atualizado!");
    }

    #[tokio::test]
    async fn signed_out_update_is_a_request_error() {
        let ctx = test_support::context("http://127.0.0.1:9");
        let page = ProfilePage::new(ctx.clone());

        let outcome = page.handle_submit(&form("", "", "")).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(ctx.toasts.messages()[0].kind, ToastType::Error);
    }
}
