//! Request bodies. None of the `Debug` impls print passwords or tokens.

#[derive(Clone, serde::Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Clone, serde::Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    /// Only sent when the user typed their current password.
    #[serde(flatten)]
    pub password: Option<PasswordChange>,
}

impl core::fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("changes_password", &self.password.is_some())
            .finish()
    }
}

#[derive(Clone, serde::Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone, serde::Serialize)]
pub struct ResetPassword {
    pub password: String,
    pub password_confirmation: String,
    pub token: String,
}

impl core::fmt::Debug for ResetPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPassword").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_omits_password_fields_without_old_password() {
        let update = ProfileUpdate {
            name: "name".to_string(),
            email: "mail@mail.com".to_string(),
            password: None,
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "name": "name", "email": "mail@mail.com" })
        );
    }

    #[test]
    fn profile_update_flattens_password_change() {
        let update = ProfileUpdate {
            name: "name".to_string(),
            email: "mail@mail.com".to_string(),
            password: Some(PasswordChange {
                old_password: "old".to_string(),
                password: "new-pass".to_string(),
                password_confirmation: "new-pass".to_string(),
            }),
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({
                "name": "name",
                "email": "mail@mail.com",
                "old_password": "old",
                "password": "new-pass",
                "password_confirmation": "new-pass",
            })
        );
    }
}
