use super::User;

pub type Token = String;

/// An authenticated session. Token and user only ever exist together.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Session {
    pub token: Token,
    pub user: User,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't print the token
        f.debug_struct("Session")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    pub email: String,
    /// The (**unhashed**) password
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't print the password
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish()
    }
}
