//! The page table and who may see what.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Profile,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::SignIn,
        Route::SignUp,
        Route::ForgotPassword,
        Route::ResetPassword,
        Route::Dashboard,
        Route::Profile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::SignIn => "/",
            Route::SignUp => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword => "/reset-password",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
        }
    }

    /// Private pages need a session.
    pub fn is_private(self) -> bool {
        matches!(self, Route::Dashboard | Route::Profile)
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn access(self, authenticated: bool) -> Access {
        guard(self.is_private(), authenticated)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Private pages send signed out users to sign in; public pages send
/// signed in users to the dashboard.
pub fn guard(private: bool, authenticated: bool) -> Access {
    match (private, authenticated) {
        (true, true) | (false, false) => Access::Allow,
        (true, false) => Access::Redirect(Route::SignIn),
        (false, true) => Access::Redirect(Route::Dashboard),
    }
}
