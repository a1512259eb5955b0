//! Form pages: validate, submit, then navigate and/or toast.
//!
//! Every submission ends in a [`SubmitOutcome`]. Validation failures come
//! back as field errors and never reach the network or the toast queue;
//! any other failure becomes exactly one error toast.

use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{debug, warn};

use crate::{
    api, auth, context::AppContext, model::NewToast, navigation::Route,
    validation::ValidationErrors,
};

pub mod dashboard;
pub mod forgot_password;
pub mod profile;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use dashboard::DashboardPage;
pub use forgot_password::ForgotPasswordPage;
pub use profile::ProfilePage;
pub use reset_password::ResetPasswordPage;
pub use sign_in::SignInPage;
pub use sign_up::SignUpPage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Done, go to this page.
    Navigate(Route),
    /// Done, stay on the page.
    Stay,
    /// Nothing was sent; show these next to their inputs.
    Invalid(ValidationErrors),
    /// The request failed and an error toast was shown.
    Failed,
    /// The same form is already being submitted.
    Busy,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Api(#[from] api::Error),
    #[error(transparent)]
    SignIn(#[from] auth::Error),
    #[error("no reset password token provided")]
    MissingResetToken,
    #[error("not signed in")]
    SignedOut,
}

impl From<api::Error> for SubmitError {
    fn from(err: api::Error) -> Self {
        SubmitError::Request(err.into())
    }
}

impl From<auth::Error> for SubmitError {
    fn from(err: auth::Error) -> Self {
        SubmitError::Request(err.into())
    }
}

/// Guards a form against being submitted again while in flight.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    fn begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Run one submission and turn its result into an outcome.
pub(crate) async fn submit<F>(
    form: &'static str,
    in_flight: &InFlight,
    ctx: &AppContext,
    failure: NewToast,
    attempt: F,
) -> SubmitOutcome
where
    F: Future<Output = Result<SubmitOutcome, SubmitError>>,
{
    let Some(_guard) = in_flight.begin() else {
        debug!("Ignoring {} submission, one is already in flight", form);
        return SubmitOutcome::Busy;
    };

    match attempt.await {
        Ok(outcome) => outcome,
        Err(SubmitError::Validation(errors)) => {
            debug!("{} form invalid: {}", form, errors);
            SubmitOutcome::Invalid(errors)
        }
        Err(SubmitError::Request(err)) => {
            warn!("{} submission failed: {}", form, err);
            ctx.toasts.add_toast(failure);
            SubmitOutcome::Failed
        }
    }
}

/// One page controller per form, sharing the context.
pub struct Pages {
    pub sign_in: SignInPage,
    pub sign_up: SignUpPage,
    pub forgot_password: ForgotPasswordPage,
    pub reset_password: ResetPasswordPage,
    pub profile: ProfilePage,
    pub dashboard: DashboardPage,
}

impl Pages {
    pub fn new(ctx: &AppContext) -> Pages {
        Pages {
            sign_in: SignInPage::new(ctx.clone()),
            sign_up: SignUpPage::new(ctx.clone()),
            forgot_password: ForgotPasswordPage::new(ctx.clone()),
            reset_password: ResetPasswordPage::new(ctx.clone()),
            profile: ProfilePage::new(ctx.clone()),
            dashboard: DashboardPage::new(ctx.clone()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{sync::Arc, time::Duration};

    use crate::{config::Config, context::AppContext, storage::MemoryStorage};

    pub fn context(api_url: &str) -> AppContext {
        context_with(api_url, MemoryStorage::new())
    }

    pub fn context_with(api_url: &str, storage: MemoryStorage) -> AppContext {
        let config = Config {
            api_url: api_url.to_string(),
            toast_timeout: Duration::from_secs(3),
            ..Config::default()
        };
        AppContext::with_storage(Arc::new(storage), &config).unwrap()
    }

    pub fn signed_in_storage() -> MemoryStorage {
        MemoryStorage::with_items([
            (crate::storage::TOKEN_KEY, "token-123"),
            (
                crate::storage::USER_KEY,
                r#"{"id":"user-123","name":"name","email":"mail@mail.com"}"#,
            ),
        ])
    }
}
