//! Typed client for the GoBarber HTTP API.

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::model::{Appointment, Credentials, MonthAvailabilityItem, Session, User};

pub mod requests;

pub use requests::{NewUser, ProfileUpdate, ResetPassword};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Transport(err) => err.status(),
            Error::Status { status, .. } => Some(*status),
        }
    }
}

/// Error body the API sends with non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// A file picked for upload.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Clones share the http connection pool and the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ApiClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            http: reqwest::Client::new(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Arm (or with `None`, disarm) the authorization header sent with
    /// every request. Only the session store does this.
    pub(crate) fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = token;
    }

    #[cfg(test)]
    pub(crate) fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        trace!("{} {}", method, path);
        let builder = self.http.request(method, self.url(path));

        // Outgoing request interceptor
        let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(body) => body.message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body,
        };

        warn!("API responded {}: {}", status, message);
        Err(Error::Status { status, message })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = ApiClient::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<()> {
        ApiClient::check(builder.send().await?).await?;
        Ok(())
    }
}

/// Sessions and users
impl ApiClient {
    /// `POST sessions`
    pub async fn create_session(&self, credentials: &Credentials) -> Result<Session> {
        debug!("Creating session for {}", credentials.email);
        ApiClient::send_json(self.request(Method::POST, "sessions").json(credentials)).await
    }

    /// `POST /users`
    pub async fn create_user(&self, user: &NewUser) -> Result<()> {
        debug!("Creating user {}", user.email);
        ApiClient::send_empty(self.request(Method::POST, "/users").json(user)).await
    }

    /// `PUT /profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        debug!("Updating profile");
        ApiClient::send_json(self.request(Method::PUT, "/profile").json(update)).await
    }

    /// `PATCH users/avatar`, multipart field `avatar`.
    pub async fn update_avatar(&self, upload: Upload) -> Result<User> {
        debug!("Uploading avatar {}", upload.file_name);
        let mut part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new().part("avatar", part);

        ApiClient::send_json(self.request(Method::PATCH, "users/avatar").multipart(form)).await
    }
}

/// Password recovery
impl ApiClient {
    /// `POST password/forgot`
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        debug!("Requesting password recovery for {}", email);
        let body = serde_json::json!({ "email": email });
        ApiClient::send_empty(self.request(Method::POST, "password/forgot").json(&body)).await
    }

    /// `POST password/reset`
    pub async fn reset_password(&self, reset: &ResetPassword) -> Result<()> {
        debug!("Resetting password");
        ApiClient::send_empty(self.request(Method::POST, "password/reset").json(reset)).await
    }
}

/// Schedule
impl ApiClient {
    /// `GET providers/:id/month-availability`
    pub async fn month_availability(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthAvailabilityItem>> {
        let path = format!("providers/{}/month-availability", provider_id);
        let builder = self
            .request(Method::GET, &path)
            .query(&[("year", year.to_string()), ("month", month.to_string())]);
        ApiClient::send_json(builder).await
    }

    /// `GET appointments/me`
    pub async fn my_appointments(&self, year: i32, month: u32, day: u32) -> Result<Vec<Appointment>> {
        let builder = self.request(Method::GET, "appointments/me").query(&[
            ("month", month.to_string()),
            ("year", year.to_string()),
            ("day", day.to_string()),
        ]);
        ApiClient::send_json(builder).await
    }
}
