//! Browser client for the GoBarber scheduling API.
//!
//! Pages are rendered server side with tera and served by axum. The signed
//! in session lives in a [`auth::SessionStore`] backed by SQLite so it
//! survives restarts; feedback is shown through a [`toast::ToastQueue`].

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod model;
pub mod navigation;
pub mod pages;
pub mod routes;
pub mod storage;
pub mod templates;
pub mod toast;
pub mod validation;

pub use error::{Error, Result};
