use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use axum_macros::debug_handler;
use tera::Context;

use crate::{
    navigation::Route,
    pages::{forgot_password::ForgotPasswordForm, reset_password::ResetPasswordForm},
};

use super::{page, respond, AppState};

#[derive(Debug, Default, serde::Deserialize)]
pub struct ResetQuery {
    token: Option<String>,
}

#[debug_handler]
pub async fn show_forgot(State(state): State<AppState>) -> Response {
    page(&state, Route::ForgotPassword, Context::new(), StatusCode::OK)
}

#[debug_handler]
pub async fn forgot(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let outcome = state.pages.forgot_password.handle_submit(&form).await;

    let mut context = Context::new();
    context.insert("email", &form.email);
    respond(&state, Route::ForgotPassword, outcome, context)
}

#[debug_handler]
pub async fn show_reset(State(state): State<AppState>, Query(query): Query<ResetQuery>) -> Response {
    let mut context = Context::new();
    context.insert("token", &query.token);
    page(&state, Route::ResetPassword, context, StatusCode::OK)
}

#[debug_handler]
pub async fn reset(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let outcome = state
        .pages
        .reset_password
        .handle_submit(query.token.as_deref(), &form)
        .await;

    let mut context = Context::new();
    context.insert("token", &query.token);
    respond(&state, Route::ResetPassword, outcome, context)
}
