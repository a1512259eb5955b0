use axum::{extract::State, http::StatusCode, response::Response, Form};
use axum_macros::debug_handler;
use tera::Context;

use crate::{navigation::Route, pages::sign_up::SignUpForm};

use super::{page, respond, AppState};

#[debug_handler]
pub async fn show(State(state): State<AppState>) -> Response {
    page(&state, Route::SignUp, Context::new(), StatusCode::OK)
}

#[debug_handler]
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Response {
    let outcome = state.pages.sign_up.handle_submit(&form).await;

    let mut context = Context::new();
    context.insert("name", &form.name);
    context.insert("email", &form.email);
    respond(&state, Route::SignUp, outcome, context)
}
