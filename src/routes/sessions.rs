use axum::{
    extract::State,
    http::StatusCode,
    response::{Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::debug;
use tera::Context;

use crate::{navigation::Route, pages::sign_in::SignInForm};

use super::{page, respond, AppState};

#[debug_handler]
pub async fn show(State(state): State<AppState>) -> Response {
    page(&state, Route::SignIn, Context::new(), StatusCode::OK)
}

#[debug_handler]
pub async fn sign_in(State(state): State<AppState>, Form(form): Form<SignInForm>) -> Response {
    debug!("Got sign in request for {}", form.email);
    let outcome = state.pages.sign_in.handle_submit(&form).await;

    let mut context = Context::new();
    context.insert("email", &form.email);
    respond(&state, Route::SignIn, outcome, context)
}

#[debug_handler]
pub async fn sign_out(State(state): State<AppState>) -> Redirect {
    state.ctx.session.sign_out();
    Redirect::to(Route::SignIn.path())
}
