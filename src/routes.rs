//! The browser surface: one GET per page, one POST per form.

use std::{path::Path, sync::Arc};

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tera::Context;
use tower_http::services::ServeDir;

use crate::{
    context::AppContext,
    navigation::Route,
    pages::{Pages, SubmitOutcome},
    templates::Templates,
    validation::ValidationErrors,
};

mod dashboard;
mod guard;
mod password;
mod profile;
mod register;
mod sessions;
mod toasts;

#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub pages: Arc<Pages>,
    pub templates: Arc<Templates>,
}

pub fn router(state: AppState, public_dir: &Path) -> Router {
    let public = Router::new()
        .route("/", get(sessions::show).post(sessions::sign_in))
        .route("/signup", get(register::show).post(register::sign_up))
        .route(
            "/forgot-password",
            get(password::show_forgot).post(password::forgot),
        )
        .route(
            "/reset-password",
            get(password::show_reset).post(password::reset),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::public_only,
        ));

    let private = Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/profile", get(profile::show).post(profile::update))
        .route("/profile/avatar", post(profile::avatar))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::private_only,
        ));

    Router::new()
        .merge(public)
        .merge(private)
        .route("/signout", post(sessions::sign_out))
        .route("/toasts/:id/dismiss", post(toasts::dismiss))
        .nest_service("/static", ServeDir::new(public_dir))
        .with_state(state)
}

fn template(route: Route) -> &'static str {
    match route {
        Route::SignIn => "sign_in.html",
        Route::SignUp => "sign_up.html",
        Route::ForgotPassword => "forgot_password.html",
        Route::ResetPassword => "reset_password.html",
        Route::Dashboard => "dashboard.html",
        Route::Profile => "profile.html",
    }
}

/// Render the page behind `route`.
fn page(state: &AppState, route: Route, mut context: Context, status: StatusCode) -> Response {
    // Where toast dismissals come back to
    context.insert("back", route.path());
    if !context.contains_key("errors") {
        context.insert("errors", &ValidationErrors::default());
    }

    match state.templates.render(template(route), &state.ctx, context) {
        Ok(html) => (status, html).into_response(),
        Err(status) => status.into_response(),
    }
}

/// Turn a form submission into a response. `context` carries the values
/// to show again, never passwords.
fn respond(state: &AppState, route: Route, outcome: SubmitOutcome, mut context: Context) -> Response {
    match outcome {
        SubmitOutcome::Navigate(to) => Redirect::to(to.path()).into_response(),
        SubmitOutcome::Invalid(errors) => {
            context.insert("errors", &errors);
            page(state, route, context, StatusCode::UNPROCESSABLE_ENTITY)
        }
        SubmitOutcome::Busy => page(state, route, context, StatusCode::CONFLICT),
        SubmitOutcome::Stay | SubmitOutcome::Failed => page(state, route, context, StatusCode::OK),
    }
}
