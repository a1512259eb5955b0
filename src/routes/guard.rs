use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use log::trace;

use crate::navigation::{guard, Access};

use super::AppState;

/// Pages that need a session.
pub async fn private_only<B>(
    State(state): State<AppState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    check(true, state, request, next).await
}

/// Pages that only make sense signed out.
pub async fn public_only<B>(
    State(state): State<AppState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    check(false, state, request, next).await
}

async fn check<B>(private: bool, state: AppState, request: Request<B>, next: Next<B>) -> Response {
    match guard(private, state.ctx.session.is_authenticated()) {
        Access::Allow => next.run(request).await,
        Access::Redirect(route) => {
            trace!("Redirecting {} to {}", request.uri().path(), route.path());
            Redirect::to(route.path()).into_response()
        }
    }
}
