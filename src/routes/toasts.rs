use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use axum_macros::debug_handler;
use log::debug;

use crate::{model::Snowflake, navigation::Route};

use super::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct Dismiss {
    /// Page to go back to.
    #[serde(default)]
    back: String,
}

#[debug_handler]
pub async fn dismiss(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<Dismiss>,
) -> Redirect {
    match id.parse::<Snowflake>() {
        Ok(id) => state.ctx.toasts.remove_toast(&id),
        Err(err) => debug!("Not a toast id {:?}: {}", id, err),
    }

    Redirect::to(back_to(&form.back))
}

/// Only pages of this site are followed, anything else goes to sign in.
fn back_to(back: &str) -> &'static str {
    Route::from_path(back).map_or(Route::SignIn.path(), Route::path)
}
