use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::{debug, warn};
use tera::Context;

use crate::{
    api::Upload,
    model::NewToast,
    navigation::Route,
    pages::profile::ProfileForm,
};

use super::{page, respond, AppState};

#[debug_handler]
pub async fn show(State(state): State<AppState>) -> Response {
    page(&state, Route::Profile, Context::new(), StatusCode::OK)
}

#[debug_handler]
pub async fn update(State(state): State<AppState>, Form(form): Form<ProfileForm>) -> Response {
    let outcome = state.pages.profile.handle_submit(&form).await;

    let mut context = Context::new();
    context.insert("name", &form.name);
    context.insert("email", &form.email);
    respond(&state, Route::Profile, outcome, context)
}

#[debug_handler]
pub async fn avatar(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    match read_avatar(&mut multipart).await {
        Ok(Some(upload)) => {
            state.pages.profile.handle_avatar(upload).await;
        }
        Ok(None) => debug!("Avatar form sent without a file"),
        Err(err) => {
            warn!("Failed to read avatar upload: {}", err);
            state
                .ctx
                .toasts
                .add_toast(NewToast::error("Erro na atualização do avatar"));
        }
    }

    Redirect::to(Route::Profile.path()).into_response()
}

/// The `avatar` field, if a file was picked.
async fn read_avatar(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("avatar") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
