use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use axum_macros::debug_handler;
use chrono::{Local, NaiveDate};
use tera::Context;

use crate::navigation::Route;

use super::{page, AppState};

#[derive(Debug, Default, serde::Deserialize)]
pub struct DashboardQuery {
    /// `YYYY-MM-DD`
    date: Option<String>,
    /// `YYYY-MM`
    month: Option<String>,
}

#[debug_handler]
pub async fn show(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> Response {
    let selected = query
        .date
        .as_deref()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());
    let month = query
        .month
        .as_deref()
        .and_then(|month| NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok());

    let now = Local::now();
    let now = now.with_timezone(now.offset());
    let view = state.pages.dashboard.load(selected, month, now).await;

    let mut context = Context::new();
    context.insert("dashboard", &view);
    page(&state, Route::Dashboard, context, StatusCode::OK)
}
