//! Team handlers
//!
//! Each team is represented by its blog.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::BlogConfig;
use crate::error::AppError;
use crate::handlers::params::moved_permanently;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub name: String,
    pub blog: BlogConfig,
}

/// GET /teams/:name
pub async fn get_team(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TeamResponse>, AppError> {
    let blog = state.blog_service.blog(&name)?.clone();
    Ok(Json(TeamResponse { name, blog }))
}

/// GET /teams/:name/feed
///
/// The team blog's feed document, passed through as-is.
pub async fn get_team_feed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let document = state.blog_service.feed(&name).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        document,
    )
        .into_response())
}

/// GET /news
pub async fn old_news() -> Response {
    moved_permanently("/teams/news")
}

/// GET /speech
pub async fn old_speech() -> Response {
    moved_permanently("/teams/speech")
}
