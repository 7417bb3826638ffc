//! URY Player handlers

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::app::MediaList;
use crate::domain::entities::{Annotated, Podcast, PodcastId};
use crate::error::AppError;
use crate::handlers::params::{
    found, path_id, PageQuery, SearchFormat, SearchQuery, SearchResponse, Titled,
};
use crate::AppState;

/// GET /uryplayer
///
/// Podcasts are all URY Player has for now.
pub async fn uryplayer_index() -> Response {
    found("/uryplayer/podcasts")
}

/// GET /uryplayer/podcasts
pub async fn list_podcasts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MediaList<Annotated<Podcast>>>, AppError> {
    Ok(Json(state.podcast_service.list(query.page).await?))
}

/// GET /uryplayer/podcasts/search
pub async fn search_podcasts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let format = query.format()?;
    let order = query.order()?;
    let keys = query.keys();

    let page = match format {
        SearchFormat::AllResults => query.page,
        SearchFormat::FirstResult => 1,
    };
    let results = state
        .podcast_service
        .search(&query.term, &keys, order, page)
        .await?;

    if format == SearchFormat::FirstResult {
        if let Some(first) = results.items.first() {
            return Ok(found(&format!("/uryplayer/podcasts/{}", first.item.id)));
        }
    }

    let metadata_keys = state.annotator.metadata().searchable_keys().await?;
    Ok(Json(SearchResponse {
        term: query.term,
        metadata_keys,
        used_keys: keys,
        order,
        results,
    })
    .into_response())
}

/// GET /uryplayer/podcasts/:id
pub async fn podcast_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Titled<Annotated<Podcast>>>, AppError> {
    let id: PodcastId = path_id(&id, "podcast")?;
    let podcast = state.podcast_service.detail(id).await?;

    let title = podcast.annotations.title().to_string();
    Ok(Json(Titled::new(title, podcast)))
}
