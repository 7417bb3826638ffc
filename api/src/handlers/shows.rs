//! Show database handlers
//!
//! Lists, searches and details public shows, seasons and timeslots.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::app::show_service::{SeasonDetail, ShowDetail, TimeslotDetail};
use crate::app::MediaList;
use crate::domain::entities::{Annotated, SeasonId, Show, ShowId, TimeslotId};
use crate::error::AppError;
use crate::handlers::params::{
    found, path_id, PageQuery, SearchFormat, SearchQuery, SearchResponse, Titled,
};
use crate::AppState;

/// GET /schedule/shows
///
/// Public shows that have been scheduled, newest first.
pub async fn list_shows(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MediaList<Annotated<Show>>>, AppError> {
    Ok(Json(state.show_service.list(query.page).await?))
}

/// GET /schedule/shows/search
pub async fn search_shows(
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
        .show_service
        .search(&query.term, &keys, order, page)
        .await?;

    if format == SearchFormat::FirstResult {
        if let Some(first) = results.items.first() {
            return Ok(found(&format!("/schedule/shows/{}", first.item.id)));
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

/// GET /schedule/shows/:id
pub async fn show_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Titled<ShowDetail>>, AppError> {
    let id: ShowId = path_id(&id, "show")?;
    let detail = state.show_service.show_detail(id).await?;

    let title = detail.show.annotations.title().to_string();
    Ok(Json(Titled::new(title, detail)))
}

/// GET /schedule/shows/seasons/:id
pub async fn season_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Titled<SeasonDetail>>, AppError> {
    let id: SeasonId = path_id(&id, "season")?;
    let detail = state.show_service.season_detail(id).await?;

    let title = detail.season.annotations.title().to_string();
    Ok(Json(Titled::new(title, detail)))
}

/// GET /schedule/shows/timeslots/:id
pub async fn timeslot_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Titled<TimeslotDetail>>, AppError> {
    let id: TimeslotId = path_id(&id, "timeslot")?;
    let detail = state.show_service.timeslot_detail(id).await?;

    let title = detail.timeslot.title().to_string();
    Ok(Json(Titled::new(title, detail)))
}
