//! Website handlers
//!
//! The home page, static-ish pages, the sitewide context and signup.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::Uri,
    Form, Json,
};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::chart_service::{CHART, RECOMMENDED};
use crate::app::{ServiceState, SiteContext, Stream};
use crate::config::BlogConfig;
use crate::domain::entities::{Annotated, Banner, ChartRow, Podcast};
use crate::error::AppError;
use crate::handlers::params::parse_when;
use crate::AppState;

/// Podcasts shown in the home page box
const HOME_PODCASTS: u64 = 5;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub banners: Vec<Banner>,
    pub podcasts: Vec<Annotated<Podcast>>,
    pub chart: Option<Vec<ChartRow>>,
    pub recommended: Option<Vec<ChartRow>>,
    pub news: Option<BlogConfig>,
    pub speech: Option<BlogConfig>,
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let banners = state.website_service.banners("index", None).await?;
    let podcasts = state.podcast_service.latest(HOME_PODCASTS).await?;
    let chart = state.chart_service.latest(CHART, None).await?;
    let recommended = state.chart_service.latest(RECOMMENDED, None).await?;

    Ok(Json(HomeResponse {
        banners,
        podcasts,
        chart,
        recommended,
        news: state.blog_service.blog("news").ok().cloned(),
        speech: state.blog_service.blog("speech").ok().cloned(),
    }))
}

/// GET /contact
pub async fn contact(State(state): State<AppState>) -> Json<Value> {
    Json(state.website_service.contacts().clone())
}

/// GET /listen
pub async fn listen(State(state): State<AppState>) -> Json<Vec<Stream>> {
    Json(state.website_service.streams())
}

#[derive(Debug, Deserialize)]
pub struct ServiceQuery {
    pub at: Option<String>,
}

/// GET /service
///
/// Whether the station is on air. Manual overrides only apply when no `at`
/// is given.
pub async fn service(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> Result<Json<ServiceState>, AppError> {
    let at = query.at.as_deref().map(parse_when).transpose()?.flatten();
    Ok(Json(state.service_state.state(at).await?))
}

#[derive(Debug, Deserialize)]
pub struct SiteQuery {
    #[serde(default = "root_path")]
    pub path: String,
}

fn root_path() -> String {
    "/".to_string()
}

#[derive(Debug, Serialize)]
pub struct SiteResponse {
    #[serde(flatten)]
    pub site: SiteContext,
    pub now: DateTime<Tz>,
    pub service: ServiceState,
    /// Academic year of the current term, if there is one
    pub academic_year: Option<i32>,
}

/// GET /site
///
/// Everything a page needs regardless of what it shows.
pub async fn site(
    State(state): State<AppState>,
    Query(query): Query<SiteQuery>,
) -> Result<Json<SiteResponse>, AppError> {
    let service = state.service_state.state(None).await?;
    let time = state.schedule_service.time();
    let academic_year = service
        .term
        .as_ref()
        .map(|term| time.academic_year(&term.start, &term.name));

    Ok(Json(SiteResponse {
        site: state.website_service.site(&query.path),
        now: time.local_now(),
        service,
        academic_year,
    }))
}

/// GET /signup
///
/// Colleges to offer on the signup form.
pub async fn signup_form(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let colleges = state.website_service.colleges().await?;
    Ok(Json(json!({ "colleges": colleges })))
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<BTreeMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.website_service.signup(&form).await?))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No page at {}", uri.path()))
}
