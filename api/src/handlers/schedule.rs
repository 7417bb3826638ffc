//! Schedule handlers
//!
//! Day and week schedules, what's on now, and messages to the studio.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    response::{Redirect, Response},
    Form, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::app::Schedule;
use crate::domain::entities::ScheduleSlot;
use crate::error::AppError;
use crate::handlers::params::found;
use crate::schedule::{iso_to_gregorian, TimeContext};
use crate::AppState;

fn date_part<T: std::str::FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Invalid date component: {}", raw)))
}

/// Monday-based ISO week date, or 404
fn iso_date(year: &str, week: &str, day: &str) -> Result<NaiveDate, AppError> {
    let (year, week, day) = (date_part(year)?, date_part(week)?, date_part(day)?);
    iso_to_gregorian(year, week, day).ok_or_else(|| {
        AppError::NotFound(format!("Invalid ISO date: {}-W{}-{}", year, week, day))
    })
}

/// GET /schedule
pub async fn schedule_index() -> Response {
    found("/schedule/thisweek")
}

/// GET /schedule/today
pub async fn today(State(state): State<AppState>) -> Result<Json<Schedule>, AppError> {
    let date = state.schedule_service.today();
    Ok(Json(state.schedule_service.day(date).await?))
}

/// GET /schedule/thisweek
///
/// The week starting on the Monday of the current schedule day.
pub async fn this_week(State(state): State<AppState>) -> Result<Json<Schedule>, AppError> {
    let monday = state.schedule_service.this_week();
    Ok(Json(state.schedule_service.week(monday).await?))
}

/// GET /schedule/week/:year/:week
pub async fn week(
    State(state): State<AppState>,
    Path((year, week)): Path<(String, String)>,
) -> Result<Json<Schedule>, AppError> {
    let monday = iso_date(&year, &week, "1")?;
    Ok(Json(state.schedule_service.week(monday).await?))
}

/// GET /schedule/week/:year/:week/:day
pub async fn week_day(
    State(state): State<AppState>,
    Path((year, week, day)): Path<(String, String, String)>,
) -> Result<Json<Schedule>, AppError> {
    let date = iso_date(&year, &week, &day)?;
    Ok(Json(state.schedule_service.day(date).await?))
}

/// GET /schedule/day/:year/:month/:day
pub async fn calendar_day(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(String, String, String)>,
) -> Result<Json<Schedule>, AppError> {
    let date = NaiveDate::from_ymd_opt(date_part(&year)?, date_part(&month)?, date_part(&day)?)
        .ok_or_else(|| AppError::NotFound(format!("Invalid date: {}-{}-{}", year, month, day)))?;
    Ok(Json(state.schedule_service.day(date).await?))
}

/// GET /schedule/now
///
/// The next few shows from now, with filler in the gaps.
pub async fn now(State(state): State<AppState>) -> Result<Json<Vec<ScheduleSlot>>, AppError> {
    Ok(Json(state.schedule_service.current().await?))
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub comments: String,
}

/// POST /schedule/message
///
/// Send a message to whoever is on air, then bounce back to the home page
/// with the outcome.
pub async fn send_message(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Form(form): Form<MessageForm>,
) -> Result<Redirect, AppError> {
    if form.comments.trim().is_empty() {
        return Err(AppError::BadRequest("comments must not be empty".to_string()));
    }

    let source = peer.map_or_else(
        || "unknown".to_string(),
        |ConnectInfo(addr)| addr.ip().to_string(),
    );
    let now = TimeContext::now();
    let on_air = state.schedule_service.on_air(now).await?;

    let outcome = state
        .message_service
        .send(on_air.as_ref(), &form.comments, &source, now)
        .await?;

    Ok(Redirect::to(&format!("/?msg_result={}", outcome.as_str())))
}
