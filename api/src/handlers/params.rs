//! Request parameters shared between handlers

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::MediaList;
use crate::domain::entities::{MetadataKey, SearchOrder};
use crate::error::AppError;

/// Query parameters for paginated lists
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// How search results are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFormat {
    AllResults,
    /// Redirect straight to the first hit, if there is one
    FirstResult,
}

/// Query parameters for metadata searches
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    /// Comma-separated metadata key names
    #[serde(default)]
    pub keys: String,
    pub order: Option<String>,
    #[serde(default = "first_page")]
    pub page: i64,
    pub subtype: Option<String>,
}

impl SearchQuery {
    pub fn keys(&self) -> Vec<String> {
        self.keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn order(&self) -> Result<SearchOrder, AppError> {
        match self.order.as_deref() {
            None | Some("") => Ok(SearchOrder::default()),
            Some(order) => order.parse().map_err(AppError::BadRequest),
        }
    }

    pub fn format(&self) -> Result<SearchFormat, AppError> {
        match self.subtype.as_deref() {
            None | Some("All Results") => Ok(SearchFormat::AllResults),
            Some("First Result") => Ok(SearchFormat::FirstResult),
            Some(other) => Err(AppError::BadRequest(format!(
                "Unknown search format: {}",
                other
            ))),
        }
    }
}

/// Search results together with the search that produced them
#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub term: String,
    pub metadata_keys: Vec<MetadataKey>,
    pub used_keys: Vec<String>,
    pub order: SearchOrder,
    pub results: MediaList<T>,
}

/// A detail page body with its title
#[derive(Debug, Serialize)]
pub struct Titled<T> {
    pub page_title: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Titled<T> {
    pub fn new(page_title: impl Into<String>, body: T) -> Self {
        Self {
            page_title: page_title.into(),
            body,
        }
    }
}

/// Parse a path segment as an ID; anything else names nothing
pub fn path_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("No such {}: {}", what, raw)))
}

/// Split a `+`-separated path segment, dropping empty parts
pub fn plus_list(raw: &str) -> Vec<String> {
    raw.split('+')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a point in time.
///
/// `now` (any case) gives `None`. Otherwise RFC 3339, `YYYY-MM-DDTHH:MM:SS`
/// or `YYYY-MM-DD`; the latter two are taken as UTC.
pub fn parse_when(raw: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    if raw.eq_ignore_ascii_case("now") {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(at.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN).and_utc()));
    }

    Err(AppError::BadRequest(format!("Unrecognised date: {}", raw)))
}

/// 302 Found
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 301 Moved Permanently
pub fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
