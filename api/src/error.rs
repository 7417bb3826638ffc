//! Unified error types for the lass API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and persistence errors
//! - `UpstreamError`: URY API and blog feed client errors
//! - `ScheduleError`: Failures inside the schedule algorithms
//! - `SignupError`: Rejected signup submissions
//! - `ConfigError`: Site configuration loading errors
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors talking to upstream HTTP services (URY API, blog feeds)
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Errors raised by the schedule filling, block and table algorithms
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Start time {start} is after finish time {finish}")]
    InvalidRange {
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    },

    #[error("Negative gap between {current} and {next} (next slot: {title})")]
    NegativeGap {
        current: DateTime<Utc>,
        next: DateTime<Utc>,
        title: String,
    },

    #[error("Encountered empty day list before {day_finish}; is filler working?")]
    EmptyDay { day_finish: String },

    #[error("Partitioning unsound: slot ending {finish} overruns row {row} starting {row_start}")]
    UnsoundPartition {
        row: usize,
        row_start: String,
        finish: String,
    },

    #[error("Range blocks misconfigured: {0}")]
    BlockOrder(String),
}

/// Rejected signup submissions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("Missing field: {0}")]
    Missing(String),

    #[error("Field must not be blank: {0}")]
    Blank(String),

    #[error("Gender must be 'm' or 'f', got '{0}'")]
    InvalidGender(String),

    #[error("College must be a number, got '{0}'")]
    InvalidCollege(String),

    #[error("Signup is misconfigured: no parameter name for '{0}'")]
    Config(String),
}

/// Site configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Signup rejected: {0}")]
    Signup(#[from] SignupError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                match e {
                    UpstreamError::NotFound(msg) => {
                        (StatusCode::NOT_FOUND, "Upstream resource not found", Some(msg.clone()))
                    }
                    UpstreamError::Api { message, .. } => {
                        (StatusCode::BAD_GATEWAY, "Upstream service error", Some(message.clone()))
                    }
                    _ => (StatusCode::BAD_GATEWAY, "Upstream service error", None),
                }
            }
            AppError::Schedule(e) => {
                tracing::error!("Schedule error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Signup(e) => match e {
                SignupError::Config(_) => {
                    tracing::error!("Signup misconfigured: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                        None,
                    )
                }
                _ => (StatusCode::BAD_REQUEST, "Signup rejected", Some(e.to_string())),
            },
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
