//! Laconia handlers
//!
//! Raw JSON access to credits and metadata for any annotatable model,
//! addressed entirely by path:
//!
//! `/laconia/{package}/{model}/{ids}/credits/{types}/{date}`
//! `/laconia/{package}/{model}/{ids}/metadata/{strand}/{keys}/{date}`

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::entities::{CreditMap, MetadataMap, Strand, SubjectKind};
use crate::error::AppError;
use crate::handlers::params::{parse_when, plus_list};
use crate::AppState;

fn subject_kind(package: &str, model: &str) -> Result<SubjectKind, AppError> {
    SubjectKind::from_model(package, model)
        .ok_or_else(|| AppError::NotFound(format!("No such model: {}/{}", package, model)))
}

fn subject_ids(raw: &str) -> Result<Vec<i32>, AppError> {
    plus_list(raw)
        .iter()
        .map(|id| {
            id.parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid ID: {}", id)))
        })
        .collect()
}

/// `all` asks for every credit type
fn credit_types(raw: &str) -> Vec<String> {
    if raw.eq_ignore_ascii_case("all") {
        Vec::new()
    } else {
        plus_list(raw)
    }
}

/// GET /laconia/:package/:model/:ids/credits/:types/:date
pub async fn credits(
    State(state): State<AppState>,
    Path((package, model, ids, types, date)): Path<(String, String, String, String, String)>,
) -> Result<Json<BTreeMap<i32, CreditMap>>, AppError> {
    let kind = subject_kind(&package, &model)?;
    let ids = subject_ids(&ids)?;
    let at = parse_when(&date)?;

    let credits = state
        .annotator
        .bulk_credits(kind, &ids, at, &credit_types(&types))
        .await?;

    Ok(Json(credits))
}

/// GET /laconia/:package/:model/:ids/metadata/:strand/:keys/:date
pub async fn metadata(
    State(state): State<AppState>,
    Path((package, model, ids, strand, keys, date)): Path<(
        String,
        String,
        String,
        String,
        String,
        String,
    )>,
) -> Result<Json<BTreeMap<i32, MetadataMap>>, AppError> {
    let kind = subject_kind(&package, &model)?;
    let ids = subject_ids(&ids)?;
    let strand: Strand = strand.parse().map_err(AppError::BadRequest)?;
    let at = parse_when(&date)?;

    let metadata = state
        .annotator
        .metadata()
        .bulk_fetch(kind, strand, &ids, &plus_list(&keys), at)
        .await?;

    Ok(Json(metadata))
}
