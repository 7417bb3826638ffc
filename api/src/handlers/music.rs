//! Music handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::chart_service::{CHART, RECOMMENDED};
use crate::domain::entities::ChartRow;
use crate::error::AppError;
use crate::handlers::params::parse_when;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Show the chart as it stood at this time
    pub on: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub chart_type: &'static str,
    /// `None` if this chart has never been released
    pub rows: Option<Vec<ChartRow>>,
}

async fn chart(
    state: &AppState,
    chart_type: &'static str,
    query: &ChartQuery,
) -> Result<ChartResponse, AppError> {
    let on = query.on.as_deref().map(parse_when).transpose()?.flatten();
    let rows = state.chart_service.latest(chart_type, on).await?;

    Ok(ChartResponse { chart_type, rows })
}

/// GET /music/chart
pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    Ok(Json(chart(&state, CHART, &query).await?))
}

/// GET /music/recommended
///
/// Recommended Listening.
pub async fn get_recommended(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    Ok(Json(chart(&state, RECOMMENDED, &query).await?))
}
