//! Table, statistics and final-value handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use concord::{AggregateStats, RenderRow, SourceMetadata, Worksheet};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// The current worksheet, possibly filtered.
#[derive(Serialize)]
pub struct TableResponse {
    pub generation: u64,
    pub sources: Vec<SourceMetadata>,
    pub stats: AggregateStats,
    /// Number of rows before filtering.
    pub total_rows: usize,
    /// Rows whose feature matches the filter, in feature order.
    pub rows: Vec<RenderRow>,
}

impl TableResponse {
    /// Build a response showing the rows whose feature contains `filter`.
    pub fn new(worksheet: &Worksheet, filter: &str) -> Self {
        let run = worksheet.run();
        let features = run.rows.iter().map(|r| r.feature.as_str());
        let visible = concord::filter_features(features, filter);
        let rows = worksheet
            .render()
            .into_iter()
            .zip(visible)
            .filter_map(|(row, show)| show.then_some(row))
            .collect();

        Self {
            generation: run.generation,
            sources: run.sources.clone(),
            stats: run.stats.clone(),
            total_rows: run.rows.len(),
            rows,
        }
    }
}

/// Query parameters for the table endpoint.
#[derive(Deserialize)]
pub struct TableQuery {
    pub filter: Option<String>,
}

/// GET /api/table
pub async fn get_table(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableResponse>, ApiError> {
    let session = state.session.read().await;
    let worksheet = session.worksheet()?;
    Ok(Json(TableResponse::new(
        worksheet,
        query.filter.as_deref().unwrap_or(""),
    )))
}

/// Response for the statistics endpoint.
#[derive(Serialize)]
pub struct StatsResponse {
    pub generation: u64,
    #[serde(flatten)]
    pub stats: AggregateStats,
    /// Rows whose final value the reviewer has overridden.
    pub edited: usize,
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let session = state.session.read().await;
    let worksheet = session.worksheet()?;
    Ok(Json(StatsResponse {
        generation: worksheet.generation(),
        stats: worksheet.run().stats.clone(),
        edited: worksheet.edited_count(),
    }))
}

/// Request body for overriding a final value.
#[derive(Deserialize)]
pub struct SetFinalRequest {
    pub value: String,
}

/// PUT /api/rows/:feature/final
pub async fn set_final_value(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    payload: Result<Json<SetFinalRequest>, JsonRejection>,
) -> Result<Json<RenderRow>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut session = state.session.write().await;
    let worksheet = session.worksheet_mut()?;
    worksheet.set_final_value(&feature, req.value)?;
    Ok(Json(worksheet.render_row(&feature)?))
}

/// POST /api/rows/:feature/reset
pub async fn reset_final_value(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Json<RenderRow>, ApiError> {
    let mut session = state.session.write().await;
    let worksheet = session.worksheet_mut()?;
    worksheet.reset_final_value(&feature)?;
    Ok(Json(worksheet.render_row(&feature)?))
}
