//! Source loading handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use concord::SourceText;
use serde::Deserialize;

use super::TableResponse;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for loading sources.
#[derive(Deserialize)]
pub struct LoadSourcesRequest {
    /// Sources in slot order; a fourth entry makes the run four-way.
    pub sources: Vec<SourceText>,
}

/// POST /api/sources
pub async fn load_sources(
    State(state): State<AppState>,
    payload: Result<Json<LoadSourcesRequest>, JsonRejection>,
) -> Result<Json<TableResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.load(req.sources).await?))
}
