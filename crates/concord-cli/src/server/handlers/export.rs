//! Final-data export handler.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /api/export
pub async fn export_final_data(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session.read().await;
    let csv = session.export_csv()?;
    let file_name = state.engine.export_file_name(Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    ))
}
