//! Bulk transfer routes: CSV import/export and full backup/restore.
//!
//! Uploads arrive as raw text bodies so the inventory layer reports format
//! problems (`E_ROW`, `E_BACKUP_FORMAT`) instead of the extractor.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use labstock::backup::{self, RestoreSummary};
use labstock::{Component, registry, tabular};
use serde::Serialize;

use crate::routes::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub components: Vec<Component>,
}

/// `GET /api/components/export.csv`
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let components = registry::list(&state.inventory).await?;
    let text = tabular::export_to_table(&components)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"components.csv\""),
        ],
        text,
    )
        .into_response())
}

/// `POST /api/components/import.csv`: all rows or none.
pub async fn import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let components = tabular::import_from_table(&state.inventory, &body).await?;
    let status = if components.is_empty() { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(ImportResponse { imported: components.len(), components })))
}

/// `GET /api/backup`
pub async fn export_backup(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = backup::export_backup(&state.inventory).await?;
    let filename = format!("labstock-backup-{}.json", snapshot.exported_at);

    Ok((
        [(CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))],
        Json(snapshot),
    )
        .into_response())
}

/// `POST /api/backup`: total overwrite, all or nothing.
pub async fn import_backup(State(state): State<AppState>, body: String) -> Result<Json<RestoreSummary>, ApiError> {
    Ok(Json(backup::import_backup_str(&state.inventory, &body).await?))
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
