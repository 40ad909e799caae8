//! Router assembly and error mapping.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the inventory HTTP API under a single Axum router.
//! Handlers are thin: they extract, call one inventory operation, and map
//! the result. Every inventory failure becomes a JSON body
//! `{ "code", "message", "row"? }` with a status chosen by
//! [`inventory_error_to_status`].

pub mod components;
pub mod projects;
pub mod transfer;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use labstock::{ErrorCode, InventoryError};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::state::AppState;

/// Inventory API routes.
pub fn app(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/components",
            get(components::list_components)
                .post(components::create_component)
                .delete(components::clear_components),
        )
        .route("/api/components/export.csv", get(transfer::export_csv))
        .route("/api/components/import.csv", post(transfer::import_csv))
        .route(
            "/api/components/{id}",
            get(components::get_component)
                .put(components::update_component)
                .delete(components::delete_component),
        )
        .route("/api/components/{id}/availability", post(components::toggle_availability))
        .route("/api/components/{id}/issues", post(components::issue_component))
        .route("/api/components/{id}/issues/{issue_id}", delete(components::return_issue))
        .route("/api/components/{id}/maintenance", post(components::toggle_maintenance))
        .route("/api/components/{id}/maintenance/logs", post(components::add_maintenance_log))
        .route(
            "/api/components/{id}/maintenance/logs/{log_id}",
            delete(components::delete_maintenance_log),
        )
        .route("/api/low-stock", get(components::low_stock))
        .route("/api/report", get(components::report))
        .route("/api/students/{name}/issues", get(components::student_issues))
        .route("/api/backup", get(transfer::export_backup).post(transfer::import_backup))
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route("/api/projects/{id}", get(projects::get_project).delete(projects::delete_project))
        .route(
            "/api/projects/{id}/components/{component_id}",
            put(projects::link_component).delete(projects::unlink_component),
        )
        .route("/api/projects/{id}/dangling", get(projects::dangling_references))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn inventory_error_to_status(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::Validation(_) | InventoryError::Row { .. } | InventoryError::BackupFormat(_) => {
            StatusCode::BAD_REQUEST
        }
        InventoryError::Capacity(_) => StatusCode::CONFLICT,
        InventoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        InventoryError::Encoding(_) | InventoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

/// Handler error: an inventory failure rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError(pub InventoryError);

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self(InventoryError::Validation(message.into()))
    }

    fn body(&self) -> ErrorBody {
        let row = match &self.0 {
            InventoryError::Row { row, .. } => Some(*row),
            _ => None,
        };
        ErrorBody { code: self.0.error_code(), message: self.0.to_string(), row }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = inventory_error_to_status(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "inventory request failed");
        } else {
            warn!(error = %self.0, code = self.0.error_code(), "inventory request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
