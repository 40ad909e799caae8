//! Component registry, ledger and maintenance routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use labstock::ledger::{self, StudentIssue};
use labstock::low_stock::{self, InventoryReport};
use labstock::registry::{self, ComponentFilter};
use labstock::{Category, Component, ComponentInput, IssueRecord, maintenance};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::ApiError;
use crate::state::AppState;

/// A component plus the values derived from it on read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResponse {
    #[serde(flatten)]
    pub component: Component,
    pub available_quantity: u32,
    pub is_low_stock: bool,
}

impl From<Component> for ComponentResponse {
    fn from(component: Component) -> Self {
        Self {
            available_quantity: component.available_quantity(),
            is_low_stock: low_stock::is_low_stock(&component),
            component,
        }
    }
}

fn to_responses(components: Vec<Component>) -> Vec<ComponentResponse> {
    components.into_iter().map(ComponentResponse::from).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub issuable: bool,
}

/// `GET /api/components`: registry in creation order, optionally filtered.
pub async fn list_components(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ComponentResponse>>, ApiError> {
    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(Category::parse(raw).ok_or_else(|| ApiError::validation(format!("unknown category \"{raw}\"")))?),
    };
    let criteria = ComponentFilter { query: query.q, category, issuable_only: query.issuable };

    let components = registry::list(&state.inventory).await?;
    let matched = registry::filter(&components, &criteria).into_iter().cloned().collect();
    Ok(Json(to_responses(matched)))
}

/// `POST /api/components`: add a component from the admin form.
pub async fn create_component(
    State(state): State<AppState>,
    Json(body): Json<ComponentInput>,
) -> Result<(StatusCode, Json<ComponentResponse>), ApiError> {
    if body.total_quantity == 0 {
        return Err(ApiError::validation("totalQuantity must be at least 1"));
    }
    let component = registry::create(&state.inventory, body).await?;
    Ok((StatusCode::CREATED, Json(component.into())))
}

/// `DELETE /api/components`: wipe the registry.
pub async fn clear_components(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = registry::clear_all(&state.inventory).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// `GET /api/components/:id`
pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let component = registry::get(&state.inventory, id).await?;
    Ok(Json(component.into()))
}

/// `PUT /api/components/:id`: replace the catalog fields. The ledger and the
/// maintenance state change only through their own routes.
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ComponentInput>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let mut component = registry::get(&state.inventory, id).await?;
    component.name = body.name;
    component.description = body.description;
    component.category = body.category;
    component.total_quantity = body.total_quantity;
    component.image_url = body.image_url.filter(|url| !url.trim().is_empty());
    component.is_available = body.is_available;
    component.low_stock_threshold = body.low_stock_threshold;
    component.links = body.links;

    let updated = registry::update(&state.inventory, component).await?;
    Ok(Json(updated.into()))
}

/// `DELETE /api/components/:id`
pub async fn delete_component(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    registry::delete(&state.inventory, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/components/:id/availability`: flip the manual switch.
pub async fn toggle_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let component = registry::toggle_availability(&state.inventory, id).await?;
    Ok(Json(component.into()))
}

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueBody {
    pub student_name: String,
    pub quantity: u32,
}

/// `POST /api/components/:id/issues`: check units out to a student.
pub async fn issue_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<IssueBody>,
) -> Result<(StatusCode, Json<IssueRecord>), ApiError> {
    let record = ledger::issue(&state.inventory, id, &body.student_name, body.quantity).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /api/components/:id/issues/:issue_id`: return an issue in full.
pub async fn return_issue(
    State(state): State<AppState>,
    Path((id, issue_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<IssueRecord>, ApiError> {
    let record = ledger::return_issue(&state.inventory, id, issue_id).await?;
    Ok(Json(record))
}

/// `GET /api/students/:name/issues`
pub async fn student_issues(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<StudentIssue>>, ApiError> {
    let components = registry::list(&state.inventory).await?;
    Ok(Json(ledger::issues_for_student(&components, &name)))
}

// =============================================================================
// MAINTENANCE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LogBody {
    #[serde(default)]
    pub notes: String,
}

/// `POST /api/components/:id/maintenance`: flip the lockout.
pub async fn toggle_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let component = maintenance::toggle_maintenance(&state.inventory, id).await?;
    Ok(Json(component.into()))
}

/// `POST /api/components/:id/maintenance/logs`: 201 with the entry, or 204
/// when blank notes were skipped.
pub async fn add_maintenance_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<LogBody>,
) -> Result<Response, ApiError> {
    match maintenance::add_log(&state.inventory, id, &body.notes).await? {
        Some(record) => Ok((StatusCode::CREATED, Json(record)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `DELETE /api/components/:id/maintenance/logs/:log_id`
pub async fn delete_maintenance_log(
    State(state): State<AppState>,
    Path((id, log_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let component = maintenance::delete_log(&state.inventory, id, log_id).await?;
    Ok(Json(component.into()))
}

// =============================================================================
// DERIVED VIEWS
// =============================================================================

/// `GET /api/low-stock`: most depleted first.
pub async fn low_stock(State(state): State<AppState>) -> Result<Json<Vec<ComponentResponse>>, ApiError> {
    let components = registry::list(&state.inventory).await?;
    Ok(Json(to_responses(low_stock::derive_low_stock(&components))))
}

/// `GET /api/report`
pub async fn report(State(state): State<AppState>) -> Result<Json<InventoryReport>, ApiError> {
    let components = registry::list(&state.inventory).await?;
    Ok(Json(low_stock::summarize(&components)))
}

#[cfg(test)]
#[path = "components_test.rs"]
mod tests;
