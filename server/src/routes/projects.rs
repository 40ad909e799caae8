//! Project routes: CRUD and component linkage.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use labstock::{Project, RequiredComponent, projects, registry};
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProjectBody {
    pub name: String,
    /// Everything else the client sends is stored verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LinkBody {
    pub quantity: u32,
}

/// `GET /api/projects`
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(projects::list_projects(&state.inventory).await?))
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = projects::create_project(&state.inventory, &body.name, body.extra).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /api/projects/:id`
pub async fn get_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Project>, ApiError> {
    Ok(Json(projects::get_project(&state.inventory, id).await?))
}

/// `DELETE /api/projects/:id`
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    projects::delete_project(&state.inventory, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/projects/:id/components/:component_id`: link or relink.
pub async fn link_component(
    State(state): State<AppState>,
    Path((id, component_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<LinkBody>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(projects::link_component(&state.inventory, id, component_id, body.quantity).await?))
}

/// `DELETE /api/projects/:id/components/:component_id`
pub async fn unlink_component(
    State(state): State<AppState>,
    Path((id, component_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(projects::unlink_component(&state.inventory, id, component_id).await?))
}

/// `GET /api/projects/:id/dangling`: linked components that no longer exist.
pub async fn dangling_references(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RequiredComponent>>, ApiError> {
    let project = projects::get_project(&state.inventory, id).await?;
    let components = registry::list(&state.inventory).await?;
    let dangling = projects::dangling_references(&project, &components).into_iter().cloned().collect();
    Ok(Json(dangling))
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
