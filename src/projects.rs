//! Project linkage: informational pointers from projects to components.
//!
//! Linking snapshots the component's current name and reserves nothing.
//! Deleting a component does not touch projects, so a project may point at
//! ids that no longer exist; [`dangling_references`] finds them.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::model::{Component, Project, RequiredComponent};

fn project_not_found(id: Uuid) -> InventoryError {
    InventoryError::NotFound { kind: "project", id }
}

async fn load_project(inventory: &Inventory, id: Uuid) -> Result<Project, InventoryError> {
    inventory
        .store()
        .get_project(id)
        .await?
        .ok_or_else(|| project_not_found(id))
}

// =============================================================================
// PROJECT CRUD
// =============================================================================

/// Store a new project. `extra` carries collaborator-owned fields verbatim.
///
/// # Errors
///
/// Returns `Validation` if the name is blank.
pub async fn create_project(
    inventory: &Inventory,
    name: &str,
    extra: serde_json::Map<String, serde_json::Value>,
) -> Result<Project, InventoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::validation("project name must not be empty"));
    }
    let project = Project { id: inventory.next_id(), name: name.to_owned(), required_components: Vec::new(), extra };
    inventory.store().put_project(&project).await?;
    info!(project_id = %project.id, "created project");
    Ok(project)
}

/// # Errors
///
/// Returns `NotFound` for unknown ids.
pub async fn get_project(inventory: &Inventory, id: Uuid) -> Result<Project, InventoryError> {
    load_project(inventory, id).await
}

/// Projects ordered by name, then id.
///
/// # Errors
///
/// Returns `Store` if the adapter fails.
pub async fn list_projects(inventory: &Inventory) -> Result<Vec<Project>, InventoryError> {
    let mut projects = inventory.store().projects().await?;
    projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Ok(projects)
}

/// # Errors
///
/// Returns `NotFound` for unknown ids.
pub async fn delete_project(inventory: &Inventory, id: Uuid) -> Result<(), InventoryError> {
    if !inventory.store().remove_project(id).await? {
        return Err(project_not_found(id));
    }
    info!(project_id = %id, "deleted project");
    Ok(())
}

// =============================================================================
// LINKAGE
// =============================================================================

/// Point a project at a component, snapshotting its current name. Linking an
/// already-linked component replaces that entry.
///
/// # Errors
///
/// Returns `Validation` for a zero quantity and `NotFound` if either the
/// project or the component does not exist.
pub async fn link_component(
    inventory: &Inventory,
    project_id: Uuid,
    component_id: Uuid,
    quantity: u32,
) -> Result<Project, InventoryError> {
    if quantity == 0 {
        return Err(InventoryError::validation("required quantity must be at least 1"));
    }
    let mut project = load_project(inventory, project_id).await?;
    let component = inventory.load(component_id).await?;

    let entry = RequiredComponent { component_id, component_name: component.name, quantity };
    match project
        .required_components
        .iter()
        .position(|existing| existing.component_id == component_id)
    {
        Some(index) => project.required_components[index] = entry,
        None => project.required_components.push(entry),
    }
    inventory.store().put_project(&project).await?;

    info!(%project_id, %component_id, quantity, "linked component to project");
    Ok(project)
}

/// Drop a component from a project's requirements.
///
/// # Errors
///
/// Returns `NotFound` if the project does not exist or does not reference
/// the component.
pub async fn unlink_component(
    inventory: &Inventory,
    project_id: Uuid,
    component_id: Uuid,
) -> Result<Project, InventoryError> {
    let mut project = load_project(inventory, project_id).await?;
    let before = project.required_components.len();
    project
        .required_components
        .retain(|entry| entry.component_id != component_id);
    if project.required_components.len() == before {
        return Err(InventoryError::NotFound { kind: "linked component", id: component_id });
    }
    inventory.store().put_project(&project).await?;

    info!(%project_id, %component_id, "unlinked component from project");
    Ok(project)
}

/// Entries of `project` whose component no longer exists in `components`.
#[must_use]
pub fn dangling_references<'a>(project: &'a Project, components: &[Component]) -> Vec<&'a RequiredComponent> {
    let live: HashSet<Uuid> = components.iter().map(|c| c.id).collect();
    project
        .required_components
        .iter()
        .filter(|entry| !live.contains(&entry.component_id))
        .collect()
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
