//! Full-snapshot backup and restore.
//!
//! DESIGN
//! ======
//! A backup is every persisted collection in one JSON document:
//! `{version, exportedAt, components, projects, analytics, customImageLibrary}`.
//! Restore is a total overwrite of components and projects, never a merge.
//! `analytics` and `customImageLibrary` are replaced wholesale when the
//! payload carries them and left alone otherwise.
//!
//! ERROR HANDLING
//! ==============
//! The payload is decoded and validated in full before the store is touched,
//! then committed through one atomic `batch_replace`. A bad payload or a
//! failed commit leaves every collection as it was.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::model::{Component, Project};
use crate::registry;
use crate::store::Replacement;

/// Current snapshot format version.
pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    /// Milliseconds since Unix epoch.
    pub exported_at: i64,
    pub components: Vec<Component>,
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Value>,
    #[serde(default)]
    pub custom_image_library: Vec<Value>,
}

/// What a restore replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub components: usize,
    pub projects: usize,
    pub analytics_replaced: bool,
    pub image_library_replaced: bool,
}

// =============================================================================
// EXPORT
// =============================================================================

/// Snapshot every collection.
///
/// # Errors
///
/// Returns `Store` if any collection cannot be read.
pub async fn export_backup(inventory: &Inventory) -> Result<Snapshot, InventoryError> {
    let store = inventory.store();
    let mut components = store.get_all().await?;
    registry::sort_registry(&mut components);
    let mut projects = store.projects().await?;
    projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let snapshot = Snapshot {
        version: BACKUP_VERSION,
        exported_at: inventory.now_ms(),
        components,
        projects,
        analytics: store.analytics().await?,
        custom_image_library: store.image_library().await?,
    };
    info!(
        components = snapshot.components.len(),
        projects = snapshot.projects.len(),
        "exported backup"
    );
    Ok(snapshot)
}

// =============================================================================
// RESTORE
// =============================================================================

fn format_err(message: impl Into<String>) -> InventoryError {
    InventoryError::BackupFormat(message.into())
}

fn required_array<'a>(payload: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a Vec<Value>, InventoryError> {
    match payload.get(key) {
        None => Err(format_err(format!("missing required key `{key}`"))),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(format_err(format!("`{key}` must be an array"))),
    }
}

fn decode_components(items: &[Value]) -> Result<Vec<Component>, InventoryError> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut components = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let component: Component =
            serde_json::from_value(item.clone()).map_err(|e| format_err(format!("components[{index}]: {e}")))?;
        registry::check_component(&component).map_err(|e| format_err(format!("components[{index}]: {e}")))?;
        if !seen.insert(component.id) {
            return Err(format_err(format!("components[{index}]: duplicate id {}", component.id)));
        }
        components.push(component);
    }
    Ok(components)
}

fn decode_projects(items: &[Value]) -> Result<Vec<Project>, InventoryError> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut projects = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let project: Project =
            serde_json::from_value(item.clone()).map_err(|e| format_err(format!("projects[{index}]: {e}")))?;
        if !seen.insert(project.id) {
            return Err(format_err(format!("projects[{index}]: duplicate id {}", project.id)));
        }
        projects.push(project);
    }
    Ok(projects)
}

/// Decode a backup payload into the batch that would restore it.
fn plan_restore(payload: &Value) -> Result<(Vec<Replacement>, RestoreSummary), InventoryError> {
    let Some(payload) = payload.as_object() else {
        return Err(format_err("backup payload must be a JSON object"));
    };

    let components = decode_components(required_array(payload, "components")?)?;
    let projects = decode_projects(required_array(payload, "projects")?)?;

    let mut summary = RestoreSummary {
        components: components.len(),
        projects: projects.len(),
        analytics_replaced: false,
        image_library_replaced: false,
    };
    let mut batch = vec![Replacement::Components(components), Replacement::Projects(projects)];

    if let Some(analytics) = payload.get("analytics") {
        batch.push(Replacement::Analytics(analytics.clone()));
        summary.analytics_replaced = true;
    }
    match payload.get("customImageLibrary") {
        None => {}
        Some(Value::Array(items)) => {
            batch.push(Replacement::ImageLibrary(items.clone()));
            summary.image_library_replaced = true;
        }
        Some(_) => return Err(format_err("`customImageLibrary` must be an array")),
    }

    Ok((batch, summary))
}

/// Overwrite the store with a backup payload, all or nothing.
///
/// # Errors
///
/// Returns `BackupFormat` if a required key is missing or any record fails to
/// decode or validate, and `Store` if the commit fails. In both cases no
/// collection changes.
pub async fn import_backup(inventory: &Inventory, payload: &Value) -> Result<RestoreSummary, InventoryError> {
    let (batch, summary) = match plan_restore(payload) {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, "backup restore rejected");
            return Err(e);
        }
    };

    inventory.store().batch_replace(batch).await?;
    info!(
        components = summary.components,
        projects = summary.projects,
        analytics_replaced = summary.analytics_replaced,
        image_library_replaced = summary.image_library_replaced,
        "restored backup"
    );
    Ok(summary)
}

/// Parse raw backup text, then restore it.
///
/// # Errors
///
/// Returns `BackupFormat` for text that is not JSON, otherwise as
/// [`import_backup`].
pub async fn import_backup_str(inventory: &Inventory, raw: &str) -> Result<RestoreSummary, InventoryError> {
    let payload: Value = serde_json::from_str(raw).map_err(|e| format_err(format!("not valid JSON: {e}")))?;
    import_backup(inventory, &payload).await
}

#[cfg(test)]
#[path = "backup_test.rs"]
mod tests;
