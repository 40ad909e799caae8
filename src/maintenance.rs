//! Maintenance log: lockout flag and append-only history.
//!
//! The lockout flag and the log are independent: toggling never writes a log
//! entry and deleting an entry never clears the lockout.

use tracing::info;
use uuid::Uuid;

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::model::{Component, MaintenanceRecord};

/// Flip the maintenance lockout. While set, every issue is refused.
///
/// # Errors
///
/// Returns `NotFound` for unknown components.
pub async fn toggle_maintenance(inventory: &Inventory, component_id: Uuid) -> Result<Component, InventoryError> {
    let mut component = inventory.load(component_id).await?;
    component.is_under_maintenance = !component.is_under_maintenance;
    inventory.store().put(&component).await?;
    info!(%component_id, under_maintenance = component.is_under_maintenance, "toggled maintenance");
    Ok(component)
}

/// Append a log entry. Blank notes are skipped without error and without a
/// write; `Ok(None)` signals the skip.
///
/// # Errors
///
/// Returns `NotFound` for unknown components.
pub async fn add_log(
    inventory: &Inventory,
    component_id: Uuid,
    notes: &str,
) -> Result<Option<MaintenanceRecord>, InventoryError> {
    let notes = notes.trim();
    if notes.is_empty() {
        return Ok(None);
    }

    let mut component = inventory.load(component_id).await?;
    let record = MaintenanceRecord { id: inventory.next_id(), date: inventory.now_ms(), notes: notes.to_owned() };
    component.maintenance_log.push(record.clone());
    inventory.store().put(&component).await?;

    info!(%component_id, log_id = %record.id, "added maintenance log");
    Ok(Some(record))
}

/// Remove one log entry by id.
///
/// # Errors
///
/// Returns `NotFound` if the component or the entry does not exist.
pub async fn delete_log(inventory: &Inventory, component_id: Uuid, log_id: Uuid) -> Result<Component, InventoryError> {
    let mut component = inventory.load(component_id).await?;
    let before = component.maintenance_log.len();
    component.maintenance_log.retain(|entry| entry.id != log_id);
    if component.maintenance_log.len() == before {
        return Err(InventoryError::NotFound { kind: "maintenance log", id: log_id });
    }
    inventory.store().put(&component).await?;

    info!(%component_id, %log_id, "deleted maintenance log");
    Ok(component)
}

#[cfg(test)]
#[path = "maintenance_test.rs"]
mod tests;
