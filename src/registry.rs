//! Component registry: create, update, delete, availability switch.
//!
//! DESIGN
//! ======
//! Every single-component mutation is a read-modify-write keyed by id: load
//! from the store, validate against the loaded pre-image, write back. Nothing
//! is written when validation fails. `clear_all` goes through the store's
//! atomic batch so a failed wipe leaves the registry intact.

use tracing::info;
use uuid::Uuid;

use crate::error::{CapacityError, InventoryError};
use crate::inventory::Inventory;
use crate::model::{Category, Component, ComponentInput};
use crate::store::Replacement;

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_name(name: &str) -> Result<String, InventoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::validation("name must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// Check the ledger invariants of a whole component: non-empty name, well
/// formed issue records, and issued units never above the total.
pub(crate) fn check_component(component: &Component) -> Result<(), InventoryError> {
    validate_name(&component.name)?;
    for issue in &component.issued_to {
        if issue.quantity == 0 {
            return Err(InventoryError::validation(format!("issue {} has quantity 0", issue.id)));
        }
        if issue.student_name.trim().is_empty() {
            return Err(InventoryError::validation(format!("issue {} has no student name", issue.id)));
        }
    }
    let issued = component.issued_units();
    if issued > u64::from(component.total_quantity) {
        return Err(CapacityError::BelowIssued { total: component.total_quantity, issued }.into());
    }
    Ok(())
}

/// Registry order: oldest first, then name, then id.
pub(crate) fn sort_registry(components: &mut [Component]) {
    components.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Build a fresh component from input without storing it.
pub(crate) fn build_component(inventory: &Inventory, input: ComponentInput) -> Result<Component, InventoryError> {
    let name = validate_name(&input.name)?;
    Ok(Component {
        id: inventory.next_id(),
        name,
        description: input.description,
        category: input.category,
        total_quantity: input.total_quantity,
        issued_to: Vec::new(),
        image_url: input.image_url.filter(|url| !url.trim().is_empty()),
        is_available: input.is_available,
        low_stock_threshold: input.low_stock_threshold,
        links: input.links,
        is_under_maintenance: false,
        maintenance_log: Vec::new(),
        created_at: inventory.now_ms(),
    })
}

// =============================================================================
// CRUD
// =============================================================================

/// Create and store a new component.
///
/// # Errors
///
/// Returns `Validation` if the name is blank.
pub async fn create(inventory: &Inventory, input: ComponentInput) -> Result<Component, InventoryError> {
    let component = build_component(inventory, input)?;
    inventory.store().put(&component).await?;
    info!(component_id = %component.id, name = %component.name, total = component.total_quantity, "created component");
    Ok(component)
}

/// Fetch one component.
///
/// # Errors
///
/// Returns `NotFound` for unknown ids.
pub async fn get(inventory: &Inventory, id: Uuid) -> Result<Component, InventoryError> {
    inventory.load(id).await
}

/// All components in registry order.
///
/// # Errors
///
/// Returns `Store` if the adapter fails.
pub async fn list(inventory: &Inventory) -> Result<Vec<Component>, InventoryError> {
    let mut components = inventory.store().get_all().await?;
    sort_registry(&mut components);
    Ok(components)
}

/// Replace every mutable field of a stored component. `id` selects the
/// record; `created_at` always keeps the stored value.
///
/// # Errors
///
/// Returns `NotFound` for unknown ids, `Validation` for a blank name or a
/// malformed issue record, and `Capacity` if `total_quantity` would drop
/// below the units currently issued.
pub async fn update(inventory: &Inventory, component: Component) -> Result<Component, InventoryError> {
    let current = inventory.load(component.id).await?;

    let mut updated = component;
    updated.name = validate_name(&updated.name)?;
    updated.created_at = current.created_at;
    check_component(&updated)?;

    inventory.store().put(&updated).await?;
    info!(component_id = %updated.id, total = updated.total_quantity, "updated component");
    Ok(updated)
}

/// Remove a component together with its ledger and log.
///
/// # Errors
///
/// Returns `NotFound` for unknown ids.
pub async fn delete(inventory: &Inventory, id: Uuid) -> Result<(), InventoryError> {
    if !inventory.store().remove(id).await? {
        return Err(InventoryError::component_not_found(id));
    }
    info!(component_id = %id, "deleted component");
    Ok(())
}

/// Remove every component in one atomic batch. Returns how many were removed.
///
/// # Errors
///
/// Returns `Store` if the batch fails; the registry is then unchanged.
pub async fn clear_all(inventory: &Inventory) -> Result<usize, InventoryError> {
    let count = inventory.store().get_all().await?.len();
    inventory
        .store()
        .batch_replace(vec![Replacement::Components(Vec::new())])
        .await?;
    info!(count, "cleared registry");
    Ok(count)
}

/// Flip the manual availability switch.
///
/// # Errors
///
/// Returns `NotFound` for unknown ids.
pub async fn toggle_availability(inventory: &Inventory, id: Uuid) -> Result<Component, InventoryError> {
    let mut component = inventory.load(id).await?;
    component.is_available = !component.is_available;
    inventory.store().put(&component).await?;
    info!(component_id = %id, is_available = component.is_available, "toggled availability");
    Ok(component)
}

// =============================================================================
// CATALOG FILTER
// =============================================================================

/// Catalog search criteria. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    /// Case-insensitive substring over name and description.
    pub query: Option<String>,
    pub category: Option<Category>,
    /// Only components that could be issued right now.
    pub issuable_only: bool,
}

impl ComponentFilter {
    #[must_use]
    pub fn matches(&self, component: &Component) -> bool {
        if self.category.is_some_and(|category| category != component.category) {
            return false;
        }
        if self.issuable_only && !component.is_issuable() {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                component.name.to_lowercase().contains(&needle)
                    || component.description.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Apply a filter, preserving input order.
#[must_use]
pub fn filter<'a>(components: &'a [Component], criteria: &ComponentFilter) -> Vec<&'a Component> {
    components.iter().filter(|c| criteria.matches(c)).collect()
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
