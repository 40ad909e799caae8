//! Issuance ledger: checkouts and returns against a component.
//!
//! DESIGN
//! ======
//! The ledger is the `issued_to` list embedded in each component. Available
//! quantity is always recomputed from that list, never cached, so the only
//! way to break conservation would be a bad write, and `issue` checks the
//! loaded pre-image before writing anything.
//!
//! A return removes the whole issue record. Partial returns are not a thing:
//! a student who took 4 and brings back 2 is recorded as a return of the
//! original issue and a fresh issue of 2.

use tracing::info;
use uuid::Uuid;

use crate::error::{CapacityError, InventoryError};
use crate::inventory::Inventory;
use crate::model::{Component, IssueRecord};

/// `total_quantity - Σ issue.quantity`, never negative.
#[must_use]
pub fn available_quantity(component: &Component) -> u32 {
    component.available_quantity()
}

/// Check every precondition of an issue against `component` without
/// mutating it. Maintenance lockout is reported ahead of raw quantity.
///
/// # Errors
///
/// `Validation` for a blank student or zero quantity, `Capacity` for a
/// lockout or a quantity above what is available.
pub fn check_issue(component: &Component, student_name: &str, quantity: u32) -> Result<(), InventoryError> {
    if student_name.trim().is_empty() {
        return Err(InventoryError::validation("student name must not be empty"));
    }
    if quantity == 0 {
        return Err(InventoryError::validation("quantity must be at least 1"));
    }
    if component.is_under_maintenance {
        return Err(CapacityError::UnderMaintenance.into());
    }
    if !component.is_available {
        return Err(CapacityError::Unavailable.into());
    }
    let available = component.available_quantity();
    if quantity > available {
        return Err(CapacityError::Exceeded { requested: quantity, available }.into());
    }
    Ok(())
}

/// Check out `quantity` units to a student.
///
/// # Errors
///
/// `NotFound` for unknown components, otherwise see [`check_issue`].
pub async fn issue(
    inventory: &Inventory,
    component_id: Uuid,
    student_name: &str,
    quantity: u32,
) -> Result<IssueRecord, InventoryError> {
    let mut component = inventory.load(component_id).await?;
    check_issue(&component, student_name, quantity)?;

    let record = IssueRecord {
        id: inventory.next_id(),
        student_name: student_name.trim().to_owned(),
        issued_date: inventory.now_ms(),
        quantity,
    };
    component.issued_to.push(record.clone());
    inventory.store().put(&component).await?;

    info!(
        %component_id,
        issue_id = %record.id,
        quantity,
        available = component.available_quantity(),
        "issued component"
    );
    Ok(record)
}

/// Return an issue in full. Returns the removed record.
///
/// # Errors
///
/// `NotFound` if the component or the issue does not exist, including a
/// second return of an issue that was already removed.
pub async fn return_issue(
    inventory: &Inventory,
    component_id: Uuid,
    issue_id: Uuid,
) -> Result<IssueRecord, InventoryError> {
    let mut component = inventory.load(component_id).await?;
    let Some(position) = component.issued_to.iter().position(|issue| issue.id == issue_id) else {
        return Err(InventoryError::NotFound { kind: "issue", id: issue_id });
    };
    let record = component.issued_to.remove(position);
    inventory.store().put(&component).await?;

    info!(
        %component_id,
        %issue_id,
        quantity = record.quantity,
        available = component.available_quantity(),
        "returned component"
    );
    Ok(record)
}

// =============================================================================
// STUDENT VIEW
// =============================================================================

/// One active checkout with the component it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentIssue {
    pub component_id: Uuid,
    pub component_name: String,
    pub issue: IssueRecord,
}

/// Every active checkout held by `student_name` (trimmed, case-insensitive),
/// oldest first.
#[must_use]
pub fn issues_for_student(components: &[Component], student_name: &str) -> Vec<StudentIssue> {
    let wanted = student_name.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<StudentIssue> = components
        .iter()
        .flat_map(|component| {
            component
                .issued_to
                .iter()
                .filter(|issue| issue.student_name.trim().to_lowercase() == wanted)
                .map(|issue| StudentIssue {
                    component_id: component.id,
                    component_name: component.name.clone(),
                    issue: issue.clone(),
                })
        })
        .collect();
    out.sort_by_key(|entry| (entry.issue.issued_date, entry.issue.id));
    out
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
