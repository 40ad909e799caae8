//! Low-stock evaluator and inventory report.
//!
//! DESIGN
//! ======
//! Both views are pure functions over a registry snapshot. They are
//! recomputed from scratch on every call and never persisted, so there is no
//! cache to go stale when the ledger changes.

use serde::Serialize;

use crate::model::Component;

/// Threshold set, available at or below it, and not under maintenance.
/// Components in maintenance are already flagged by the lockout.
#[must_use]
pub fn is_low_stock(component: &Component) -> bool {
    match component.low_stock_threshold {
        Some(threshold) => !component.is_under_maintenance && component.available_quantity() <= threshold,
        None => false,
    }
}

/// Low-stock components, most depleted first (available ascending, then name,
/// then id).
#[must_use]
pub fn derive_low_stock(components: &[Component]) -> Vec<Component> {
    let mut flagged: Vec<Component> = components.iter().filter(|c| is_low_stock(c)).cloned().collect();
    flagged.sort_by(|a, b| {
        a.available_quantity()
            .cmp(&b.available_quantity())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    flagged
}

// =============================================================================
// REPORT
// =============================================================================

/// Dashboard counters over a registry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub component_count: usize,
    pub total_units: u64,
    pub issued_units: u64,
    pub available_units: u64,
    pub active_issues: usize,
    pub under_maintenance: usize,
    pub hidden: usize,
    pub low_stock: usize,
}

#[must_use]
pub fn summarize(components: &[Component]) -> InventoryReport {
    components.iter().fold(InventoryReport::default(), |mut report, component| {
        report.component_count += 1;
        report.total_units += u64::from(component.total_quantity);
        report.issued_units += component.issued_units();
        report.available_units += u64::from(component.available_quantity());
        report.active_issues += component.issued_to.len();
        report.under_maintenance += usize::from(component.is_under_maintenance);
        report.hidden += usize::from(!component.is_available);
        report.low_stock += usize::from(is_low_stock(component));
        report
    })
}

#[cfg(test)]
#[path = "low_stock_test.rs"]
mod tests;
