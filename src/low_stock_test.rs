use super::*;
use crate::inventory::test_helpers;

fn with_threshold(name: &str, total: u32, issued: &[u32], threshold: u32) -> Component {
    let mut component = test_helpers::component(name, total, issued);
    component.low_stock_threshold = Some(threshold);
    component
}

#[test]
fn flags_component_at_or_below_threshold() {
    let component = with_threshold("Servo", 5, &[4], 2);
    assert_eq!(component.available_quantity(), 1);
    assert!(is_low_stock(&component));

    let boundary = with_threshold("Relay", 5, &[3], 2);
    assert!(is_low_stock(&boundary));

    let healthy = with_threshold("LED", 5, &[2], 2);
    assert!(!is_low_stock(&healthy));
}

#[test]
fn no_threshold_is_never_low() {
    let component = test_helpers::component("Servo", 1, &[1]);
    assert!(!is_low_stock(&component));
}

#[test]
fn maintenance_excludes_from_low_stock() {
    let mut component = with_threshold("Servo", 5, &[4], 2);
    component.is_under_maintenance = true;
    assert!(!is_low_stock(&component));
    assert!(derive_low_stock(&[component]).is_empty());
}

#[test]
fn derive_orders_most_depleted_first() {
    let a = with_threshold("Bravo", 10, &[8], 3);
    let b = with_threshold("Alpha", 10, &[8], 3);
    let c = with_threshold("Charlie", 10, &[10], 3);
    let fine = with_threshold("Delta", 10, &[], 3);

    let flagged = derive_low_stock(&[a, b, fine, c]);
    let names: Vec<&str> = flagged.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Alpha", "Bravo"]);
}

#[test]
fn summarize_counts_every_dimension() {
    let low = with_threshold("Servo", 5, &[4], 2);
    let mut hidden = test_helpers::component("Relay", 3, &[1, 1]);
    hidden.is_available = false;
    let mut locked = test_helpers::component("Scope", 1, &[]);
    locked.is_under_maintenance = true;

    let report = summarize(&[low, hidden, locked]);
    assert_eq!(
        report,
        InventoryReport {
            component_count: 3,
            total_units: 9,
            issued_units: 6,
            available_units: 3,
            active_issues: 3,
            under_maintenance: 1,
            hidden: 1,
            low_stock: 1,
        }
    );
}

#[test]
fn summarize_empty_registry() {
    assert_eq!(summarize(&[]), InventoryReport::default());
}
