use super::*;
use crate::inventory::test_helpers;

#[test]
fn category_parse_is_exact() {
    assert_eq!(Category::parse("Sensors"), Some(Category::Sensors));
    assert_eq!(Category::parse("Passive Components"), Some(Category::PassiveComponents));
    assert_eq!(Category::parse("sensors"), None);
    assert_eq!(Category::parse(" Sensors"), None);
    assert_eq!(Category::parse("Gadgets"), None);
}

#[test]
fn category_display_matches_parse() {
    for category in Category::ALL {
        assert_eq!(Category::parse(&category.to_string()), Some(category));
    }
}

#[test]
fn category_serializes_as_display_string() {
    let json = serde_json::to_string(&Category::PassiveComponents).unwrap();
    assert_eq!(json, "\"Passive Components\"");
    let parsed: Category = serde_json::from_str("\"Tools\"").unwrap();
    assert_eq!(parsed, Category::Tools);
}

#[test]
fn available_quantity_subtracts_issued() {
    let component = test_helpers::component("Servo", 10, &[3, 2]);
    assert_eq!(component.issued_units(), 5);
    assert_eq!(component.available_quantity(), 5);
}

#[test]
fn available_quantity_never_negative() {
    let component = test_helpers::component("Servo", 2, &[3]);
    assert_eq!(component.available_quantity(), 0);
}

#[test]
fn is_issuable_respects_switches() {
    let mut component = test_helpers::component("Servo", 1, &[]);
    assert!(component.is_issuable());
    component.is_under_maintenance = true;
    assert!(!component.is_issuable());
    component.is_under_maintenance = false;
    component.is_available = false;
    assert!(!component.is_issuable());
    component.is_available = true;
    component.issued_to = test_helpers::component("x", 1, &[1]).issued_to;
    assert!(!component.is_issuable());
}

#[test]
fn component_json_uses_camel_case_and_defaults() {
    let json = serde_json::json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "name": "Breadboard",
        "category": "Tools",
        "totalQuantity": 4,
        "createdAt": 1
    });
    let component: Component = serde_json::from_value(json).unwrap();
    assert_eq!(component.total_quantity, 4);
    assert!(component.is_available);
    assert!(!component.is_under_maintenance);
    assert!(component.issued_to.is_empty());
    assert!(component.low_stock_threshold.is_none());

    let out = serde_json::to_value(&component).unwrap();
    assert!(out.get("totalQuantity").is_some());
    assert!(out.get("issuedTo").is_some());
    assert!(out.get("imageUrl").is_none());
}

#[test]
fn project_keeps_collaborator_fields() {
    let json = serde_json::json!({
        "id": "00000000-0000-0000-0000-000000000009",
        "name": "Line follower",
        "status": "in-progress",
        "requiredComponents": [
            {"componentId": "00000000-0000-0000-0000-000000000001", "componentName": "IR sensor", "quantity": 2}
        ]
    });
    let project: Project = serde_json::from_value(json).unwrap();
    assert_eq!(project.required_components.len(), 1);
    assert_eq!(project.extra.get("status").and_then(|v| v.as_str()), Some("in-progress"));

    let out = serde_json::to_value(&project).unwrap();
    assert_eq!(out.get("status").and_then(|v| v.as_str()), Some("in-progress"));
    assert!(out.get("extra").is_none());
}
