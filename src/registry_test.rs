use super::*;
use crate::inventory::test_helpers::{self, StepClock};
use crate::ledger;
use crate::store::Store;

#[tokio::test]
async fn create_assigns_identity_and_defaults() {
    let (inventory, _) = test_helpers::test_inventory();
    let mut input = test_helpers::input("  Ultrasonic sensor ", 0);
    input.image_url = Some("   ".into());

    let component = create(&inventory, input).await.unwrap();
    assert_eq!(component.id, Uuid::from_u128(1));
    assert_eq!(component.name, "Ultrasonic sensor");
    assert_eq!(component.total_quantity, 0);
    assert_eq!(component.created_at, StepClock::START_MS);
    assert!(!component.is_under_maintenance);
    assert!(component.issued_to.is_empty());
    assert!(component.maintenance_log.is_empty());
    assert!(component.image_url.is_none());

    assert_eq!(get(&inventory, component.id).await.unwrap(), component);
}

#[tokio::test]
async fn create_rejects_blank_name() {
    let (inventory, store) = test_helpers::test_inventory();
    let result = create(&inventory, test_helpers::input("   ", 3)).await;
    assert!(matches!(result.unwrap_err(), InventoryError::Validation(_)));
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_in_creation_order() {
    let (inventory, _) = test_helpers::test_inventory();
    test_helpers::seed(&inventory, "Zener diode", 5).await;
    test_helpers::seed(&inventory, "Arduino Uno", 5).await;
    let names: Vec<String> = list(&inventory).await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Zener diode", "Arduino Uno"]);
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_created_at() {
    let (inventory, _) = test_helpers::test_inventory();
    let original = test_helpers::seed(&inventory, "Servo", 4).await;

    let mut edited = original.clone();
    edited.name = "Micro servo".into();
    edited.total_quantity = 8;
    edited.category = Category::Actuators;
    edited.low_stock_threshold = Some(2);
    edited.created_at = 0;

    let updated = update(&inventory, edited).await.unwrap();
    assert_eq!(updated.name, "Micro servo");
    assert_eq!(updated.total_quantity, 8);
    assert_eq!(updated.category, Category::Actuators);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(get(&inventory, original.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_rejects_total_below_issued() {
    let (inventory, _) = test_helpers::test_inventory();
    let original = test_helpers::seed(&inventory, "Servo", 10).await;
    ledger::issue(&inventory, original.id, "Amy", 6).await.unwrap();

    let mut edited = get(&inventory, original.id).await.unwrap();
    edited.total_quantity = 5;
    let err = update(&inventory, edited).await.unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::BelowIssued { total: 5, issued: 6 })));
    assert_eq!(get(&inventory, original.id).await.unwrap().total_quantity, 10);
}

#[tokio::test]
async fn update_allows_total_equal_to_issued() {
    let (inventory, _) = test_helpers::test_inventory();
    let original = test_helpers::seed(&inventory, "Servo", 10).await;
    ledger::issue(&inventory, original.id, "Amy", 6).await.unwrap();

    let mut edited = get(&inventory, original.id).await.unwrap();
    edited.total_quantity = 6;
    let updated = update(&inventory, edited).await.unwrap();
    assert_eq!(updated.available_quantity(), 0);
}

#[tokio::test]
async fn update_unknown_component_is_not_found() {
    let (inventory, _) = test_helpers::test_inventory();
    let stray = test_helpers::component("Ghost", 1, &[]);
    assert!(matches!(update(&inventory, stray).await.unwrap_err(), InventoryError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_and_second_delete_fails() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Relay", 2).await;

    delete(&inventory, component.id).await.unwrap();
    assert!(matches!(get(&inventory, component.id).await.unwrap_err(), InventoryError::NotFound { .. }));
    assert!(matches!(delete(&inventory, component.id).await.unwrap_err(), InventoryError::NotFound { .. }));
}

#[tokio::test]
async fn clear_all_empties_registry() {
    let (inventory, _) = test_helpers::test_inventory();
    test_helpers::seed(&inventory, "A", 1).await;
    test_helpers::seed(&inventory, "B", 1).await;

    assert_eq!(clear_all(&inventory).await.unwrap(), 2);
    assert!(list(&inventory).await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_all_failure_leaves_registry_intact() {
    let (inventory, store) = test_helpers::test_inventory();
    test_helpers::seed(&inventory, "A", 1).await;
    store.set_read_only(true);

    assert!(matches!(clear_all(&inventory).await.unwrap_err(), InventoryError::Store(_)));
    assert_eq!(list(&inventory).await.unwrap().len(), 1);
}

#[tokio::test]
async fn toggle_availability_flips_only_the_flag() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Motor driver", 3).await;

    let hidden = toggle_availability(&inventory, component.id).await.unwrap();
    assert!(!hidden.is_available);
    assert_eq!(hidden.total_quantity, 3);
    assert!(!hidden.is_under_maintenance);

    let shown = toggle_availability(&inventory, component.id).await.unwrap();
    assert!(shown.is_available);
}

#[test]
fn filter_matches_query_category_and_issuable() {
    let mut sensor = test_helpers::component("Ultrasonic sensor", 2, &[]);
    sensor.description = "HC-SR04 distance".into();
    let mut board = test_helpers::component("Arduino Nano", 1, &[1]);
    board.category = Category::Microcontrollers;
    let components = vec![sensor, board];

    let by_query = ComponentFilter { query: Some("hc-sr04".into()), ..ComponentFilter::default() };
    assert_eq!(filter(&components, &by_query).len(), 1);

    let by_category = ComponentFilter { category: Some(Category::Microcontrollers), ..ComponentFilter::default() };
    assert_eq!(filter(&components, &by_category)[0].name, "Arduino Nano");

    let issuable = ComponentFilter { issuable_only: true, ..ComponentFilter::default() };
    assert_eq!(filter(&components, &issuable)[0].name, "Ultrasonic sensor");

    let blank = ComponentFilter { query: Some("  ".into()), ..ComponentFilter::default() };
    assert_eq!(filter(&components, &blank).len(), 2);
}
