use super::*;
use crate::inventory::test_helpers::{self, StepClock};
use crate::{maintenance, registry};

#[tokio::test]
async fn issue_reduces_available_and_overdraw_is_refused() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Arduino Uno", 10).await;

    let first = issue(&inventory, component.id, "Amy", 4).await.unwrap();
    assert_eq!(first.student_name, "Amy");
    assert_eq!(first.quantity, 4);
    let after = registry::get(&inventory, component.id).await.unwrap();
    assert_eq!(available_quantity(&after), 6);

    let err = issue(&inventory, component.id, "Ben", 7).await.unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::Exceeded { requested: 7, available: 6 })));
    let unchanged = registry::get(&inventory, component.id).await.unwrap();
    assert_eq!(unchanged.issued_to.len(), 1);
}

#[tokio::test]
async fn issue_can_drain_to_zero() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Servo", 3).await;

    issue(&inventory, component.id, "Amy", 3).await.unwrap();
    let drained = registry::get(&inventory, component.id).await.unwrap();
    assert_eq!(drained.available_quantity(), 0);

    let err = issue(&inventory, component.id, "Ben", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::Exceeded { available: 0, .. })));
}

#[tokio::test]
async fn issue_records_trimmed_student_and_clock_time() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Servo", 3).await;

    let record = issue(&inventory, component.id, "  Amy  ", 1).await.unwrap();
    assert_eq!(record.student_name, "Amy");
    assert!(record.issued_date > StepClock::START_MS);
}

#[tokio::test]
async fn issue_rejects_blank_student_and_zero_quantity() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Servo", 3).await;

    assert!(matches!(issue(&inventory, component.id, "  ", 1).await.unwrap_err(), InventoryError::Validation(_)));
    assert!(matches!(issue(&inventory, component.id, "Amy", 0).await.unwrap_err(), InventoryError::Validation(_)));
}

#[tokio::test]
async fn issue_refused_while_under_maintenance() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Multimeter", 5).await;
    maintenance::toggle_maintenance(&inventory, component.id).await.unwrap();

    let err = issue(&inventory, component.id, "Amy", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::UnderMaintenance)));

    maintenance::toggle_maintenance(&inventory, component.id).await.unwrap();
    issue(&inventory, component.id, "Amy", 1).await.unwrap();
}

#[tokio::test]
async fn issue_refused_when_hidden() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Multimeter", 5).await;
    registry::toggle_availability(&inventory, component.id).await.unwrap();

    let err = issue(&inventory, component.id, "Amy", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::Unavailable)));
}

#[test]
fn maintenance_is_reported_before_quantity() {
    let mut component = test_helpers::component("Multimeter", 1, &[1]);
    component.is_under_maintenance = true;
    let err = check_issue(&component, "Amy", 5).unwrap_err();
    assert!(matches!(err, InventoryError::Capacity(CapacityError::UnderMaintenance)));
}

#[tokio::test]
async fn issue_unknown_component_is_not_found() {
    let (inventory, _) = test_helpers::test_inventory();
    let err = issue(&inventory, Uuid::from_u128(42), "Amy", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound { kind: "component", .. }));
}

#[tokio::test]
async fn return_restores_availability_and_second_return_fails() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Arduino Uno", 10).await;
    let record = issue(&inventory, component.id, "Amy", 4).await.unwrap();

    let returned = return_issue(&inventory, component.id, record.id).await.unwrap();
    assert_eq!(returned, record);
    let after = registry::get(&inventory, component.id).await.unwrap();
    assert_eq!(after.available_quantity(), 10);
    assert!(after.issued_to.is_empty());

    let err = return_issue(&inventory, component.id, record.id).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound { kind: "issue", .. }));
}

#[tokio::test]
async fn return_allowed_under_maintenance() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Arduino Uno", 10).await;
    let record = issue(&inventory, component.id, "Amy", 4).await.unwrap();
    maintenance::toggle_maintenance(&inventory, component.id).await.unwrap();

    return_issue(&inventory, component.id, record.id).await.unwrap();
}

#[tokio::test]
async fn return_only_removes_the_named_issue() {
    let (inventory, _) = test_helpers::test_inventory();
    let component = test_helpers::seed(&inventory, "Jumper wires", 20).await;
    let amy = issue(&inventory, component.id, "Amy", 5).await.unwrap();
    let ben = issue(&inventory, component.id, "Ben", 3).await.unwrap();

    return_issue(&inventory, component.id, amy.id).await.unwrap();
    let after = registry::get(&inventory, component.id).await.unwrap();
    assert_eq!(after.issued_to, vec![ben]);
    assert_eq!(after.available_quantity(), 17);
}

#[tokio::test]
async fn issues_for_student_is_case_insensitive_and_ordered() {
    let (inventory, _) = test_helpers::test_inventory();
    let uno = test_helpers::seed(&inventory, "Arduino Uno", 10).await;
    let servo = test_helpers::seed(&inventory, "Servo", 10).await;
    let first = issue(&inventory, servo.id, "Amy", 1).await.unwrap();
    issue(&inventory, uno.id, "Ben", 2).await.unwrap();
    let second = issue(&inventory, uno.id, "amy", 3).await.unwrap();

    let components = registry::list(&inventory).await.unwrap();
    let held = issues_for_student(&components, " AMY ");
    assert_eq!(held.len(), 2);
    assert_eq!(held[0].issue, first);
    assert_eq!(held[0].component_name, "Servo");
    assert_eq!(held[1].issue, second);
    assert_eq!(held[1].component_id, uno.id);

    assert!(issues_for_student(&components, "").is_empty());
    assert!(issues_for_student(&components, "Cleo").is_empty());
}
