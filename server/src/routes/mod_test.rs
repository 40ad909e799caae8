use super::*;
use labstock::{CapacityError, StoreError};
use uuid::Uuid;

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn status_mapping_covers_every_kind() {
    let cases = [
        (InventoryError::Validation("x".into()), StatusCode::BAD_REQUEST),
        (InventoryError::Row { row: 3, message: "x".into() }, StatusCode::BAD_REQUEST),
        (InventoryError::BackupFormat("x".into()), StatusCode::BAD_REQUEST),
        (InventoryError::Capacity(CapacityError::UnderMaintenance), StatusCode::CONFLICT),
        (InventoryError::NotFound { kind: "component", id: Uuid::nil() }, StatusCode::NOT_FOUND),
        (InventoryError::Encoding("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (InventoryError::Store(StoreError::Backend("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
        assert_eq!(inventory_error_to_status(&err), status, "{err}");
    }
}

#[tokio::test]
async fn row_error_body_carries_row_number() {
    let response = ApiError(InventoryError::Row { row: 4, message: "missing category".into() }).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "E_ROW");
    assert_eq!(body["row"], 4);
    assert_eq!(body["message"], "row 4: missing category");
}

#[tokio::test]
async fn other_error_bodies_omit_row() {
    let response = ApiError(CapacityError::Exceeded { requested: 7, available: 6 }.into()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["code"], "E_CAPACITY");
    assert!(body.get("row").is_none());
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}
