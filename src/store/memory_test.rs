use super::*;
use crate::inventory::test_helpers;

#[tokio::test]
async fn put_get_remove_round_trip() {
    let store = MemoryStore::new();
    let component = test_helpers::component("LED", 50, &[]);

    store.put(&component).await.unwrap();
    assert_eq!(store.get_by_id(component.id).await.unwrap(), Some(component.clone()));
    assert_eq!(store.get_all().await.unwrap().len(), 1);

    assert!(store.remove(component.id).await.unwrap());
    assert!(!store.remove(component.id).await.unwrap());
    assert!(store.get_by_id(component.id).await.unwrap().is_none());
}

#[tokio::test]
async fn clones_share_state() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.put(&test_helpers::component("LED", 1, &[])).await.unwrap();
    assert_eq!(other.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn batch_replace_only_touches_listed_collections() {
    let store = MemoryStore::new();
    store.put(&test_helpers::component("Old", 1, &[])).await.unwrap();
    store
        .batch_replace(vec![Replacement::Analytics(serde_json::json!({"issues": 3}))])
        .await
        .unwrap();

    assert_eq!(store.get_all().await.unwrap().len(), 1);
    assert_eq!(store.analytics().await.unwrap(), Some(serde_json::json!({"issues": 3})));

    let fresh = test_helpers::component("New", 2, &[]);
    store
        .batch_replace(vec![Replacement::Components(vec![fresh.clone()]), Replacement::ImageLibrary(vec![])])
        .await
        .unwrap();
    let all = store.get_all().await.unwrap();
    assert_eq!(all, vec![fresh]);
    assert_eq!(store.analytics().await.unwrap(), Some(serde_json::json!({"issues": 3})));
}

#[tokio::test]
async fn read_only_rejects_writes_and_keeps_state() {
    let store = MemoryStore::new();
    let component = test_helpers::component("LED", 1, &[]);
    store.put(&component).await.unwrap();

    store.set_read_only(true);
    assert!(store.put(&test_helpers::component("Other", 1, &[])).await.is_err());
    assert!(store.remove(component.id).await.is_err());
    assert!(store.batch_replace(vec![Replacement::Components(vec![])]).await.is_err());
    assert_eq!(store.get_all().await.unwrap(), vec![component.clone()]);

    store.set_read_only(false);
    assert!(store.remove(component.id).await.unwrap());
}

#[tokio::test]
async fn projects_are_stored_separately() {
    let store = MemoryStore::new();
    let project = Project {
        id: uuid::Uuid::new_v4(),
        name: "Weather station".into(),
        required_components: vec![],
        extra: serde_json::Map::new(),
    };
    store.put_project(&project).await.unwrap();
    assert_eq!(store.get_project(project.id).await.unwrap(), Some(project.clone()));
    assert!(store.get_all().await.unwrap().is_empty());
    assert!(store.remove_project(project.id).await.unwrap());
    assert!(store.projects().await.unwrap().is_empty());
}
