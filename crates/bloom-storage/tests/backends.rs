use bloom_storage::backends::{LocalDocumentStore, MemoryDocumentStore};
use bloom_storage::error::StorageError;
use bloom_storage::DocumentStore;
use serde_json::json;
use uuid::Uuid;

const COLLECTION: &str = "analysis_results";

/// Behavior every backend must share.
async fn exercise(store: &dyn DocumentStore) {
    let alice = json!("child-alice");
    assert!(store
        .query_by_field(COLLECTION, "child_id", &alice)
        .await
        .unwrap()
        .is_empty());

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let other = Uuid::new_v4();
    store
        .insert(COLLECTION, first, json!({"id": first, "child_id": "child-alice", "n": 1}))
        .await
        .unwrap();
    store
        .insert(COLLECTION, second, json!({"id": second, "child_id": "child-alice", "n": 2}))
        .await
        .unwrap();
    store
        .insert(COLLECTION, other, json!({"id": other, "child_id": "child-bob", "n": 3}))
        .await
        .unwrap();

    let duplicate = store
        .insert(COLLECTION, first, json!({"id": first}))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, StorageError::AlreadyExists { .. }));

    let mut found: Vec<i64> = store
        .query_by_field(COLLECTION, "child_id", &alice)
        .await
        .unwrap()
        .iter()
        .map(|d| d["n"].as_i64().unwrap())
        .collect();
    found.sort();
    assert_eq!(found, vec![1, 2]);

    let doc = store.get(COLLECTION, second).await.unwrap().unwrap();
    assert_eq!(doc["n"], 2);
    assert!(store.get(COLLECTION, Uuid::new_v4()).await.unwrap().is_none());

    store
        .replace(COLLECTION, second, json!({"id": second, "child_id": "child-alice", "n": 20}))
        .await
        .unwrap();
    assert_eq!(store.get(COLLECTION, second).await.unwrap().unwrap()["n"], 20);
    assert!(matches!(
        store.replace(COLLECTION, Uuid::new_v4(), json!({})).await,
        Err(StorageError::NotFound { .. })
    ));

    store.remove(COLLECTION, first).await.unwrap();
    assert!(store.get(COLLECTION, first).await.unwrap().is_none());
    assert!(matches!(
        store.remove(COLLECTION, first).await,
        Err(StorageError::NotFound { .. })
    ));

    let remaining = store
        .query_by_field(COLLECTION, "child_id", &alice)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn memory_backend() {
    let store = MemoryDocumentStore::new();
    exercise(&store).await;
    assert_eq!(store.len(COLLECTION).await, 2);
    assert_eq!(store.len("other").await, 0);
}

#[tokio::test]
async fn local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDocumentStore::new(dir.path());
    exercise(&store).await;
}

#[tokio::test]
async fn local_backend_uses_document_keys_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDocumentStore::new(dir.path());
    let id = Uuid::new_v4();
    store
        .insert(COLLECTION, id, json!({"child_id": "c"}))
        .await
        .unwrap();

    let path = dir.path().join(COLLECTION).join(format!("{id}.json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn local_backend_skips_unreadable_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDocumentStore::new(dir.path());
    let id = Uuid::new_v4();
    store
        .insert(COLLECTION, id, json!({"child_id": "c"}))
        .await
        .unwrap();
    std::fs::write(dir.path().join(COLLECTION).join("broken.json"), b"{not json").unwrap();
    std::fs::write(dir.path().join(COLLECTION).join("notes.txt"), b"ignored").unwrap();

    let found = store
        .query_by_field(COLLECTION, "child_id", &json!("c"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn local_backend_reports_corrupt_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDocumentStore::new(dir.path());
    let id = Uuid::new_v4();
    store
        .insert(COLLECTION, id, json!({"child_id": "c"}))
        .await
        .unwrap();
    let path = dir.path().join(COLLECTION).join(format!("{id}.json"));
    std::fs::write(&path, b"{not json").unwrap();

    assert!(matches!(
        store.get(COLLECTION, id).await,
        Err(StorageError::Corrupt { .. })
    ));
    assert!(store
        .query_by_field(COLLECTION, "child_id", &json!("c"))
        .await
        .unwrap()
        .is_empty());

    store
        .replace(COLLECTION, id, json!({"child_id": "c", "fixed": true}))
        .await
        .unwrap();
    assert_eq!(store.get(COLLECTION, id).await.unwrap().unwrap()["fixed"], true);
}
