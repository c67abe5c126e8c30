use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use bloom_core::doc_keys;

use crate::document::{field_matches, BoxFuture, DocumentStore};
use crate::error::StorageError;

/// Process-local store. Used by tests and by callers that only need a
/// session-scoped history.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<Uuid, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            if docs.contains_key(&id) {
                return Err(StorageError::AlreadyExists {
                    key: doc_keys::document(collection, id),
                });
            }
            docs.insert(id, document);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections.get(collection).and_then(|docs| docs.get(&id)).cloned())
        })
    }

    fn query_by_field<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .map(|docs| {
                    docs.values()
                        .filter(|doc| field_matches(doc, field, value))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn replace<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            match collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) {
                Some(existing) => {
                    *existing = document;
                    Ok(())
                }
                None => Err(StorageError::NotFound {
                    key: doc_keys::document(collection, id),
                }),
            }
        })
    }

    fn remove<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(&id))
                .map(|_| ())
                .ok_or_else(|| StorageError::NotFound {
                    key: doc_keys::document(collection, id),
                })
        })
    }
}
