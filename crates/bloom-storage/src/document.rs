use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use uuid::Uuid;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A JSON document store partitioned into named collections.
///
/// Backends do not order query results and never retry; both are the
/// caller's concern.
pub trait DocumentStore: Send + Sync {
    /// Store a new document under `id`. Fails with
    /// [`StorageError::AlreadyExists`] if the id is taken.
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Fetch one document. None = doesn't exist.
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Value>, StorageError>>;

    /// All documents whose top-level `field` equals `value`.
    fn query_by_field<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<Vec<Value>, StorageError>>;

    /// Overwrite an existing document. Fails with
    /// [`StorageError::NotFound`] if there is nothing to replace.
    fn replace<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Delete a document. Fails with [`StorageError::NotFound`] if absent.
    fn remove<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<(), StorageError>>;
}

/// True if `document` is an object whose top-level `field` equals `value`.
pub fn field_matches(document: &Value, field: &str, value: &Value) -> bool {
    document.get(field) == Some(value)
}
