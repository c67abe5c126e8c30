use aws_sdk_s3::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bloom_core::doc_keys;

use crate::document::{field_matches, BoxFuture, DocumentStore};
use crate::error::StorageError;
use crate::objects;

/// Documents as JSON objects in an S3 bucket at `<collection>/<id>.json`.
///
/// Queries list the collection prefix and filter client-side, one GET per
/// document.
#[derive(Debug, Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match objects::get_object(&self.client, &self.bucket, key).await {
            Ok(body) => serde_json::from_slice(&body)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Existence check that does not parse the body, so corrupt documents
    /// can still be replaced or removed.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match objects::get_object(&self.client, &self.bucket, key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl DocumentStore for S3DocumentStore {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = doc_keys::document(collection, id);
            let body = serde_json::to_vec(&document)?;
            objects::put_json_if_absent(&self.client, &self.bucket, &key, body).await?;
            info!("document stored at s3://{}/{}", self.bucket, key);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move { self.load(&doc_keys::document(collection, id)).await })
    }

    fn query_by_field<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async move {
            let prefix = doc_keys::collection_prefix(collection);
            let keys = objects::list_objects(&self.client, &self.bucket, &prefix).await?;
            debug!(bucket = %self.bucket, prefix = %prefix, count = keys.len(), "listed collection");

            let mut matches = Vec::new();
            for key in keys.iter().filter(|k| doc_keys::document_id(k).is_some()) {
                // Ok(None): deleted between list and get.
                match self.load(key).await {
                    Ok(Some(doc)) if field_matches(&doc, field, value) => matches.push(doc),
                    Ok(_) => {}
                    Err(StorageError::Corrupt { key, source }) => {
                        warn!(key = %key, error = %source, "skipping unreadable document");
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(matches)
        })
    }

    fn replace<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = doc_keys::document(collection, id);
            if !self.exists(&key).await? {
                return Err(StorageError::NotFound { key });
            }
            let body = serde_json::to_vec(&document)?;
            objects::put_json(&self.client, &self.bucket, &key, body).await?;
            info!("document replaced at s3://{}/{}", self.bucket, key);
            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = doc_keys::document(collection, id);
            if !self.exists(&key).await? {
                return Err(StorageError::NotFound { key });
            }
            objects::delete_object(&self.client, &self.bucket, &key).await?;
            info!("document deleted at s3://{}/{}", self.bucket, key);
            Ok(())
        })
    }
}
