use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use uuid::Uuid;

use bloom_core::doc_keys;

use crate::document::{field_matches, BoxFuture, DocumentStore};
use crate::error::StorageError;

/// Documents as pretty-printed JSON files under `root`, laid out with the
/// same keys the S3 backend uses.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: &str, id: Uuid) -> PathBuf {
        self.root.join(doc_keys::document(collection, id))
    }

    /// Write atomically: tmp file + rename.
    async fn write(&self, path: &Path, document: &Value) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(document)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, path).await?;

        tracing::debug!(path = %path.display(), "document written to local disk");
        Ok(())
    }

    async fn read(path: &Path) -> Result<Option<Value>, StorageError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: path.display().to_string(),
                    source,
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl DocumentStore for LocalDocumentStore {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let path = self.path_for(collection, id);
            if tokio::fs::try_exists(&path).await? {
                return Err(StorageError::AlreadyExists {
                    key: doc_keys::document(collection, id),
                });
            }
            self.write(&path, &document).await
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move { Self::read(&self.path_for(collection, id)).await })
    }

    fn query_by_field<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async move {
            let dir = self.root.join(collection);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };

            let mut matches = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                match Self::read(&path).await {
                    Ok(Some(doc)) if field_matches(&doc, field, value) => matches.push(doc),
                    Ok(_) => {}
                    Err(StorageError::Corrupt { key, source }) => {
                        tracing::warn!(key = %key, error = %source, "skipping unreadable document");
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
            let path = self.path_for(collection, id);
            if !tokio::fs::try_exists(&path).await? {
                return Err(StorageError::NotFound {
                    key: doc_keys::document(collection, id),
                });
            }
            self.write(&path, &document).await
        })
    }

    fn remove<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            match tokio::fs::remove_file(self.path_for(collection, id)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                    key: doc_keys::document(collection, id),
                }),
                Err(e) => Err(e.into()),
            }
        })
    }
}
