//! Document collection and key conventions.
//!
//! Pure string functions with no storage dependency. These define where
//! assessment records live in every document-store backend.

use uuid::Uuid;

pub const ASSESSMENTS: &str = "analysis_results";

/// Field the assessment history is partitioned by.
pub const CHILD_ID_FIELD: &str = "child_id";

pub fn collection_prefix(collection: &str) -> String {
    format!("{collection}/")
}

pub fn document(collection: &str, id: Uuid) -> String {
    format!("{collection}/{id}.json")
}

/// Recover the document id from a key built by [`document`].
pub fn document_id(key: &str) -> Option<Uuid> {
    let file = key.rsplit('/').next()?;
    let stem = file.strip_suffix(".json")?;
    Uuid::parse_str(stem).ok()
}
