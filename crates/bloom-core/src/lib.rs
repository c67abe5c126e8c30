//! bloom-core
//!
//! Pure domain types and document key conventions. No I/O; this is the
//! shared vocabulary of the screening engine and the assessment history.

pub mod doc_keys;
pub mod error;
pub mod models;
