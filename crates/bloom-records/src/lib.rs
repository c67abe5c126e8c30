//! bloom-records
//!
//! Lifecycle of persisted screening results: create, per-child history,
//! correction and removal, on top of any [`bloom_storage::DocumentStore`].
//! Derived fields are checked against the category scores on every write
//! and every read.

pub mod audit;
pub mod consistency;
pub mod error;
pub mod store;

pub use store::{AssessmentStore, Clock, Correction, NewAssessment};
