//! bloom-storage
//!
//! Document-store capability consumed by the assessment history, with
//! in-memory, local-directory and S3 backends.

pub mod backends;
pub mod client;
pub mod document;
pub mod error;
pub mod objects;

pub use document::{BoxFuture, DocumentStore};
