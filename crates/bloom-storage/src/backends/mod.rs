pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalDocumentStore;
pub use memory::MemoryDocumentStore;
pub use s3::S3DocumentStore;
