//! studyhub-store — In-memory relational store and file storage.
//!
//! Stands in for the backing relational database: entities live in
//! `Mutex`-guarded tables, ids are assigned monotonically, and the whole
//! store can be snapshotted to JSON. Uploaded files land in a namespaced
//! directory tree with an extension allow-list enforced before writes.

pub mod catalog;
pub mod files;
pub mod memory;

pub use catalog::{ResourceCatalog, ResourceKind};
pub use files::LocalFileStore;
pub use memory::MemoryStore;
