//! Content Store Layer
//!
//! This module abstracts the hierarchical content store behind the
//! `ContentStore` trait and provides the embedded in-memory backend:
//!
//! - `ContentStore` - move/create/property/capability/commit/remove contract
//! - `StoreError` - typed failures (path conflicts, missing nodes/properties)
//! - `MemoryStore` - embedded reference backend, also used by tests
//!
//! The trait is the abstraction point between the migration logic and a
//! concrete repository backend; the migration never assumes more than the
//! contract documented on the trait.

mod content_store;
mod error;
mod memory;

pub use content_store::ContentStore;
pub use error::StoreError;
pub use memory::MemoryStore;
