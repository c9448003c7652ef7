//! MediaStore Core Migration Layer
//!
//! This crate provides the one-shot node-type migration for the MediaStore
//! content repository: every node tagged with a legacy media class marker
//! (directory, media, file, image) is replaced in place by a node of the new
//! structural kind, keeping its path, children, selected properties and
//! binary content, before the legacy node is removed.
//!
//! # Architecture
//!
//! - **Rename-aside**: the store enforces unique paths, so each legacy node
//!   is moved to `<path>.bak` while its replacement is built at `<path>`
//! - **Fixed phase order**: directories migrate first so that later phases
//!   can resolve freshly created folders as parents
//! - **Node index**: replacements created during the directory phase are
//!   kept in memory and consulted before any live store lookup
//! - **Deferred cleanup**: renamed legacy nodes are deleted only after all
//!   phases completed, with idempotent removal
//!
//! # Modules
//!
//! - [`models`] - Data structures (ContentNode, LegacyType, Capability)
//! - [`store`] - Content store abstraction and the embedded memory backend
//! - [`migration`] - Type converters and the migration orchestrator

pub mod migration;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use migration::*;
pub use models::*;
pub use store::*;
