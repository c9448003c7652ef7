//! ContentStore Trait - Store Abstraction Layer
//!
//! This module defines the `ContentStore` trait that abstracts the
//! hierarchical content repository for the migration. The trait enables
//! multiple backends (the embedded `MemoryStore`, a remote repository
//! client) without changing the converters or the orchestrator.
//!
//! # Contract
//!
//! - Paths are absolute, `/`-delimited and unique at any instant
//! - `query_by_class` evaluates against live store state at call time, not
//!   a snapshot: nodes converted by an earlier phase must not reappear in a
//!   later query of a different marker
//! - Node-addressed operations (`set_property`, `remove`, ...) address the
//!   node by its stable id, so handles stay valid across renames
//! - `commit` is the visibility checkpoint for pending mutations; until it
//!   is called, created or moved nodes are not guaranteed visible to
//!   path-level lookup
//! - `remove` is idempotent: removing a node that is already gone is a
//!   no-op, which guards cleanup against double deletion when a queued node
//!   was part of an ancestor's removed subtree

use async_trait::async_trait;
use serde_json::Value;

use super::error::StoreError;
use crate::models::{Capability, ContentNode, NodeKind};

/// Abstraction layer for hierarchical content store operations
///
/// Implementations must be `Send + Sync`; the migration holds the store
/// behind `Arc<dyn ContentStore>` and is its sole writer for the duration
/// of a run.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All unstructured nodes whose class marker equals `marker`, ordered
    /// by path.
    ///
    /// Replacement nodes carry a non-unstructured kind and are therefore
    /// never matched, whatever their class property says.
    async fn query_by_class(&self, marker: &str) -> Result<Vec<ContentNode>, StoreError>;

    /// Relocate a node and its subtree, returning the node at its new path.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `old_path` does not exist (or the destination parent
    ///   is missing)
    /// - `PathConflict` if `new_path` is occupied
    async fn move_node(&self, old_path: &str, new_path: &str) -> Result<ContentNode, StoreError>;

    /// Create a new child node under `parent`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the parent no longer exists
    /// - `PathConflict` if a child of that name exists
    async fn create_child(
        &self,
        parent: &ContentNode,
        name: &str,
        kind: NodeKind,
    ) -> Result<ContentNode, StoreError>;

    /// Set a property on a node
    async fn set_property(
        &self,
        node: &ContentNode,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    /// Read a property; fails with `PropertyNotFound` on a missing key
    async fn get_property(&self, node: &ContentNode, key: &str) -> Result<Value, StoreError>;

    /// Whether a property is present on a node
    async fn has_property(&self, node: &ContentNode, key: &str) -> Result<bool, StoreError>;

    /// Add a capability tag; idempotent
    async fn add_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<(), StoreError>;

    /// Remove a capability tag; idempotent
    async fn remove_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<(), StoreError>;

    /// Whether a capability tag is present on a node
    async fn has_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<bool, StoreError>;

    /// Make all pending mutations visible to subsequent queries and lookups
    async fn commit(&self) -> Result<(), StoreError>;

    /// Delete a node and its subtree.
    ///
    /// A node that was already removed earlier in the run is a no-op, not
    /// an error.
    async fn remove(&self, node: &ContentNode) -> Result<(), StoreError>;

    /// Direct path lookup; fails with `NotFound` if absent
    async fn resolve_node(&self, path: &str) -> Result<ContentNode, StoreError>;

    /// Current path of a node, by its stable id.
    ///
    /// A handle's `path` field is a snapshot: renaming an ancestor moves
    /// the node without invalidating the handle. Callers that are about to
    /// address the node by path after possible ancestor renames read the
    /// live path here. Fails with `NotFound` if the node was removed.
    async fn current_path(&self, node: &ContentNode) -> Result<String, StoreError>;
}
