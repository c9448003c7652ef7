//! MemoryStore - Embedded ContentStore Backend
//!
//! In-memory implementation of the `ContentStore` trait, used as the
//! embedded reference backend and by the test suite.
//!
//! # Design
//!
//! - Node records are keyed by a stable UUID; a path table (`BTreeMap`)
//!   maps each live path to the owning record, so path iteration and query
//!   results are deterministic
//! - Mutations are applied eagerly; `commit` advances a revision counter
//!   and serves as the visibility checkpoint required by the trait
//! - `remove` tolerates already-removed nodes: a queued node may have been
//!   deleted as part of an ancestor's subtree
//!
//! The store is created with a root node at `/`.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::content_store::ContentStore;
use super::error::StoreError;
use crate::models::{parent_path, Capability, ContentNode, NodeKind, PROP_CLASS};

/// One stored node
struct NodeRecord {
    id: String,
    path: String,
    kind: NodeKind,
    properties: serde_json::Map<String, Value>,
    capabilities: HashSet<Capability>,
    created_at: DateTime<Utc>,
}

impl NodeRecord {
    fn snapshot(&self) -> ContentNode {
        ContentNode {
            id: self.id.clone(),
            path: self.path.clone(),
            kind: self.kind,
        }
    }
}

#[derive(Default)]
struct StoreState {
    /// Node records by stable id
    nodes: HashMap<String, NodeRecord>,
    /// Live path -> owning node id
    paths: BTreeMap<String, String>,
    /// Commit counter
    revision: u64,
}

impl StoreState {
    fn insert(&mut self, record: NodeRecord) -> ContentNode {
        let snapshot = record.snapshot();
        self.paths.insert(record.path.clone(), record.id.clone());
        self.nodes.insert(record.id.clone(), record);
        snapshot
    }

    fn record(&self, node: &ContentNode) -> Result<&NodeRecord, StoreError> {
        self.nodes
            .get(&node.id)
            .ok_or_else(|| StoreError::not_found(&node.path))
    }

    fn record_mut(&mut self, node: &ContentNode) -> Result<&mut NodeRecord, StoreError> {
        self.nodes
            .get_mut(&node.id)
            .ok_or_else(|| StoreError::not_found(&node.path))
    }

    /// Ids of the node at `path` and every descendant, path-ordered
    fn subtree_ids(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path);
        self.paths
            .iter()
            .filter(|(p, _)| p.as_str() == path || p.starts_with(&prefix))
            .map(|(_, id)| id.clone())
            .collect()
    }
}

/// Embedded in-memory content store
pub struct MemoryStore {
    inner: Mutex<StoreState>,
}

impl MemoryStore {
    /// Create an empty store holding only the root node `/`
    pub fn new() -> Self {
        let mut state = StoreState::default();
        state.insert(NodeRecord {
            id: Uuid::new_v4().to_string(),
            path: "/".to_string(),
            kind: NodeKind::Unstructured,
            properties: serde_json::Map::new(),
            capabilities: HashSet::new(),
            created_at: Utc::now(),
        });
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Number of live nodes, root included
    pub async fn node_count(&self) -> usize {
        self.inner.lock().await.nodes.len()
    }

    /// Number of commits performed so far
    pub async fn revision(&self) -> u64 {
        self.inner.lock().await.revision
    }

    /// Creation timestamp of a node
    pub async fn created_at(&self, node: &ContentNode) -> Result<DateTime<Utc>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.record(node)?.created_at)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn query_by_class(&self, marker: &str) -> Result<Vec<ContentNode>, StoreError> {
        let state = self.inner.lock().await;
        let matches = state
            .paths
            .values()
            .filter_map(|id| state.nodes.get(id))
            .filter(|record| {
                record.kind == NodeKind::Unstructured
                    && record
                        .properties
                        .get(PROP_CLASS)
                        .and_then(Value::as_str)
                        .is_some_and(|class| class == marker)
            })
            .map(NodeRecord::snapshot)
            .collect();
        Ok(matches)
    }

    async fn move_node(&self, old_path: &str, new_path: &str) -> Result<ContentNode, StoreError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;

        let id = state
            .paths
            .get(old_path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(old_path))?;
        if state.paths.contains_key(new_path) {
            return Err(StoreError::path_conflict(new_path));
        }
        let destination_parent = parent_path(new_path);
        if !state.paths.contains_key(destination_parent) {
            return Err(StoreError::not_found(destination_parent));
        }

        // Rewrite the path of the node and of every descendant
        for moved_id in state.subtree_ids(old_path) {
            let record = state
                .nodes
                .get_mut(&moved_id)
                .ok_or_else(|| StoreError::not_found(old_path))?;
            let rewritten = format!("{}{}", new_path, &record.path[old_path.len()..]);
            let vacated = std::mem::replace(&mut record.path, rewritten.clone());
            state.paths.remove(&vacated);
            state.paths.insert(rewritten, moved_id);
        }

        let record = state
            .nodes
            .get(&id)
            .ok_or_else(|| StoreError::not_found(new_path))?;
        Ok(record.snapshot())
    }

    async fn create_child(
        &self,
        parent: &ContentNode,
        name: &str,
        kind: NodeKind,
    ) -> Result<ContentNode, StoreError> {
        let mut state = self.inner.lock().await;

        let parent_record = state.record(parent)?;
        let path = if parent_record.path == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", parent_record.path, name)
        };
        if state.paths.contains_key(&path) {
            return Err(StoreError::path_conflict(&path));
        }

        Ok(state.insert(NodeRecord {
            id: Uuid::new_v4().to_string(),
            path,
            kind,
            properties: serde_json::Map::new(),
            capabilities: HashSet::new(),
            created_at: Utc::now(),
        }))
    }

    async fn set_property(
        &self,
        node: &ContentNode,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;
        let record = state.record_mut(node)?;
        record.properties.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_property(&self, node: &ContentNode, key: &str) -> Result<Value, StoreError> {
        let state = self.inner.lock().await;
        let record = state.record(node)?;
        record
            .properties
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::property_not_found(&record.path, key))
    }

    async fn has_property(&self, node: &ContentNode, key: &str) -> Result<bool, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.record(node)?.properties.contains_key(key))
    }

    async fn add_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;
        state.record_mut(node)?.capabilities.insert(capability);
        Ok(())
    }

    async fn remove_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;
        state.record_mut(node)?.capabilities.remove(&capability);
        Ok(())
    }

    async fn has_capability(
        &self,
        node: &ContentNode,
        capability: Capability,
    ) -> Result<bool, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.record(node)?.capabilities.contains(&capability))
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;
        state.revision += 1;
        Ok(())
    }

    async fn remove(&self, node: &ContentNode) -> Result<(), StoreError> {
        let mut state = self.inner.lock().await;

        // Already removed earlier in the run, e.g. with an ancestor's subtree
        let Some(record) = state.nodes.get(&node.id) else {
            return Ok(());
        };

        let root = record.path.clone();
        for id in state.subtree_ids(&root) {
            if let Some(removed) = state.nodes.remove(&id) {
                state.paths.remove(&removed.path);
            }
        }
        Ok(())
    }

    async fn resolve_node(&self, path: &str) -> Result<ContentNode, StoreError> {
        let state = self.inner.lock().await;
        let id = state
            .paths
            .get(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        let record = state
            .nodes
            .get(id)
            .ok_or_else(|| StoreError::not_found(path))?;
        Ok(record.snapshot())
    }

    async fn current_path(&self, node: &ContentNode) -> Result<String, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.record(node)?.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::block_on;

    async fn store_with_child(name: &str, kind: NodeKind) -> (MemoryStore, ContentNode) {
        let store = MemoryStore::new();
        let root = store.resolve_node("/").await.unwrap();
        let child = store.create_child(&root, name, kind).await.unwrap();
        (store, child)
    }

    #[test]
    fn test_create_and_resolve() {
        block_on(async {
            let (store, child) = store_with_child("lib", NodeKind::Folder).await;
            assert_eq!(child.path, "/lib");
            assert_eq!(child.kind, NodeKind::Folder);

            let resolved = store.resolve_node("/lib").await.unwrap();
            assert_eq!(resolved, child);
            assert_eq!(store.node_count().await, 2);
        });
    }

    #[test]
    fn test_create_child_rejects_occupied_name() {
        block_on(async {
            let (store, _) = store_with_child("lib", NodeKind::Folder).await;
            let root = store.resolve_node("/").await.unwrap();

            let result = store.create_child(&root, "lib", NodeKind::Folder).await;
            assert!(matches!(result, Err(StoreError::PathConflict { .. })));
        });
    }

    #[test]
    fn test_move_rewrites_descendant_paths() {
        block_on(async {
            let (store, lib) = store_with_child("lib", NodeKind::Unstructured).await;
            store
                .create_child(&lib, "photo.jpg", NodeKind::Unstructured)
                .await
                .unwrap();

            let moved = store.move_node("/lib", "/lib.bak").await.unwrap();
            assert_eq!(moved.path, "/lib.bak");
            assert_eq!(moved.id, lib.id);

            assert!(store.resolve_node("/lib.bak/photo.jpg").await.is_ok());
            assert!(matches!(
                store.resolve_node("/lib/photo.jpg").await,
                Err(StoreError::NotFound { .. })
            ));
        });
    }

    #[test]
    fn test_move_conflicts_and_missing_source() {
        block_on(async {
            let (store, _) = store_with_child("a", NodeKind::Folder).await;
            let root = store.resolve_node("/").await.unwrap();
            store.create_child(&root, "b", NodeKind::Folder).await.unwrap();

            assert!(matches!(
                store.move_node("/a", "/b").await,
                Err(StoreError::PathConflict { .. })
            ));
            assert!(matches!(
                store.move_node("/missing", "/c").await,
                Err(StoreError::NotFound { .. })
            ));
        });
    }

    #[test]
    fn test_property_roundtrip_and_missing_key() {
        block_on(async {
            let (store, node) = store_with_child("doc", NodeKind::Unstructured).await;

            store
                .set_property(&node, "description", json!("x"))
                .await
                .unwrap();
            assert_eq!(
                store.get_property(&node, "description").await.unwrap(),
                json!("x")
            );
            assert!(store.has_property(&node, "description").await.unwrap());
            assert!(!store.has_property(&node, "copyright").await.unwrap());

            let missing = store.get_property(&node, "copyright").await;
            assert!(matches!(
                missing,
                Err(StoreError::PropertyNotFound { .. })
            ));
        });
    }

    #[test]
    fn test_capabilities_are_idempotent() {
        block_on(async {
            let (store, node) = store_with_child("doc", NodeKind::File).await;

            store.add_capability(&node, Capability::Media).await.unwrap();
            store.add_capability(&node, Capability::Media).await.unwrap();
            assert!(store.has_capability(&node, Capability::Media).await.unwrap());

            store
                .remove_capability(&node, Capability::Media)
                .await
                .unwrap();
            store
                .remove_capability(&node, Capability::Media)
                .await
                .unwrap();
            assert!(!store.has_capability(&node, Capability::Media).await.unwrap());
        });
    }

    #[test]
    fn test_query_matches_marker_and_kind() {
        block_on(async {
            let store = MemoryStore::new();
            let root = store.resolve_node("/").await.unwrap();

            let legacy = store
                .create_child(&root, "lib", NodeKind::Unstructured)
                .await
                .unwrap();
            store
                .set_property(&legacy, PROP_CLASS, json!("mediastore.media.Directory"))
                .await
                .unwrap();

            // Same marker on a folder-kind node must not match
            let folder = store
                .create_child(&root, "new-lib", NodeKind::Folder)
                .await
                .unwrap();
            store
                .set_property(&folder, PROP_CLASS, json!("mediastore.media.Directory"))
                .await
                .unwrap();

            let hits = store
                .query_by_class("mediastore.media.Directory")
                .await
                .unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].path, "/lib");

            let misses = store.query_by_class("mediastore.media.Media").await.unwrap();
            assert!(misses.is_empty());
        });
    }

    #[test]
    fn test_query_order_is_path_sorted() {
        block_on(async {
            let store = MemoryStore::new();
            let root = store.resolve_node("/").await.unwrap();

            for name in ["b", "a", "c"] {
                let node = store
                    .create_child(&root, name, NodeKind::Unstructured)
                    .await
                    .unwrap();
                store
                    .set_property(&node, PROP_CLASS, json!("mediastore.media.Media"))
                    .await
                    .unwrap();
            }

            let hits = store.query_by_class("mediastore.media.Media").await.unwrap();
            let paths: Vec<&str> = hits.iter().map(|n| n.path.as_str()).collect();
            assert_eq!(paths, vec!["/a", "/b", "/c"]);
        });
    }

    #[test]
    fn test_remove_is_idempotent_and_takes_subtree() {
        block_on(async {
            let (store, lib) = store_with_child("lib", NodeKind::Unstructured).await;
            let child = store
                .create_child(&lib, "doc", NodeKind::Unstructured)
                .await
                .unwrap();

            store.remove(&lib).await.unwrap();
            assert!(store.resolve_node("/lib").await.is_err());
            assert!(store.resolve_node("/lib/doc").await.is_err());

            // The child went with the subtree; removing it again is a no-op
            store.remove(&child).await.unwrap();
            store.remove(&lib).await.unwrap();
            assert_eq!(store.node_count().await, 1);
        });
    }

    #[test]
    fn test_current_path_follows_ancestor_renames() {
        block_on(async {
            let (store, lib) = store_with_child("lib", NodeKind::Unstructured).await;
            let child = store
                .create_child(&lib, "doc", NodeKind::Unstructured)
                .await
                .unwrap();

            store.move_node("/lib", "/lib.bak").await.unwrap();

            // The handle keeps its snapshot path; the store knows better
            assert_eq!(child.path, "/lib/doc");
            assert_eq!(store.current_path(&child).await.unwrap(), "/lib.bak/doc");
        });
    }

    #[test]
    fn test_commit_advances_revision() {
        block_on(async {
            let store = MemoryStore::new();
            assert_eq!(store.revision().await, 0);
            store.commit().await.unwrap();
            store.commit().await.unwrap();
            assert_eq!(store.revision().await, 2);
        });
    }

    #[test]
    fn test_created_at_is_recorded() {
        block_on(async {
            let (store, node) = store_with_child("doc", NodeKind::Media).await;
            let created = store.created_at(&node).await.unwrap();
            assert!(created <= Utc::now());
        });
    }
}
