//! Node Index - Original Path to Replacement Node
//!
//! During the directory phase every freshly created folder is registered
//! here under the legacy directory's original path. Later parent lookups go
//! through [`NodeIndex::resolve`], a two-tier lookup: index hit first, live
//! store lookup second. The store's own parent lookup on a renamed legacy
//! node would land in the renamed-aside structure, which is exactly what
//! the index exists to avoid.
//!
//! The index lives for one migration run and is owned by the orchestrator.

use std::collections::HashMap;

use crate::models::ContentNode;
use crate::store::{ContentStore, StoreError};

/// In-memory map from a converted directory's original path to its
/// replacement node
#[derive(Debug, Default)]
pub struct NodeIndex {
    entries: HashMap<String, ContentNode>,
}

impl NodeIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a replacement node under its original path
    pub fn insert(&mut self, original_path: impl Into<String>, node: ContentNode) {
        self.entries.insert(original_path.into(), node);
    }

    /// Indexed replacement for a path, if any
    pub fn get(&self, path: &str) -> Option<&ContentNode> {
        self.entries.get(path)
    }

    /// Number of indexed replacements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-tier lookup: index hit, else live store resolve.
    ///
    /// A node resolved from the store is cached, so repeated parent lookups
    /// during one run hit the store at most once per path.
    pub async fn resolve(
        &mut self,
        store: &dyn ContentStore,
        path: &str,
    ) -> Result<ContentNode, StoreError> {
        if let Some(node) = self.entries.get(path) {
            return Ok(node.clone());
        }
        let node = store.resolve_node(path).await?;
        self.entries.insert(path.to_string(), node.clone());
        Ok(node)
    }
}
