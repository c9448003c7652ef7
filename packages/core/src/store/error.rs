//! Store Error Types
//!
//! This module defines error types for content store operations. The three
//! variants mirror the store contract: unique paths (`PathConflict`),
//! path-addressed lookup (`NotFound`) and typed property access
//! (`PropertyNotFound`).

use thiserror::Error;

/// Content store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Target path is already occupied by a live node
    #[error("Path already occupied: {path}")]
    PathConflict { path: String },

    /// No node exists at the given path
    #[error("Node not found: {path}")]
    NotFound { path: String },

    /// Required property is missing on a node
    #[error("Property '{key}' not found on node {path}")]
    PropertyNotFound { path: String, key: String },
}

impl StoreError {
    /// Create a path conflict error
    pub fn path_conflict(path: impl Into<String>) -> Self {
        Self::PathConflict { path: path.into() }
    }

    /// Create a node not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a property not found error
    pub fn property_not_found(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            path: path.into(),
            key: key.into(),
        }
    }
}
