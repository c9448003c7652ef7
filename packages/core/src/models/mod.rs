//! Data Models
//!
//! This module contains the core data structures used throughout the
//! migration:
//!
//! - `ContentNode` - snapshot handle to a node in the content store
//! - `NodeKind` - structural kind of a node (legacy vs. replacement kinds)
//! - `LegacyType` - the four legacy class markers targeted by the migration
//! - `Capability` - attachable capability tags ("mixins")
//!
//! Property values are plain `serde_json::Value`s; everything type-specific
//! lives in node properties rather than in dedicated structs.

mod node;
mod path;

pub use node::{
    Capability, ContentNode, LegacyType, NodeKind, CONTENT_CHILD, PROP_CLASS, PROP_CLASS_PARENTS,
    PROP_HEIGHT, PROP_LAST_MODIFIED, PROP_LAST_MODIFIED_BY, PROP_WIDTH,
};
pub use path::{node_name, original_path, parent_path};
