//! Node Data Structures
//!
//! This module defines the `ContentNode` handle and the enums describing a
//! node's structural kind, its legacy class marker and its capability tags.
//!
//! # Class markers
//!
//! A node's logical type is recorded in its `class` property as a
//! fully-qualified type name, with the declared ancestry in `class_parents`.
//! The marker is what the migration queries for; after conversion the
//! replacement node carries the same marker but a non-legacy structural
//! kind, so it is never matched by a migration query again.
//!
//! # Examples
//!
//! ```rust
//! use mediastore_core::models::{LegacyType, NodeKind};
//!
//! assert_eq!(LegacyType::Image.marker(), "mediastore.media.Image");
//! assert_eq!(LegacyType::Image.replacement_kind(), NodeKind::File);
//! assert_eq!(LegacyType::MIGRATION_ORDER[0], LegacyType::Directory);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::path::node_name;

/// Property holding a node's fully-qualified class marker
pub const PROP_CLASS: &str = "class";

/// Property holding the declared class ancestry (list of class markers)
pub const PROP_CLASS_PARENTS: &str = "class_parents";

/// Audit property: last modification timestamp
pub const PROP_LAST_MODIFIED: &str = "last_modified";

/// Audit property: author of the last modification
pub const PROP_LAST_MODIFIED_BY: &str = "last_modified_by";

/// Mandatory numeric property of image nodes
pub const PROP_WIDTH: &str = "width";

/// Mandatory numeric property of image nodes
pub const PROP_HEIGHT: &str = "height";

/// Name of the child node holding a file's binary content
pub const CONTENT_CHILD: &str = "content";

/// Structural kind of a node.
///
/// Legacy nodes are `Unstructured`; the migration replaces them with nodes
/// of a dedicated kind. The type-marker query matches only `Unstructured`
/// nodes, which is what keeps converted nodes out of later query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Untyped legacy node, subject to conversion when it carries a marker
    Unstructured,
    /// Replacement kind for legacy directories
    Folder,
    /// Replacement kind for legacy media nodes
    Media,
    /// Replacement kind for legacy file and image nodes
    File,
    /// Binary content child of a file node
    Resource,
}

/// Capability tag ("mixin") attachable to a node.
///
/// Tags grant a node additional recognized properties and behavior; adding
/// or removing a tag is idempotent at the store level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Managed,
    Referenceable,
    CreatedTracking,
    LastModifiedTracking,
    Media,
    Image,
}

impl Capability {
    /// Stable string form, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Managed => "managed",
            Capability::Referenceable => "referenceable",
            Capability::CreatedTracking => "created-tracking",
            Capability::LastModifiedTracking => "last-modified-tracking",
            Capability::Media => "media",
            Capability::Image => "image",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four legacy class markers targeted by the migration, in a fixed
/// conversion order.
///
/// Directory must come first: later phases resolve parents that may be
/// freshly created folders, and only the directory phase populates the node
/// index. Image shares the file-building step with File and patches the
/// result afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyType {
    Directory,
    Media,
    File,
    Image,
}

impl LegacyType {
    /// Phase order of one migration run
    pub const MIGRATION_ORDER: [LegacyType; 4] = [
        LegacyType::Directory,
        LegacyType::Media,
        LegacyType::File,
        LegacyType::Image,
    ];

    /// Fully-qualified class marker identifying legacy nodes of this type
    pub fn marker(&self) -> &'static str {
        match self {
            LegacyType::Directory => "mediastore.media.Directory",
            LegacyType::Media => "mediastore.media.Media",
            LegacyType::File => "mediastore.media.File",
            LegacyType::Image => "mediastore.media.Image",
        }
    }

    /// Declared ancestry stamped on the replacement node
    pub fn class_parents(&self) -> &'static [&'static str] {
        match self {
            LegacyType::Directory => &["mediastore.doc.AbstractFile", "mediastore.doc.Folder"],
            LegacyType::Media => &["mediastore.media.AbstractMedia"],
            LegacyType::File => &["mediastore.doc.AbstractFile", "mediastore.doc.File"],
            LegacyType::Image => &[
                "mediastore.doc.AbstractFile",
                "mediastore.doc.File",
                "mediastore.media.File",
            ],
        }
    }

    /// Structural kind of the replacement node
    pub fn replacement_kind(&self) -> NodeKind {
        match self {
            LegacyType::Directory => NodeKind::Folder,
            LegacyType::Media => NodeKind::Media,
            LegacyType::File | LegacyType::Image => NodeKind::File,
        }
    }

    /// Lowercase label used in progress output ("directory", "media", ...)
    pub fn label(&self) -> &'static str {
        match self {
            LegacyType::Directory => "directory",
            LegacyType::Media => "media",
            LegacyType::File => "file",
            LegacyType::Image => "image",
        }
    }
}

impl fmt::Display for LegacyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot handle to a node in the content store.
///
/// The `id` is stable across moves; `path` and `kind` reflect the state at
/// the time the handle was obtained. Properties and capability tags are not
/// carried on the handle - they are read and written through the
/// `ContentStore` trait, which addresses the node by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Stable node identifier (UUID)
    pub id: String,

    /// Absolute `/`-delimited path at snapshot time
    pub path: String,

    /// Structural kind at snapshot time
    pub kind: NodeKind,
}

impl ContentNode {
    /// Last path segment of the node
    pub fn name(&self) -> &str {
        node_name(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_order_starts_with_directory() {
        assert_eq!(LegacyType::MIGRATION_ORDER[0], LegacyType::Directory);
        assert_eq!(LegacyType::MIGRATION_ORDER[3], LegacyType::Image);
    }

    #[test]
    fn test_markers_are_distinct() {
        let markers: Vec<&str> = LegacyType::MIGRATION_ORDER
            .iter()
            .map(|ty| ty.marker())
            .collect();
        for (i, marker) in markers.iter().enumerate() {
            assert!(!markers[i + 1..].contains(marker));
        }
    }

    #[test]
    fn test_image_replacement_is_a_file() {
        assert_eq!(LegacyType::Image.replacement_kind(), NodeKind::File);
        assert!(LegacyType::Image
            .class_parents()
            .contains(&LegacyType::File.marker()));
    }

    #[test]
    fn test_capability_labels() {
        assert_eq!(Capability::CreatedTracking.as_str(), "created-tracking");
        assert_eq!(
            Capability::LastModifiedTracking.to_string(),
            "last-modified-tracking"
        );
    }

    #[test]
    fn test_node_name_from_handle() {
        let node = ContentNode {
            id: "n1".to_string(),
            path: "/lib/photo.jpg".to_string(),
            kind: NodeKind::Unstructured,
        };
        assert_eq!(node.name(), "photo.jpg");
    }
}
