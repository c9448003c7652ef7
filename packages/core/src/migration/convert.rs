//! Type Converters
//!
//! One conversion routine per legacy type. Each takes a legacy node that
//! has already been renamed aside and builds its replacement at the
//! original path: resolve the new parent, create the replacement child,
//! stamp class marker, ancestry and capability tags, copy the properties
//! the type carries over.
//!
//! Parent resolution differs by type. Directories go through the node
//! index first because their parent may be a folder created moments ago in
//! the same phase; media and file nodes resolve the original parent path
//! directly against the store, where earlier commits have already made
//! fresh folders visible.
//!
//! Image is a specialization of File: it reuses the file-building step,
//! then swaps the media capability for the image one, re-stamps the class
//! marker and copies the mandatory dimensions.

use serde_json::json;
use tracing::debug;

use super::node_index::NodeIndex;
use crate::models::{
    node_name, original_path, parent_path, Capability, ContentNode, LegacyType, NodeKind,
    CONTENT_CHILD, PROP_CLASS, PROP_CLASS_PARENTS, PROP_HEIGHT, PROP_LAST_MODIFIED,
    PROP_LAST_MODIFIED_BY, PROP_WIDTH,
};
use crate::store::{ContentStore, StoreError};

/// Optional descriptive properties shared by the media family; copied only
/// when present on the source
const DESCRIPTIVE_PROPERTIES: [&str; 4] = ["description", "copyright", "author_name", "metadata"];

/// Audit properties; copied only when present on the source
const AUDIT_PROPERTIES: [&str; 2] = [PROP_LAST_MODIFIED, PROP_LAST_MODIFIED_BY];

/// Builds replacement nodes for renamed-aside legacy nodes.
///
/// Borrows the store, the node index and the rename suffix for the
/// duration of one phase; conversion of a single node is not transactional
/// (the orchestrator commits after each replacement is built).
pub struct Converter<'a> {
    store: &'a dyn ContentStore,
    index: &'a mut NodeIndex,
    suffix: &'a str,
}

impl<'a> Converter<'a> {
    pub fn new(store: &'a dyn ContentStore, index: &'a mut NodeIndex, suffix: &'a str) -> Self {
        Self {
            store,
            index,
            suffix,
        }
    }

    /// Build the replacement for one legacy node, dispatching on its type
    pub async fn convert(
        &mut self,
        ty: LegacyType,
        legacy: &ContentNode,
    ) -> Result<ContentNode, StoreError> {
        debug!("Converting {} node {}", ty, legacy.path);
        match ty {
            LegacyType::Directory => self.convert_directory(legacy).await,
            LegacyType::Media => self.convert_media(legacy).await,
            LegacyType::File => self.convert_file(legacy).await,
            LegacyType::Image => self.convert_image(legacy).await,
        }
    }

    /// Directory -> folder node, registered in the node index
    async fn convert_directory(&mut self, legacy: &ContentNode) -> Result<ContentNode, StoreError> {
        let original = original_path(&legacy.path, self.suffix);
        let parent = self.index.resolve(self.store, parent_path(&original)).await?;
        let dir = self
            .store
            .create_child(&parent, node_name(&original), NodeKind::Folder)
            .await?;

        self.store.add_capability(&dir, Capability::Managed).await?;
        self.store
            .add_capability(&dir, Capability::Referenceable)
            .await?;
        self.store
            .add_capability(&dir, Capability::LastModifiedTracking)
            .await?;

        self.stamp_class(&dir, LegacyType::Directory).await?;
        self.copy_present_properties(legacy, &dir, &AUDIT_PROPERTIES)
            .await?;

        self.index.insert(original, dir.clone());
        Ok(dir)
    }

    /// Media -> media node with the optional descriptive properties
    async fn convert_media(&self, legacy: &ContentNode) -> Result<ContentNode, StoreError> {
        let media = self.create_replacement(legacy, NodeKind::Media).await?;

        self.store.add_capability(&media, Capability::Managed).await?;
        self.store
            .add_capability(&media, Capability::Referenceable)
            .await?;
        self.store
            .add_capability(&media, Capability::CreatedTracking)
            .await?;
        self.store
            .add_capability(&media, Capability::LastModifiedTracking)
            .await?;

        self.stamp_class(&media, LegacyType::Media).await?;
        self.copy_present_properties(legacy, &media, &AUDIT_PROPERTIES)
            .await?;
        self.copy_present_properties(legacy, &media, &DESCRIPTIVE_PROPERTIES)
            .await?;

        Ok(media)
    }

    /// File -> file node; relocates the binary content child
    async fn convert_file(&self, legacy: &ContentNode) -> Result<ContentNode, StoreError> {
        let file = self.create_replacement(legacy, NodeKind::File).await?;

        self.store.add_capability(&file, Capability::Managed).await?;
        self.store
            .add_capability(&file, Capability::Referenceable)
            .await?;
        self.store.add_capability(&file, Capability::Media).await?;

        self.stamp_class(&file, LegacyType::File).await?;
        self.copy_present_properties(legacy, &file, &DESCRIPTIVE_PROPERTIES)
            .await?;

        self.move_content(legacy, &file).await?;

        Ok(file)
    }

    /// Image -> file node built by the file routine, then patched: image
    /// capability instead of media, image class marker, mandatory
    /// dimensions
    async fn convert_image(&self, legacy: &ContentNode) -> Result<ContentNode, StoreError> {
        let image = self.convert_file(legacy).await?;

        self.store
            .remove_capability(&image, Capability::Media)
            .await?;
        self.store.add_capability(&image, Capability::Image).await?;

        self.stamp_class(&image, LegacyType::Image).await?;

        // Unlike the descriptive set, width and height are mandatory:
        // a missing one fails the conversion with PropertyNotFound
        for key in [PROP_WIDTH, PROP_HEIGHT] {
            let value = self.store.get_property(legacy, key).await?;
            self.store.set_property(&image, key, value).await?;
        }

        Ok(image)
    }

    /// Resolve the new parent by original path and create the replacement
    /// child under it
    async fn create_replacement(
        &self,
        legacy: &ContentNode,
        kind: NodeKind,
    ) -> Result<ContentNode, StoreError> {
        let original = original_path(&legacy.path, self.suffix);
        let parent = self.store.resolve_node(parent_path(&original)).await?;
        self.store
            .create_child(&parent, node_name(&original), kind)
            .await
    }

    async fn stamp_class(&self, node: &ContentNode, ty: LegacyType) -> Result<(), StoreError> {
        self.store
            .set_property(node, PROP_CLASS, json!(ty.marker()))
            .await?;
        self.store
            .set_property(node, PROP_CLASS_PARENTS, json!(ty.class_parents()))
            .await
    }

    /// Copy each listed property that exists on the source; absence is not
    /// an error
    async fn copy_present_properties(
        &self,
        old: &ContentNode,
        new: &ContentNode,
        keys: &[&str],
    ) -> Result<(), StoreError> {
        for key in keys {
            if self.store.has_property(old, key).await? {
                let value = self.store.get_property(old, key).await?;
                self.store.set_property(new, key, value).await?;
            }
        }
        Ok(())
    }

    /// Relocate the binary content child in a single move
    async fn move_content(&self, old: &ContentNode, new: &ContentNode) -> Result<(), StoreError> {
        let from = format!("{}/{}", old.path, CONTENT_CHILD);
        let to = format!("{}/{}", new.path, CONTENT_CHILD);
        self.store.move_node(&from, &to).await?;
        Ok(())
    }
}
