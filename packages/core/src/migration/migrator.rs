//! Migration Orchestrator
//!
//! Runs one migration: four strictly ordered phases (directory, media,
//! file, image) followed by cleanup. Per phase: query the legacy nodes by
//! class marker, then for each node rename it aside, build its replacement
//! at the original path, commit, and queue the renamed node for deferred
//! deletion. Cleanup removes every queued node and commits once more.
//!
//! The run is strictly sequential: every store call completes before the
//! next is issued, because each query's result set depends on the state
//! left behind by prior commits. No second run may execute concurrently
//! against the same store - the rename-suffix scheme assumes exclusivity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::convert::Converter;
use super::error::MigrationError;
use super::node_index::NodeIndex;
use crate::models::{ContentNode, LegacyType};
use crate::store::{ContentStore, StoreError};

/// Default suffix appended to a legacy node's path to vacate it while the
/// replacement is built
pub const DEFAULT_RENAME_SUFFIX: &str = ".bak";

/// Migration run options
///
/// `scan_root` and `scan_depth` restrict which subtree is scanned; they are
/// accepted and logged but, per current scope, queries still run
/// store-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationOptions {
    /// Starting path for the scan
    pub scan_root: String,

    /// Maximum depth below `scan_root`; `None` means unlimited
    pub scan_depth: Option<u32>,

    /// Suffix used to rename legacy nodes aside
    pub rename_suffix: String,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            scan_root: "/".to_string(),
            scan_depth: None,
            rename_suffix: DEFAULT_RENAME_SUFFIX.to_string(),
        }
    }
}

/// Outcome of a completed migration run
///
/// Per-phase counts are the query result size at query time, matching the
/// progress output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub directories: usize,
    pub media: usize,
    pub files: usize,
    pub images: usize,

    /// Legacy nodes queued for deletion over the whole run
    pub removed: usize,
}

impl MigrationReport {
    fn record(&mut self, ty: LegacyType, count: usize) {
        match ty {
            LegacyType::Directory => self.directories = count,
            LegacyType::Media => self.media = count,
            LegacyType::File => self.files = count,
            LegacyType::Image => self.images = count,
        }
    }

    /// Total number of converted nodes
    pub fn total(&self) -> usize {
        self.directories + self.media + self.files + self.images
    }
}

/// Runs the fixed conversion sequence against one content store.
///
/// The migrator exclusively owns the pending-deletion set and the node
/// index for the duration of [`Migrator::run`]; neither persists beyond
/// the run. It is the store's sole writer while the run lasts.
pub struct Migrator {
    store: Arc<dyn ContentStore>,
    options: MigrationOptions,
}

impl Migrator {
    /// Create a migrator with default options
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self::with_options(store, MigrationOptions::default())
    }

    /// Create a migrator with explicit options
    pub fn with_options(store: Arc<dyn ContentStore>, options: MigrationOptions) -> Self {
        Self { store, options }
    }

    /// Run the full migration: all four phases plus cleanup.
    ///
    /// Emits one progress event per phase. Any store failure aborts the
    /// remaining phases; `Ok` means every phase completed and cleanup ran.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        debug!(
            scan_root = %self.options.scan_root,
            scan_depth = ?self.options.scan_depth,
            "Starting node type migration"
        );

        let mut index = NodeIndex::new();
        let mut pending: Vec<ContentNode> = Vec::new();
        let mut report = MigrationReport::default();

        for ty in LegacyType::MIGRATION_ORDER {
            let count = self
                .run_phase(ty, &mut index, &mut pending)
                .await
                .map_err(|source| MigrationError::phase(ty, source))?;
            report.record(ty, count);
            info!("Migrating {} {} object(s).", count, ty);
        }

        // Deferred cleanup: queued nodes may already be gone when an
        // ancestor's subtree was removed first
        report.removed = pending.len();
        for node in &pending {
            self.store.remove(node).await?;
        }
        self.store.commit().await?;

        debug!(converted = report.total(), "Migration finished");
        Ok(report)
    }

    /// One typed phase: query, then rename-aside / convert / commit /
    /// queue per node. Returns the query result size at query time.
    async fn run_phase(
        &self,
        ty: LegacyType,
        index: &mut NodeIndex,
        pending: &mut Vec<ContentNode>,
    ) -> Result<usize, StoreError> {
        let legacy_nodes = self.store.query_by_class(ty.marker()).await?;
        let count = legacy_nodes.len();

        let mut converter = Converter::new(self.store.as_ref(), index, &self.options.rename_suffix);
        for node in legacy_nodes {
            // A rename earlier in this phase may have moved an ancestor,
            // so the query snapshot's path can be stale
            let current = self.store.current_path(&node).await?;
            let vacated = format!("{}{}", current, self.options.rename_suffix);
            let renamed = self.store.move_node(&current, &vacated).await?;

            converter.convert(ty, &renamed).await?;

            self.store.commit().await?;
            pending.push(renamed);
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = MigrationOptions::default();
        assert_eq!(options.scan_root, "/");
        assert_eq!(options.scan_depth, None);
        assert_eq!(options.rename_suffix, DEFAULT_RENAME_SUFFIX);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: MigrationOptions = serde_json::from_str(r#"{"scanRoot": "/lib"}"#).unwrap();
        assert_eq!(options.scan_root, "/lib");
        assert_eq!(options.rename_suffix, DEFAULT_RENAME_SUFFIX);
    }

    #[test]
    fn test_report_records_per_phase_counts() {
        let mut report = MigrationReport::default();
        report.record(LegacyType::Directory, 2);
        report.record(LegacyType::Image, 3);

        assert_eq!(report.directories, 2);
        assert_eq!(report.images, 3);
        assert_eq!(report.total(), 5);
    }
}
