//! Migration Error Types

use thiserror::Error;

use crate::models::LegacyType;
use crate::store::StoreError;

/// Migration run errors
///
/// Any unrecovered store failure aborts the remaining phases; the variant
/// records where in the run the failure happened. There is no automatic
/// retry anywhere: partial completion is diagnosed and re-run manually,
/// and re-running conversion for an already-converted node is not safe
/// (its replacement occupies the target path).
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A store operation failed while a typed phase was running
    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: LegacyType,
        #[source]
        source: StoreError,
    },

    /// A store operation failed during final cleanup
    #[error("Cleanup failed: {0}")]
    Cleanup(#[from] StoreError),
}

impl MigrationError {
    /// Tag a store error with the phase it occurred in
    pub fn phase(phase: LegacyType, source: StoreError) -> Self {
        Self::Phase { phase, source }
    }

    /// The underlying store error
    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::Phase { source, .. } => source,
            Self::Cleanup(source) => source,
        }
    }
}
