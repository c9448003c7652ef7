//! Migration Layer
//!
//! This module contains the node-type migration itself:
//!
//! - `Migrator` - runs the fixed directory -> media -> file -> image
//!   sequence plus the final cleanup
//! - `Converter` - builds the replacement node for one legacy node
//! - `NodeIndex` - original-path index of freshly created directories
//! - `MigrationError` - phase-tagged failures
//!
//! The migration is one-shot: it performs a fixed sequence of type
//! conversions driven by `LegacyType`, not a general schema-migration
//! engine.

mod convert;
mod error;
mod migrator;
mod node_index;

pub use convert::Converter;
pub use error::MigrationError;
pub use migrator::{MigrationOptions, MigrationReport, Migrator, DEFAULT_RENAME_SUFFIX};
pub use node_index::NodeIndex;
