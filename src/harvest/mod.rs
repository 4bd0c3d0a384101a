//! Harvest module - archive directory to dependency group pipeline.
//!
//! This module provides the three stages of the harvester:
//! - **Reconcile**: allow/deny-list validation and directory listing via [`resolve`]
//! - **Extract**: name/version inference from filenames via [`extract`] and [`infer`]
//! - **Assemble**: declaration building via [`DeclarationAssembler`]
//! - **Pipeline**: the composed run via [`pipeline::LibraryHarvester`]

pub mod assemble;
pub mod extract;
pub mod pipeline;
pub mod reconcile;
pub mod traits;

// Re-export commonly used types
pub use assemble::{assemble, DeclarationAssembler};
pub use extract::{extract, infer, FilenameExtractor, Inference};
pub use pipeline::{HarvestResult, HarvestStats, LibraryHarvester};
pub use reconcile::{
    list_archives, resolve, resolve_with_allowlist, resolve_with_denylist, validate,
    EntryProblem, InvalidEntry, ListPolicy, ReconcileError, ARCHIVE_SUFFIX,
};
pub use traits::IdentityExtractor;
