use std::path::PathBuf;
use thiserror::Error;

use crate::harvest::reconcile::ReconcileError;

/// Errors surfaced by a harvest run.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Allow/deny-list validation or directory listing failed
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Archive path could not be turned into a `file://` locator
    #[error("Cannot build a file locator for '{}': path must be absolute", .0.display())]
    Locator(PathBuf),

    /// Exclusion was not written as `org:name`
    #[error("Invalid exclusion '{0}': expected 'org:name'")]
    InvalidExclusion(String),

    /// SDK layout could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
