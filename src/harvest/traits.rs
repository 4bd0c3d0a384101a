//! Stage abstractions for the harvest pipeline.
//!
//! The pipeline is Reconciler → Extractor → Assembler. Only the extractor is
//! pluggable: reconciliation is a fixed filesystem policy and assembly is a
//! pure mapping over the extractor's output.

use std::path::Path;

use crate::model::PackageIdentity;

// ============================================================================
// Extractor Trait
// ============================================================================

/// Infers a [`PackageIdentity`] for an archive path.
///
/// # Totality
///
/// Implementations must not fail. A filename that cannot be parsed still
/// yields an identity (at worst the raw filename with the `"latest"`
/// version), so one odd archive never aborts a whole dependency group.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a configured harvester can be
/// shared between callers.
///
/// # Examples
///
/// ```
/// use jar_harvester::harvest::{FilenameExtractor, IdentityExtractor};
/// use std::path::Path;
///
/// let identity = FilenameExtractor.extract(Path::new("/sdk/lib/cglib-2.2.2.jar"));
/// assert_eq!(identity.name, "cglib");
/// assert_eq!(identity.version, "2.2.2");
/// ```
pub trait IdentityExtractor: Send + Sync {
    /// Infers the identity of the archive at `path`.
    ///
    /// Only the final path component is expected to matter, but
    /// implementations are free to look at the whole path.
    fn extract(&self, path: &Path) -> PackageIdentity;

    /// Returns a human-readable name for this stage.
    ///
    /// Used for logging.
    fn stage_name(&self) -> &'static str;
}

impl<T> IdentityExtractor for &T
where
    T: IdentityExtractor + ?Sized,
{
    fn extract(&self, path: &Path) -> PackageIdentity {
        (**self).extract(path)
    }

    fn stage_name(&self) -> &'static str {
        (**self).stage_name()
    }
}
