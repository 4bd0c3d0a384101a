//! Harvest pipeline executor.
//!
//! This module provides the [`LibraryHarvester`] coordinator that runs the
//! sequential stages (Reconciler → Extractor → Assembler) for one directory
//! and packages the result as a named [`DependencyGroup`], with:
//! - Synchronous, single-threaded execution over a filesystem snapshot
//! - Structured logging via `tracing`
//! - Per-run statistics in [`HarvestStats`]

use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use super::assemble::DeclarationAssembler;
use super::extract::FilenameExtractor;
use super::reconcile::{self, ListPolicy};
use super::traits::IdentityExtractor;
use crate::error::Result;
use crate::layout::{PluginSpec, SdkLayout};
use crate::model::{DependencyGroup, Exclusion};

// ============================================================================
// Pipeline Types
// ============================================================================

/// Complete harvest result with the dependency group and statistics.
#[derive(Debug)]
pub struct HarvestResult {
    /// Declarations for every resolved archive
    pub group: DependencyGroup,

    /// Processing statistics
    pub stats: HarvestStats,
}

/// Statistics about one harvest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestStats {
    /// Archives that survived the list policy
    pub archives_resolved: usize,

    /// Declarations with a version recovered from the filename
    pub versioned: usize,

    /// Declarations carrying the `"latest"` sentinel
    pub unversioned: usize,

    /// Wall-clock time for the whole run (milliseconds)
    pub duration_ms: u64,
}

// ============================================================================
// Pipeline Executor
// ============================================================================

/// Turns archive directories into named dependency groups.
///
/// The organization tag, exclusions and extractor are fixed at
/// construction; each call to [`LibraryHarvester::harvest`] is independent
/// and reads the filesystem as it is at call time.
///
/// # Example
///
/// ```no_run
/// use jar_harvester::harvest::{LibraryHarvester, ListPolicy};
/// use std::path::Path;
///
/// let harvester = LibraryHarvester::new("sdk.community");
/// let result = harvester
///     .harvest("sdk-lib", Path::new("/opt/sdk/lib"), &ListPolicy::deny_none())
///     .unwrap();
/// println!("Harvested {} archives", result.group.len());
/// ```
pub struct LibraryHarvester<X = FilenameExtractor>
where
    X: IdentityExtractor,
{
    assembler: DeclarationAssembler<X>,
}

impl LibraryHarvester<FilenameExtractor> {
    /// Creates a harvester that infers identities from filenames.
    pub fn new(organization: impl Into<String>) -> Self {
        Self::with_extractor(organization, FilenameExtractor)
    }

    /// Creates a harvester tagged with the layout's default organization.
    pub fn for_layout(layout: &SdkLayout) -> Self {
        Self::new(layout.default_organization())
    }
}

impl<X> LibraryHarvester<X>
where
    X: IdentityExtractor,
{
    pub fn with_extractor(organization: impl Into<String>, extractor: X) -> Self {
        Self {
            assembler: DeclarationAssembler::with_extractor(organization, extractor),
        }
    }

    /// Attaches `exclusions` to every declaration this harvester emits.
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        self.assembler = self.assembler.with_exclusions(exclusions);
        self
    }

    pub fn organization(&self) -> &str {
        self.assembler.organization()
    }

    /// Resolves `dir` under `policy` and declares every resulting archive.
    ///
    /// # Errors
    ///
    /// Fails without a partial result if the policy names anything that is
    /// not an archive directly under `dir`, if `dir` cannot be listed, or
    /// if an archive path cannot be turned into a locator.
    pub fn harvest(&self, name: &str, dir: &Path, policy: &ListPolicy) -> Result<HarvestResult> {
        let start = Instant::now();

        info!(
            group = name,
            dir = %dir.display(),
            mode = policy.mode(),
            entries = policy.entries().len(),
            "Starting harvest"
        );

        let paths = reconcile::resolve(dir, policy)?;
        let declarations = self.assembler.assemble(&paths)?;

        let versioned = declarations
            .iter()
            .filter(|d| d.is_versioned())
            .count();
        let stats = HarvestStats {
            archives_resolved: paths.len(),
            versioned,
            unversioned: declarations.len() - versioned,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if declarations.is_empty() {
            warn!(group = name, dir = %dir.display(), "No archives resolved");
        }
        info!(
            group = name,
            archives = stats.archives_resolved,
            versioned = stats.versioned,
            unversioned = stats.unversioned,
            duration_ms = stats.duration_ms,
            "Harvest completed"
        );

        Ok(HarvestResult {
            group: DependencyGroup::new(name, declarations),
            stats,
        })
    }

    /// Harvests the layout's top-level `lib/` directory.
    pub fn harvest_sdk_libs(
        &self,
        name: &str,
        layout: &SdkLayout,
        policy: &ListPolicy,
    ) -> Result<HarvestResult> {
        self.harvest(name, &layout.lib_dir(), policy)
    }

    /// Harvests every plugin available in the layout's flavor.
    ///
    /// Each plugin becomes its own group, named after the plugin, holding
    /// every archive in its `lib/` directory. The first failure aborts the run.
    pub fn harvest_plugins(
        &self,
        layout: &SdkLayout,
        plugins: &[PluginSpec],
    ) -> Result<Vec<HarvestResult>> {
        let selected = layout.plugin_lib_dirs(plugins);
        info!(
            flavor = %layout.flavor,
            requested = plugins.len(),
            selected = selected.len(),
            "Harvesting plugins"
        );

        selected
            .into_iter()
            .map(|(plugin, dir)| self.harvest(&plugin.name, &dir, &ListPolicy::deny_none()))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
