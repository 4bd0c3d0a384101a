//! Allow/deny-list reconciliation of a single archive directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Marker for packaged binary modules. Matched case-sensitively.
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Selection of a directory's archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "entries")]
pub enum ListPolicy {
    /// Only the named archives
    Allow(Vec<String>),

    /// Every archive except the named ones
    Deny(Vec<String>),
}

impl ListPolicy {
    /// Every archive in the directory.
    pub fn deny_none() -> Self {
        ListPolicy::Deny(Vec::new())
    }

    pub fn entries(&self) -> &[String] {
        match self {
            ListPolicy::Allow(entries) | ListPolicy::Deny(entries) => entries,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ListPolicy::Allow(_) => "allow",
            ListPolicy::Deny(_) => "deny",
        }
    }
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self::deny_none()
    }
}

/// Why a list entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryProblem {
    Missing,
    NotAFile,
    NotArchive,
    NotDirectChild,

    /// Present but its metadata could not be read (permissions, symlink loop)
    Inaccessible(io::ErrorKind),
}

impl fmt::Display for EntryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryProblem::Missing => f.write_str("does not exist"),
            EntryProblem::NotAFile => f.write_str("is not a regular file"),
            EntryProblem::NotArchive => f.write_str("does not end with .jar"),
            EntryProblem::NotDirectChild => f.write_str("is not a direct child of the directory"),
            EntryProblem::Inaccessible(kind) => write!(f, "cannot be inspected: {}", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub entry: String,
    pub problem: EntryProblem,
}

fn describe(entries: &[InvalidEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("'{}' ({})", e.entry, e.problem))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while reconciling a directory.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// One or more list entries do not name an archive directly under `dir`
    #[error("Invalid list entries in '{}': {}", .dir.display(), describe(.entries))]
    InvalidEntries {
        dir: PathBuf,
        entries: Vec<InvalidEntry>,
    },

    /// The directory path cannot be made absolute (e.g. it is empty)
    #[error("Invalid directory '{}': {source}", .dir.display())]
    InvalidDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory could not be listed
    #[error("Failed to list '{}': {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReconcileError {
    /// Offending entries, empty for listing failures.
    pub fn invalid_entries(&self) -> &[InvalidEntry] {
        match self {
            ReconcileError::InvalidEntries { entries, .. } => entries,
            ReconcileError::InvalidDirectory { .. } | ReconcileError::ReadDir { .. } => &[],
        }
    }
}

fn is_direct_child(entry: &str) -> bool {
    let mut components = Path::new(entry).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn check_entry(dir: &Path, entry: &str) -> Option<EntryProblem> {
    if !is_direct_child(entry) {
        return Some(EntryProblem::NotDirectChild);
    }
    let path = dir.join(entry);
    match std::fs::metadata(&path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Some(EntryProblem::Missing),
        Err(err) => Some(EntryProblem::Inaccessible(err.kind())),
        Ok(meta) if !meta.is_file() => Some(EntryProblem::NotAFile),
        Ok(_) if !entry.ends_with(ARCHIVE_SUFFIX) => Some(EntryProblem::NotArchive),
        Ok(_) => None,
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, ReconcileError> {
    std::path::absolute(dir).map_err(|source| ReconcileError::InvalidDirectory {
        dir: dir.to_path_buf(),
        source,
    })
}

fn has_archive_suffix(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(ARCHIVE_SUFFIX.as_bytes())
}

/// Checks every entry and reports all violations at once.
pub fn validate<S: AsRef<str>>(dir: &Path, entries: &[S]) -> Result<(), ReconcileError> {
    let invalid: Vec<InvalidEntry> = entries
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|entry| {
            check_entry(dir, entry).map(|problem| InvalidEntry {
                entry: entry.to_string(),
                problem,
            })
        })
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::InvalidEntries {
            dir: dir.to_path_buf(),
            entries: invalid,
        })
    }
}

/// Lists the regular archive files directly under `dir`.
pub fn list_archives(dir: &Path) -> Result<BTreeSet<PathBuf>, ReconcileError> {
    let read_err = |source| ReconcileError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };
    let root = absolute_dir(dir)?;
    let mut archives = BTreeSet::new();

    for entry in std::fs::read_dir(&root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        let is_archive = path.file_name().is_some_and(has_archive_suffix);
        if is_archive && path.is_file() {
            archives.insert(path);
        }
    }

    Ok(archives)
}

/// Resolves `policy` against `dir`, failing before any listing if `dir`
/// has no absolute form or the policy names anything that is not an
/// archive directly under `dir`.
pub fn resolve(dir: &Path, policy: &ListPolicy) -> Result<BTreeSet<PathBuf>, ReconcileError> {
    let root = absolute_dir(dir)?;
    validate(&root, policy.entries())?;

    let resolved: BTreeSet<PathBuf> = match policy {
        ListPolicy::Allow(allowed) => allowed.iter().map(|entry| root.join(entry)).collect(),
        ListPolicy::Deny(denied) => {
            let denied: BTreeSet<PathBuf> = denied.iter().map(|entry| root.join(entry)).collect();
            let all = list_archives(dir)?;
            debug!(
                dir = %root.display(),
                found = all.len(),
                denied = denied.len(),
                "Listed archives"
            );
            all.difference(&denied).cloned().collect()
        }
    };

    info!(
        dir = %root.display(),
        mode = policy.mode(),
        resolved = resolved.len(),
        "Reconciled archive directory"
    );
    Ok(resolved)
}

pub fn resolve_with_denylist<S: AsRef<str>>(
    dir: &Path,
    denylist: &[S],
) -> Result<BTreeSet<PathBuf>, ReconcileError> {
    let entries = denylist.iter().map(|s| s.as_ref().to_string()).collect();
    resolve(dir, &ListPolicy::Deny(entries))
}

pub fn resolve_with_allowlist<S: AsRef<str>>(
    dir: &Path,
    allowlist: &[S],
) -> Result<BTreeSet<PathBuf>, ReconcileError> {
    let entries = allowlist.iter().map(|s| s.as_ref().to_string()).collect();
    resolve(dir, &ListPolicy::Allow(entries))
}
