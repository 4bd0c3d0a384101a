//! Name/version inference from archive filenames.
//!
//! Inference never fails. Each filename runs through an ordered list of
//! attempts and the first one that matches wins:
//!
//! 1. **Structured**: `<name>[-<version>].jar`, where `name` is the longest
//!    run of `[a-z0-9_-]` and `version` is digits and dots with an optional
//!    `-<tag>` suffix (`0.4.2-SNAPSHOT`).
//! 2. **Stem**: anything ending in `.jar`; the whole stem becomes the name.
//! 3. **Raw**: the base filename itself.
//!
//! Missing versions become [`LATEST_VERSION`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::reconcile::ARCHIVE_SUFFIX;
use super::traits::IdentityExtractor;
use crate::model::{PackageIdentity, LATEST_VERSION};

static STRUCTURED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[a-z0-9_\-]+)(?:-(?P<version>[0-9.]+(?:-[A-Za-z0-9]+)?))?\.jar$")
        .expect("structured archive pattern is valid")
});

static STEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>.+)\.jar$").expect("stem archive pattern is valid"));

/// Name used when the base filename is empty.
const UNNAMED: &str = "unnamed";

/// Outcome of [`infer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inference {
    /// The structured pattern matched; `version` is `None` when the
    /// stem carried no hyphen-delimited numeric version.
    Matched {
        name: String,
        version: Option<String>,
    },

    /// Only the stem or the raw filename could be used as a name.
    Fallback { name: String },
}

impl Inference {
    pub fn into_identity(self) -> PackageIdentity {
        match self {
            Inference::Matched {
                name,
                version: Some(version),
            } => PackageIdentity::new(name, version),
            Inference::Matched {
                name,
                version: None,
            }
            | Inference::Fallback { name } => PackageIdentity::new(name, LATEST_VERSION),
        }
    }
}

fn structured(base: &str) -> Option<Inference> {
    let caps = STRUCTURED.captures(base)?;
    Some(Inference::Matched {
        name: caps["name"].to_string(),
        version: caps.name("version").map(|m| m.as_str().to_string()),
    })
}

fn stem(base: &str) -> Option<Inference> {
    let caps = STEM.captures(base)?;
    Some(Inference::Fallback {
        name: caps["name"].to_string(),
    })
}

fn raw(base: &str) -> Inference {
    let name = if base.is_empty() { UNNAMED } else { base };
    Inference::Fallback {
        name: name.to_string(),
    }
}

fn base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename)
}

/// Runs the ordered attempts against the base of `filename`.
pub fn infer(filename: &str) -> Inference {
    let base = base_name(filename);
    if !base.ends_with(ARCHIVE_SUFFIX) {
        return raw(base);
    }
    structured(base)
        .or_else(|| stem(base))
        .unwrap_or_else(|| raw(base))
}

/// Best-effort identity for `filename`.
pub fn extract(filename: &str) -> PackageIdentity {
    infer(filename).into_identity()
}

/// Default extractor: infers identity from the filename alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameExtractor;

impl IdentityExtractor for FilenameExtractor {
    fn extract(&self, path: &Path) -> PackageIdentity {
        extract(&path.to_string_lossy())
    }

    fn stage_name(&self) -> &'static str {
        "filename_extractor"
    }
}
