use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::HarvestError;

/// Version recorded when nothing version-like can be recovered from a filename.
pub const LATEST_VERSION: &str = "latest";

/// Whether `version` was recovered from a filename rather than defaulted.
pub fn is_versioned(version: &str) -> bool {
    version != LATEST_VERSION
}

/// Identity inferred from an archive filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity carrying the `"latest"` sentinel version.
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self::new(name, LATEST_VERSION)
    }

    pub fn is_versioned(&self) -> bool {
        is_versioned(&self.version)
    }
}

/// An `org:name` coordinate excluded from a single declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    pub organization: String,
    pub name: String,
}

impl Exclusion {
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Exclusion {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((org, name)) if !org.is_empty() && !name.is_empty() => Ok(Self::new(org, name)),
            _ => Err(HarvestError::InvalidExclusion(s.to_string())),
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.organization, self.name)
    }
}

/// One resolved archive, addressable by `org:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub organization: String,
    pub name: String,
    pub version: String,

    /// `file://` URL of the archive
    pub locator: Url,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusions: BTreeSet<Exclusion>,
}

impl DependencyDeclaration {
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.organization, self.name, self.version)
    }

    pub fn is_versioned(&self) -> bool {
        is_versioned(&self.version)
    }
}

/// Named set of declarations handed to the library-declaration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    pub name: String,
    pub declarations: Vec<DependencyDeclaration>,
}

impl DependencyGroup {
    pub fn new(name: impl Into<String>, declarations: Vec<DependencyDeclaration>) -> Self {
        Self {
            name: name.into(),
            declarations,
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
