//! SDK installation layout.
//!
//! Directory locations and the installation flavor are explicit values.
//! [`SdkLayout::from_env`] is the single place that reads the process
//! environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HarvestError, Result};

pub const SDK_HOME_VAR: &str = "JAR_HARVESTER_SDK_HOME";
pub const FLAVOR_VAR: &str = "JAR_HARVESTER_FLAVOR";

/// Edition of the installation being harvested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Community,
    Ultimate,
}

impl FromStr for Flavor {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "community" => Ok(Flavor::Community),
            "ultimate" => Ok(Flavor::Ultimate),
            other => Err(HarvestError::Config(format!(
                "unknown flavor '{}', expected 'community' or 'ultimate'",
                other
            ))),
        }
    }
}

impl Flavor {
    /// Organization tag used when the caller supplies none.
    pub fn default_organization(self) -> String {
        format!("sdk.{}", self)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Community => f.write_str("community"),
            Flavor::Ultimate => f.write_str("ultimate"),
        }
    }
}

/// A bundled plugin whose `lib/` directory is harvested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    /// Only shipped with [`Flavor::Ultimate`]
    #[serde(default)]
    pub ultimate_only: bool,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ultimate_only: false,
        }
    }

    pub fn ultimate(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ultimate_only: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkLayout {
    pub home: PathBuf,
    pub flavor: Flavor,
}

impl SdkLayout {
    pub fn new(home: impl Into<PathBuf>, flavor: Flavor) -> Self {
        Self {
            home: home.into(),
            flavor,
        }
    }

    /// Reads the layout from [`SDK_HOME_VAR`] and [`FLAVOR_VAR`].
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the layout from an injected variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup(SDK_HOME_VAR)
            .filter(|home| !home.trim().is_empty())
            .ok_or_else(|| HarvestError::Config(format!("{} is not set", SDK_HOME_VAR)))?;
        let flavor = match lookup(FLAVOR_VAR) {
            Some(flavor) if !flavor.trim().is_empty() => flavor.parse()?,
            _ => Flavor::default(),
        };
        Ok(Self::new(home, flavor))
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.home.join("lib")
    }

    pub fn plugin_lib_dir(&self, plugin: &str) -> PathBuf {
        self.home.join("plugins").join(plugin).join("lib")
    }

    /// Plugins available in this flavor, paired with their `lib/` directories.
    pub fn plugin_lib_dirs<'a>(
        &self,
        plugins: &'a [PluginSpec],
    ) -> Vec<(&'a PluginSpec, PathBuf)> {
        plugins
            .iter()
            .filter(|plugin| !plugin.ultimate_only || self.flavor == Flavor::Ultimate)
            .map(|plugin| (plugin, self.plugin_lib_dir(&plugin.name)))
            .collect()
    }

    pub fn default_organization(&self) -> String {
        self.flavor.default_organization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_flavor_parsing() {
        assert_eq!("Ultimate".parse::<Flavor>().unwrap(), Flavor::Ultimate);
        assert_eq!(" community ".parse::<Flavor>().unwrap(), Flavor::Community);
        assert!("enterprise".parse::<Flavor>().is_err());
        assert_eq!(Flavor::Community.default_organization(), "sdk.community");
    }

    #[test]
    fn test_layout_from_vars() {
        let layout = SdkLayout::from_vars(vars(&[
            (SDK_HOME_VAR, "/opt/sdk"),
            (FLAVOR_VAR, "ultimate"),
        ]))
        .unwrap();

        assert_eq!(layout, SdkLayout::new("/opt/sdk", Flavor::Ultimate));
        assert_eq!(layout.lib_dir(), PathBuf::from("/opt/sdk/lib"));
        assert_eq!(layout.default_organization(), "sdk.ultimate");
    }

    #[test]
    fn test_layout_defaults_to_community() {
        let layout = SdkLayout::from_vars(vars(&[(SDK_HOME_VAR, "/opt/sdk")])).unwrap();
        assert_eq!(layout.flavor, Flavor::Community);
    }

    #[test]
    fn test_layout_requires_home() {
        let err = SdkLayout::from_vars(vars(&[(FLAVOR_VAR, "ultimate")])).unwrap_err();
        assert!(err.to_string().contains(SDK_HOME_VAR));
    }

    #[test]
    fn test_plugin_dirs_follow_flavor() {
        let plugins = vec![PluginSpec::new("junit"), PluginSpec::ultimate("spring")];

        let community = SdkLayout::new("/opt/sdk", Flavor::Community);
        let dirs = community.plugin_lib_dirs(&plugins);
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].0.name, "junit");
        assert_eq!(dirs[0].1, PathBuf::from("/opt/sdk/plugins/junit/lib"));

        let ultimate = SdkLayout::new("/opt/sdk", Flavor::Ultimate);
        assert_eq!(ultimate.plugin_lib_dirs(&plugins).len(), 2);
    }
}
