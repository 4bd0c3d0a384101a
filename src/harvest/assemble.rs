//! Declaration assembly: one `file://`-located declaration per archive path.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use super::extract::FilenameExtractor;
use super::traits::IdentityExtractor;
use crate::error::{HarvestError, Result};
use crate::model::{DependencyDeclaration, Exclusion, PackageIdentity};

/// Builds one [`DependencyDeclaration`] per archive path.
///
/// Declarations are emitted in the iteration order of the input and are
/// never merged: two paths that infer the same identity produce two
/// identical coordinates.
pub struct DeclarationAssembler<X = FilenameExtractor>
where
    X: IdentityExtractor,
{
    organization: String,
    extractor: X,
    exclusions: BTreeSet<Exclusion>,
}

impl DeclarationAssembler<FilenameExtractor> {
    /// Creates an assembler that infers identities from filenames.
    pub fn new(organization: impl Into<String>) -> Self {
        Self::with_extractor(organization, FilenameExtractor)
    }
}

impl<X> DeclarationAssembler<X>
where
    X: IdentityExtractor,
{
    pub fn with_extractor(organization: impl Into<String>, extractor: X) -> Self {
        Self {
            organization: organization.into(),
            extractor,
            exclusions: BTreeSet::new(),
        }
    }

    /// Attaches `exclusions` to every declaration.
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn declare(&self, path: &Path) -> Result<DependencyDeclaration> {
        let PackageIdentity { name, version } = self.extractor.extract(path);
        let locator =
            Url::from_file_path(path).map_err(|_| HarvestError::Locator(path.to_path_buf()))?;

        debug!(
            stage = self.extractor.stage_name(),
            package = %name,
            version = %version,
            path = %path.display(),
            "Inferred identity"
        );

        Ok(DependencyDeclaration {
            organization: self.organization.clone(),
            name,
            version,
            locator,
            exclusions: self.exclusions.clone(),
        })
    }

    pub fn assemble<'a, I>(&self, paths: I) -> Result<Vec<DependencyDeclaration>>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let declarations = paths
            .into_iter()
            .map(|path| self.declare(path))
            .collect::<Result<Vec<_>>>()?;

        let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
        for declaration in &declarations {
            *seen
                .entry((declaration.name.as_str(), declaration.version.as_str()))
                .or_default() += 1;
        }
        for ((name, version), count) in seen.into_iter().filter(|(_, count)| *count > 1) {
            warn!(
                organization = %self.organization,
                package = name,
                version,
                count,
                "Several archives share one identity"
            );
        }

        Ok(declarations)
    }
}

/// Maps each path through `extractor` into a declaration tagged with `organization`.
pub fn assemble<'a, I, X>(
    organization: &str,
    paths: I,
    extractor: X,
) -> Result<Vec<DependencyDeclaration>>
where
    I: IntoIterator<Item = &'a PathBuf>,
    X: IdentityExtractor,
{
    DeclarationAssembler::with_extractor(organization, extractor).assemble(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExtractor;

    impl IdentityExtractor for FixedExtractor {
        fn extract(&self, _path: &Path) -> PackageIdentity {
            PackageIdentity::new("fixed", "1.0")
        }

        fn stage_name(&self) -> &'static str {
            "fixed_extractor"
        }
    }

    #[test]
    fn test_declarations_follow_input_order() {
        let paths = vec![
            PathBuf::from("/sdk/lib/junit-rt.jar"),
            PathBuf::from("/sdk/lib/cglib-2.2.2.jar"),
        ];
        let declarations = DeclarationAssembler::new("sdk.community")
            .assemble(&paths)
            .unwrap();

        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].coordinate(), "sdk.community:junit-rt:latest");
        assert_eq!(declarations[1].coordinate(), "sdk.community:cglib:2.2.2");
        assert_eq!(
            declarations[1].locator.as_str(),
            "file:///sdk/lib/cglib-2.2.2.jar"
        );
        assert!(declarations[1].exclusions.is_empty());
    }

    #[test]
    fn test_duplicate_identities_are_kept() {
        let paths = vec![PathBuf::from("/a/x.jar"), PathBuf::from("/b/y.jar")];
        let declarations = assemble("org", &paths, FixedExtractor).unwrap();

        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].coordinate(), declarations[1].coordinate());
        assert_ne!(declarations[0].locator, declarations[1].locator);
    }

    #[test]
    fn test_exclusions_are_attached() {
        let paths = vec![PathBuf::from("/sdk/lib/cglib-2.2.2.jar")];
        let declarations = DeclarationAssembler::new("sdk.ultimate")
            .with_exclusions([Exclusion::new("org.ow2.asm", "asm")])
            .assemble(&paths)
            .unwrap();

        assert!(declarations[0]
            .exclusions
            .contains(&Exclusion::new("org.ow2.asm", "asm")));
    }

    #[test]
    fn test_relative_path_has_no_locator() {
        let paths = vec![PathBuf::from("lib/cglib-2.2.2.jar")];
        let err = DeclarationAssembler::new("org").assemble(&paths).unwrap_err();
        assert!(matches!(err, HarvestError::Locator(_)));
    }
}
