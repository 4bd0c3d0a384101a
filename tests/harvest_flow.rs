use jar_harvester::harvest::{
    extract, resolve_with_allowlist, resolve_with_denylist, EntryProblem, LibraryHarvester,
    ListPolicy, ReconcileError,
};
use jar_harvester::{DependencyGroup, HarvestError, PackageIdentity};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn sdk_lib(dir: &Path) {
    for file in [
        "cglib-2.2.2.jar",
        "markdownj-core-0.4.2-SNAPSHOT.jar",
        "junit-rt.jar",
        "jsr173_1.0_api.jar",
        "LICENSE.txt",
    ] {
        fs::write(dir.join(file), b"PK\x03\x04").unwrap();
    }
    fs::create_dir(dir.join("ext")).unwrap();
    fs::write(dir.join("ext").join("hidden-1.0.jar"), b"PK").unwrap();
}

#[test]
fn extraction_scenarios() {
    let cases = [
        ("cglib-2.2.2.jar", "cglib", "2.2.2"),
        ("markdownj-core-0.4.2-SNAPSHOT.jar", "markdownj-core", "0.4.2-SNAPSHOT"),
        ("junit-rt.jar", "junit-rt", "latest"),
        ("jsr173_1.0_api.jar", "jsr173_1.0_api", "latest"),
    ];
    for (file, name, version) in cases {
        assert_eq!(extract(file), PackageIdentity::new(name, version), "{file}");
    }
}

#[test]
fn full_directory_becomes_one_group() {
    let temp = tempfile::tempdir().unwrap();
    sdk_lib(temp.path());

    let result = LibraryHarvester::new("sdk.community")
        .harvest("sdk", temp.path(), &ListPolicy::deny_none())
        .unwrap();

    let coordinates: BTreeSet<String> = result
        .group
        .declarations
        .iter()
        .map(|d| d.coordinate())
        .collect();
    let expected: BTreeSet<String> = [
        "sdk.community:cglib:2.2.2",
        "sdk.community:markdownj-core:0.4.2-SNAPSHOT",
        "sdk.community:junit-rt:latest",
        "sdk.community:jsr173_1.0_api:latest",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(coordinates, expected);
    assert_eq!(result.stats.archives_resolved, 4);
    assert_eq!(result.stats.versioned, 2);

    for declaration in &result.group.declarations {
        assert_eq!(declaration.locator.scheme(), "file");
        let path = declaration.locator.to_file_path().unwrap();
        assert!(path.starts_with(temp.path()));
        assert!(path.is_file());
    }
}

#[test]
fn group_serializes_to_json() {
    let temp = tempfile::tempdir().unwrap();
    sdk_lib(temp.path());

    let result = LibraryHarvester::new("sdk.ultimate")
        .harvest(
            "junit",
            temp.path(),
            &ListPolicy::Allow(vec!["junit-rt.jar".to_string()]),
        )
        .unwrap();

    let json = serde_json::to_string(&result.group).unwrap();
    let back: DependencyGroup = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result.group);
    assert_eq!(back.declarations[0].name, "junit-rt");
}

#[test]
fn deny_and_allow_partition_the_directory() {
    let temp = tempfile::tempdir().unwrap();
    sdk_lib(temp.path());

    let denied = ["cglib-2.2.2.jar", "junit-rt.jar"];
    let kept = resolve_with_denylist(temp.path(), &denied).unwrap();
    let allowed = resolve_with_allowlist(temp.path(), &denied).unwrap();

    assert!(kept.is_disjoint(&allowed));
    assert_eq!(kept.len() + allowed.len(), 4);
    assert!(!kept.contains(&temp.path().join("ext").join("hidden-1.0.jar")));
}

#[test]
fn misconfigured_list_names_every_bad_entry() {
    let temp = tempfile::tempdir().unwrap();
    sdk_lib(temp.path());

    let err = LibraryHarvester::new("sdk.community")
        .harvest(
            "sdk",
            temp.path(),
            &ListPolicy::Deny(vec![
                "LICENSE.txt".to_string(),
                "ext".to_string(),
                "ext/hidden-1.0.jar".to_string(),
                "missing.jar".to_string(),
                "cglib-2.2.2.jar".to_string(),
            ]),
        )
        .unwrap_err();

    let HarvestError::Reconcile(ReconcileError::InvalidEntries { dir, entries }) = &err else {
        panic!("expected invalid entries, got {err:?}");
    };
    assert_eq!(dir, temp.path());
    let problems: Vec<(&str, EntryProblem)> = entries
        .iter()
        .map(|e| (e.entry.as_str(), e.problem))
        .collect();
    assert_eq!(
        problems,
        vec![
            ("LICENSE.txt", EntryProblem::NotArchive),
            ("ext", EntryProblem::NotAFile),
            ("ext/hidden-1.0.jar", EntryProblem::NotDirectChild),
            ("missing.jar", EntryProblem::Missing),
        ]
    );
}
