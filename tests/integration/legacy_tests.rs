//! Legacy JSON bundles in and out of a library.

use std::sync::Arc;

use serde_json::Value;
use skillpack::archive::FileEntry;
use skillpack::config::PackagesConfig;
use skillpack::error::SkillError;
use skillpack::package::{Scope, SkillLibrary, from_legacy_bundle};
use skillpack::storage::{MemoryStore, ObjectStore};
use skillpack::test_utils::fixtures::{DEMO_SKILL, demo_input};
use skillpack::test_utils::logging::TestLogger;

const BUNDLE: &str = r##"{
    "metadata": {"name": "X", "description": "d", "tags": [], "version": 3},
    "content": "---\nname: X\ndescription: d\nversion: 3\n---\n## Purpose\nP\n## Instructions\nI",
    "assets": {"ref.md": "# Ref"},
    "version": 3,
    "exportedAt": "2024-05-01T12:00:00.000Z"
}"##;

#[test]
fn bundle_yields_document_and_assets() {
    let log = TestLogger::new("bundle_yields_document_and_assets");
    let result = from_legacy_bundle(BUNDLE.as_bytes()).unwrap();
    log.log_actual(&result.files);

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.files[0].path, "SKILL.md");
    assert_eq!(result.files[0].content.as_text(), Some(result.skill.content.as_str()));
    assert!(result.files[1].same_file(&FileEntry::text("ref.md", "# Ref")));
    assert_eq!(result.skill.version, 3);
    log.pass();
}

#[test]
fn import_legacy_lands_at_bundle_version() {
    let lib = SkillLibrary::new(Arc::new(MemoryStore::new()), PackagesConfig::default());
    let stored = lib.import_legacy(BUNDLE.as_bytes(), &Scope::Personal).unwrap();

    assert_eq!(stored.path.to_string(), "skills/_personal/x/v3/");
    let keys = lib.store().list("skills/_personal/x/").unwrap();
    assert_eq!(keys, ["skills/_personal/x/v3/SKILL.md", "skills/_personal/x/v3/ref.md"]);
}

#[test]
fn export_legacy_skips_binary_files() {
    let lib = SkillLibrary::new(Arc::new(MemoryStore::new()), PackagesConfig::default());
    let files = [
        FileEntry::text("notes.md", "# Notes"),
        FileEntry::bytes("logo.png", vec![0x89, b'P', b'N', b'G', 0xff]),
    ];
    lib.create(&demo_input(), Some(DEMO_SKILL), &files, &Scope::Personal).unwrap();

    let bytes = lib.export_legacy("skills/_personal/demo/v1/").unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["metadata"]["name"], "Demo");
    assert_eq!(json["content"], DEMO_SKILL);
    assert_eq!(json["assets"]["notes.md"], "# Notes");
    assert!(json["assets"].get("logo.png").is_none());
    assert!(json["exportedAt"].as_str().is_some_and(|ts| ts.ends_with('Z')));

    let back = from_legacy_bundle(&bytes).unwrap();
    assert_eq!(back.skill.name, "Demo");
    assert_eq!(back.files.len(), 2);
}

#[test]
fn malformed_bundles_are_rejected() {
    for raw in [
        "not json",
        "[]",
        r#"{"content": "x"}"#,
        r#"{"metadata": {"name": "X", "description": "d"}}"#,
        r#"{"metadata": {"name": "X", "description": "d"}, "content": ""}"#,
    ] {
        let err = from_legacy_bundle(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, SkillError::InvalidBundle(_)), "{raw}: {err:?}");
    }

    let err = from_legacy_bundle(br#"{"metadata": {"description": "d"}, "content": "x"}"#).unwrap_err();
    assert!(matches!(err, SkillError::SchemaViolation { .. }), "{err:?}");
}
