//! Assemble and reconcile across a real object store.

use std::sync::Arc;

use skillpack::archive::{FileEntry, unpack};
use skillpack::document::{SectionKey, parse, validate};
use skillpack::error::SkillError;
use skillpack::package::{ImportReconciler, PackageAssembler, write_files};
use skillpack::storage::{MemoryStore, ObjectStore};
use skillpack::test_utils::fixtures::DEMO_SKILL;
use skillpack::test_utils::logging::TestLogger;

const SOURCE: &str = "skills/team-a/demo/v1/";

fn seeded_store() -> Arc<dyn ObjectStore> {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryStore::new());
    let files = [
        FileEntry::text("SKILL.md", DEMO_SKILL),
        FileEntry::text("scripts/run.py", "print('hi')"),
    ];
    write_files(store.as_ref(), SOURCE, &files).unwrap();
    store
}

#[test]
fn demo_document_parses_and_warns() {
    let log = TestLogger::new("demo_document_parses_and_warns");
    log.log_input("document", &DEMO_SKILL);

    let doc = parse(DEMO_SKILL).unwrap();
    assert_eq!(doc.front_matter.name(), "Demo");
    assert_eq!(doc.front_matter.description(), "d");
    assert!(doc.front_matter.tags().is_empty());
    assert_eq!(doc.front_matter.version(), 1);
    assert_eq!(doc.section(SectionKey::Purpose), Some("P"));
    assert_eq!(doc.section(SectionKey::Instructions), Some("Do X."));
    assert_eq!(doc.section(SectionKey::WhenToUse), None);
    assert_eq!(doc.section(SectionKey::Examples), None);

    let report = validate(DEMO_SKILL);
    log.log_actual(&report);
    assert!(report.valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.iter().any(|w| w.contains("When to Use")));
    assert!(report.warnings.iter().any(|w| w.contains("Examples")));
    assert!(report.warnings.iter().any(|w| w.contains("shorter than 50")));
    log.pass();
}

#[test]
fn assemble_then_reconcile_into_fresh_prefix() {
    let log = TestLogger::new("assemble_then_reconcile_into_fresh_prefix");
    let store = seeded_store();

    let (archive, metadata) = PackageAssembler::new(Arc::clone(&store)).assemble(SOURCE).unwrap();
    log.log_actual(&metadata);
    assert_eq!(metadata.archive_name, "demo-v1.tar.gz");
    assert_eq!(metadata.storage_prefix, SOURCE);
    assert_eq!(metadata.files.len(), 2);
    assert_eq!(metadata.files[0].path, "SKILL.md");

    let entries = unpack(&archive).unwrap();
    assert_eq!(entries[0].path, "SKILL.md");

    let target = "skills/team-b/demo/v1/";
    let result = ImportReconciler::new(Arc::clone(&store)).reconcile(&archive, target).unwrap();
    assert_eq!(result.manifest.len(), 2);
    assert_eq!(result.skill.name, "Demo");
    for entry in &result.manifest {
        assert!(entry.storage_key.starts_with(target));
        let original = store.get(&format!("{SOURCE}{}", entry.path)).unwrap();
        assert_eq!(store.get(&entry.storage_key).unwrap(), original);
    }
    log.pass();
}

#[test]
fn assemble_without_document_fails() {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryStore::new());
    store.put("skills/t/x/v1/scripts/run.py", b"print(1)", None).unwrap();

    let err = PackageAssembler::new(Arc::clone(&store))
        .assemble("skills/t/x/v1/")
        .unwrap_err();
    assert!(matches!(err, SkillError::MissingManifestRoot(_)), "{err:?}");
}

#[test]
fn assemble_empty_prefix_fails() {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryStore::new());
    let err = PackageAssembler::new(store).assemble("skills/t/none/v1/").unwrap_err();
    assert!(matches!(err, SkillError::EmptyPackage(_)), "{err:?}");
}

#[test]
fn reconcile_rejects_archive_without_document() {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryStore::new());
    let archive = skillpack::archive::pack(&[FileEntry::text("notes.md", "n")]).unwrap();

    let err = ImportReconciler::new(Arc::clone(&store))
        .reconcile(&archive, "skills/t/x/v1/")
        .unwrap_err();
    assert!(matches!(err, SkillError::MissingManifestRoot(_)), "{err:?}");
    assert!(store.list("skills/").unwrap().is_empty());
}
