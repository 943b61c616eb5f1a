//! End-to-end flows through `SkillLibrary`.

use std::sync::Arc;
use std::time::Duration;

use skillpack::archive::FileEntry;
use skillpack::config::PackagesConfig;
use skillpack::document::CreateSkillInput;
use skillpack::error::SkillError;
use skillpack::package::{Scope, SkillLibrary, StaticRevision};
use skillpack::storage::{MemoryStore, ObjectStore, UrlSigner};
use skillpack::test_utils::fixtures::{COMPLETE_SKILL, DEMO_SKILL, demo_input};
use skillpack::test_utils::logging::TestLogger;

fn library() -> SkillLibrary {
    SkillLibrary::new(Arc::new(MemoryStore::new()), PackagesConfig::default())
}

fn team() -> Scope {
    Scope::from_team(Some("team-a"))
}

#[test]
fn create_iterate_export_import_cycle() {
    let log = TestLogger::new("create_iterate_export_import_cycle");
    let lib = library();

    let files = [FileEntry::text("scripts/run.py", "print('hi')\n")];
    let v1 = lib.create(&demo_input(), Some(DEMO_SKILL), &files, &team()).unwrap();
    log.log_actual(&v1.path);
    assert_eq!(v1.path.to_string(), "skills/team-a/demo/v1/");

    let revision = StaticRevision {
        content: COMPLETE_SKILL.replace("Changelog Writer", "Demo"),
        changelog: "Filled in every section".to_string(),
    };
    let step = lib.iterate("skills/team-a/demo/v1/", "needs examples", &revision).unwrap();
    assert_eq!(step.stored.path.to_string(), "skills/team-a/demo/v2/");
    assert_eq!(step.changelog, "Filled in every section");
    assert_eq!(step.stored.manifest.len(), 2);
    assert!(lib.publish_check("skills/team-a/demo/v2/").unwrap().warnings.is_empty());

    let (archive, metadata) = lib.export_archive("skills/team-a/demo/v2/").unwrap();
    assert_eq!(metadata.archive_name, "demo-v2.tar.gz");

    let other = Scope::from_team(Some("team-b"));
    let imported = lib.import_archive(&archive, &other).unwrap();
    log.log_actual(&imported.path);
    assert_eq!(imported.path.to_string(), "skills/team-b/demo/v2/");
    assert_eq!(imported.skill.version, 2);

    let staging: Vec<String> = lib
        .store()
        .list("skills/team-b/")
        .unwrap()
        .into_iter()
        .filter(|key| key.contains("/import-"))
        .collect();
    assert!(staging.is_empty(), "staging left behind: {staging:?}");
    assert_eq!(lib.versions(&team(), "demo").unwrap(), vec![1, 2]);
    log.pass();
}

#[test]
fn iterated_version_exports_and_reimports_at_new_version() {
    let lib = library();
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &Scope::Personal).unwrap();
    let revision = StaticRevision {
        content: DEMO_SKILL.replace("Do X.", "Do X, then Y."),
        changelog: "Added Y".to_string(),
    };
    lib.iterate("skills/_personal/demo/v1/", "add Y", &revision).unwrap();

    let stored = lib.read_file("skills/_personal/demo/v2/", "SKILL.md").unwrap();
    assert!(stored.content.as_text().unwrap().contains("version: 2\n"));

    let (archive, metadata) = lib.export_archive("skills/_personal/demo/v2/").unwrap();
    assert_eq!(metadata.version, 2);
    assert_eq!(metadata.archive_name, "demo-v2.tar.gz");

    let imported = library().import_archive(&archive, &Scope::Personal).unwrap();
    assert_eq!(imported.path.to_string(), "skills/_personal/demo/v2/");
}

#[test]
fn create_refuses_document_past_version_one() {
    let lib = library();
    let content = DEMO_SKILL.replace("version: 1", "version: 5");

    let err = lib.create(&demo_input(), Some(&content), &[], &team()).unwrap_err();
    assert!(
        matches!(err, SkillError::SchemaViolation { ref field, .. } if field == "version"),
        "{err:?}"
    );
    assert!(lib.store().list("skills/").unwrap().is_empty());
}

#[test]
fn import_into_occupied_version_cleans_staging() {
    let lib = library();
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &team()).unwrap();
    let (archive, _) = lib.export_archive("skills/team-a/demo/v1/").unwrap();

    let err = lib.import_archive(&archive, &team()).unwrap_err();
    assert!(matches!(err, SkillError::VersionExists(_)), "{err:?}");
    assert_eq!(lib.store().list("skills/team-a/").unwrap().len(), 1);
}

#[test]
fn create_renders_template_when_no_content() {
    let lib = library();
    let input = CreateSkillInput {
        name: "Release Notes".to_string(),
        description: "Write release notes".to_string(),
        tags: vec!["docs".to_string()],
        ..CreateSkillInput::default()
    };
    let stored = lib.create(&input, None, &[], &Scope::Personal).unwrap();

    assert_eq!(stored.path.to_string(), "skills/_personal/release-notes/v1/");
    let report = lib.publish_check("skills/_personal/release-notes/v1/").unwrap();
    assert!(report.valid);
}

#[test]
fn publish_check_lists_errors() {
    let lib = library();
    let content = "---\nname: Broken\ndescription: d\n---\n## Examples\nE\n";
    lib.create(&demo_input(), Some(content), &[], &team()).unwrap();

    let err = lib.publish_check("skills/team-a/demo/v1/").unwrap_err();
    let SkillError::ValidationFailed(message) = err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(message.contains("Purpose"));
    assert!(message.contains("Instructions"));
}

#[test]
fn iterate_rejects_unparseable_revision() {
    let lib = library();
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &team()).unwrap();
    let revision = StaticRevision {
        content: "---\nname: [oops\n---\n".to_string(),
        changelog: String::new(),
    };

    let err = lib.iterate("skills/team-a/demo/v1/", "", &revision).unwrap_err();
    assert!(matches!(err, SkillError::Transform(_)), "{err:?}");
    assert_eq!(lib.versions(&team(), "demo").unwrap(), vec![1]);
}

#[test]
fn signed_url_verifies_against_store_signer() {
    let signer = UrlSigner::new("https://files.example.test", "s3cret");
    let store = Arc::new(MemoryStore::with_signer(signer.clone()));
    let lib = SkillLibrary::new(store, PackagesConfig::default());
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &team()).unwrap();

    let url = lib
        .signed_url("skills/team-a/demo/v1/", "SKILL.md", Duration::from_secs(60))
        .unwrap();
    let now = chrono::Utc::now().timestamp();
    assert_eq!(signer.verify(&url, now).unwrap(), "skills/team-a/demo/v1/SKILL.md");
    assert!(signer.verify(&url, now + 3600).is_err());
}

#[test]
fn read_and_delete() {
    let lib = library();
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &team()).unwrap();

    let file = lib.read_file("skills/team-a/demo/v1/", "SKILL.md").unwrap();
    assert_eq!(file.content.as_text(), Some(DEMO_SKILL));
    assert!(matches!(
        lib.read_file("skills/team-a/demo/v1/", "missing.md"),
        Err(SkillError::ObjectNotFound(_))
    ));

    assert_eq!(lib.delete_skill(&team(), "demo").unwrap(), 1);
    assert!(matches!(lib.delete_skill(&team(), "demo"), Err(SkillError::ObjectNotFound(_))));
}
