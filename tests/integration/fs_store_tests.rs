//! Filesystem-backed storage driven through the library.

use std::sync::Arc;

use skillpack::archive::FileEntry;
use skillpack::config::{Config, PackagesConfig, StorageBackend};
use skillpack::error::SkillError;
use skillpack::package::{Scope, SkillLibrary};
use skillpack::storage::{FsStore, ObjectStore, UrlSigner, open_store};
use skillpack::test_utils::fixtures::{DEMO_SKILL, UnitTestFixture, demo_input};
use skillpack::test_utils::logging::TestLogger;

fn fs_library(fixture: &UnitTestFixture) -> SkillLibrary {
    let signer = UrlSigner::new("http://127.0.0.1:8080/files", "secret");
    let store = FsStore::open(fixture.data_path.join("store"), signer).unwrap();
    SkillLibrary::new(Arc::new(store), PackagesConfig::default())
}

#[test]
fn library_survives_reopen() {
    let log = TestLogger::new("library_survives_reopen");
    let fixture = UnitTestFixture::new();

    {
        let lib = fs_library(&fixture);
        let files = [FileEntry::bytes("assets/icon.png", vec![0, 1, 2, 255])];
        lib.create(&demo_input(), Some(DEMO_SKILL), &files, &Scope::Personal).unwrap();
    }

    let lib = fs_library(&fixture);
    let keys = lib.store().list("skills/").unwrap();
    log.log_actual(&keys);
    assert_eq!(
        keys,
        [
            "skills/_personal/demo/v1/SKILL.md",
            "skills/_personal/demo/v1/assets/icon.png"
        ]
    );
    let icon = lib.read_file("skills/_personal/demo/v1/", "assets/icon.png").unwrap();
    assert_eq!(icon.content.as_bytes(), &[0, 1, 2, 255]);
    log.pass();
}

#[test]
fn import_staging_is_removed_from_disk() {
    let fixture = UnitTestFixture::new();
    let lib = fs_library(&fixture);
    lib.create(&demo_input(), Some(DEMO_SKILL), &[], &Scope::Personal).unwrap();
    let (archive, _) = lib.export_archive("skills/_personal/demo/v1/").unwrap();

    lib.import_archive(&archive, &Scope::from_team(Some("ops"))).unwrap();

    let team_dir = fixture.data_path.join("store/objects/skills/ops");
    let entries: Vec<String> = std::fs::read_dir(&team_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["demo"]);
}

#[test]
fn open_store_follows_config() {
    let fixture = UnitTestFixture::new();
    let mut config = Config::for_root(&fixture.data_path);
    config.storage.backend = StorageBackend::Fs;

    let store = open_store(&config.storage).unwrap();
    store.put("skills/t/a/v1/SKILL.md", b"x", None).unwrap();
    assert!(fixture.data_path.join("store/objects/skills/t/a/v1/SKILL.md").is_file());

    config.storage.backend = StorageBackend::Memory;
    let memory = open_store(&config.storage).unwrap();
    assert!(memory.list("skills/").unwrap().is_empty());
}

#[test]
fn traversal_keys_never_reach_disk() {
    let fixture = UnitTestFixture::new();
    let store = FsStore::open(fixture.data_path.join("store"), UrlSigner::new("http://x", "s")).unwrap();

    for key in ["../escape", "/abs", "a/../../b", "a\\b"] {
        let err = store.put(key, b"x", None).unwrap_err();
        assert!(matches!(err, SkillError::InvalidPath(_)), "{key}: {err:?}");
    }
    assert!(!fixture.data_path.join("escape").exists());
}
