//! Writing file sets to storage and recording what was written.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::archive::{FileEntry, normalize_relative_path};
use crate::error::{Result, SkillError};
use crate::storage::ObjectStore;

use super::paths::normalize_prefix;

/// One object written to (or read from) the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub path: String,
    pub storage_key: String,
    pub size: u64,
    pub content_type: String,
}

/// Put each file under `prefix`, one at a time in input order.
///
/// Paths are checked before anything is written. A storage failure after
/// that returns [`SkillError::PartialWrite`] carrying the entries already
/// in place; nothing is rolled back.
pub fn write_files(
    store: &dyn ObjectStore,
    prefix: &str,
    files: &[FileEntry],
) -> Result<Vec<ManifestEntry>> {
    let prefix = normalize_prefix(prefix)?;
    let paths = files
        .iter()
        .map(|file| normalize_relative_path(&file.path))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(files.len());
    for (file, path) in files.iter().zip(paths) {
        let storage_key = format!("{prefix}{path}");
        let content_type = file.resolved_content_type();
        let bytes = file.content.as_bytes();

        if let Err(source) = store.put(&storage_key, bytes, Some(&content_type)) {
            warn!(
                key = %storage_key,
                written = written.len(),
                error = %source,
                "write stopped partway"
            );
            return Err(SkillError::PartialWrite {
                written,
                source: Box::new(source),
            });
        }

        written.push(ManifestEntry {
            path,
            storage_key,
            size: bytes.len() as u64,
            content_type,
        });
    }

    debug!(prefix = %prefix, files = written.len(), "wrote file set");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_utils::FailingStore;

    #[test]
    fn writes_in_order_with_resolved_types() {
        let store = MemoryStore::new();
        let files = vec![
            FileEntry::text("SKILL.md", "doc"),
            FileEntry::text("scripts/run.py", "print('hi')"),
            FileEntry::bytes("blob", vec![1, 2]).with_content_type("application/x-custom"),
        ];
        let manifest = write_files(&store, "skills/t/demo/v1", &files).unwrap();

        let keys: Vec<&str> = manifest.iter().map(|e| e.storage_key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "skills/t/demo/v1/SKILL.md",
                "skills/t/demo/v1/scripts/run.py",
                "skills/t/demo/v1/blob"
            ]
        );
        assert_eq!(manifest[1].content_type, "text/x-python");
        assert_eq!(manifest[1].size, 11);
        assert_eq!(manifest[2].content_type, "application/x-custom");
        assert_eq!(
            store.content_type("skills/t/demo/v1/blob").as_deref(),
            Some("application/x-custom")
        );
    }

    #[test]
    fn invalid_path_writes_nothing() {
        let store = MemoryStore::new();
        let files = vec![FileEntry::text("SKILL.md", "doc"), FileEntry::text("../x", "y")];
        let err = write_files(&store, "skills/t/demo/v1/", &files).unwrap_err();
        assert!(matches!(err, SkillError::InvalidPath(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn failure_midway_reports_written_entries() {
        let store = FailingStore::fail_puts_after(1);
        let files = vec![
            FileEntry::text("SKILL.md", "doc"),
            FileEntry::text("a.md", "a"),
            FileEntry::text("b.md", "b"),
        ];
        let err = write_files(&store, "skills/t/demo/v1/", &files).unwrap_err();
        let SkillError::PartialWrite { written, source } = err else {
            panic!("expected partial write, got {err:?}");
        };
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].path, "SKILL.md");
        assert!(matches!(*source, SkillError::Storage { op: "put", .. }));
        assert!(store.inner().exists("skills/t/demo/v1/SKILL.md").unwrap());
    }
}
