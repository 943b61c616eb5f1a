//! Import reconciliation: archive -> stored file set plus recovered skill.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::archive::{self, FileEntry};
use crate::document::{self, ParsedDocument, SKILL_FILE};
use crate::error::{Result, SkillError};
use crate::storage::ObjectStore;

use super::manifest::{ManifestEntry, write_files};
use super::paths::slugify;

/// Skill record recovered from an imported package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedSkill {
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Full SKILL.md text.
    pub content: String,
    pub version: u32,
    pub tags: Vec<String>,
}

impl ImportedSkill {
    #[must_use]
    pub fn from_document(doc: &ParsedDocument) -> Self {
        let front_matter = &doc.front_matter;
        Self {
            name: front_matter.name().to_string(),
            slug: slugify(front_matter.name()),
            description: front_matter.description().to_string(),
            content: doc.raw().to_string(),
            version: front_matter.version(),
            tags: front_matter.tags().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub skill: ImportedSkill,
    pub files: Vec<FileEntry>,
    /// What was written; empty when nothing has been stored yet.
    pub manifest: Vec<ManifestEntry>,
}

/// Unpacks archives into storage. Prefix-agnostic: it writes wherever it is
/// told and never moves files afterwards.
pub struct ImportReconciler {
    store: Arc<dyn ObjectStore>,
}

impl ImportReconciler {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Unpack `archive`, parse its `SKILL.md` and write every entry under
    /// `target_prefix`.
    ///
    /// # Errors
    ///
    /// Archive errors from [`archive::unpack`], [`SkillError::MissingManifestRoot`]
    /// without a top-level `SKILL.md`, parse errors, and
    /// [`SkillError::PartialWrite`] when storage fails partway.
    pub fn reconcile(&self, archive: &[u8], target_prefix: &str) -> Result<ImportResult> {
        let files = archive::unpack(archive)?;
        let document = find_document(&files, target_prefix)?;
        let skill = ImportedSkill::from_document(&document);

        let manifest = write_files(self.store.as_ref(), target_prefix, &files)?;
        info!(
            prefix = %target_prefix,
            slug = %skill.slug,
            version = skill.version,
            files = manifest.len(),
            "reconciled archive"
        );

        Ok(ImportResult {
            skill,
            files,
            manifest,
        })
    }
}

fn find_document(files: &[FileEntry], origin: &str) -> Result<ParsedDocument> {
    let root = files
        .iter()
        .find(|file| file.path == SKILL_FILE)
        .ok_or_else(|| SkillError::MissingManifestRoot(format!("archive for {origin}")))?;
    let text = root
        .content
        .as_text()
        .ok_or_else(|| SkillError::MalformedFrontMatter(format!("{SKILL_FILE} is not valid UTF-8")))?;
    document::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::pack;
    use crate::storage::MemoryStore;
    use crate::test_utils::FailingStore;
    use crate::test_utils::fixtures::DEMO_SKILL;

    fn demo_archive() -> Vec<u8> {
        pack(&[
            FileEntry::text(SKILL_FILE, DEMO_SKILL),
            FileEntry::text("scripts/run.py", "print('hi')"),
        ])
        .unwrap()
    }

    #[test]
    fn writes_every_entry_under_target() {
        let store = Arc::new(MemoryStore::new());
        let result = ImportReconciler::new(store.clone())
            .reconcile(&demo_archive(), "skills/_personal/demo/v1/")
            .unwrap();

        assert_eq!(result.skill.name, "Demo");
        assert_eq!(result.skill.slug, "demo");
        assert_eq!(result.skill.version, 1);
        assert_eq!(result.skill.content, DEMO_SKILL);
        assert_eq!(result.manifest.len(), 2);
        assert_eq!(result.manifest[0].storage_key, "skills/_personal/demo/v1/SKILL.md");
        assert_eq!(
            store.get("skills/_personal/demo/v1/scripts/run.py").unwrap(),
            b"print('hi')"
        );
    }

    #[test]
    fn archive_without_document_is_rejected() {
        let bytes = pack(&[FileEntry::text("scripts/run.py", "x")]).unwrap();
        let store = Arc::new(MemoryStore::new());
        let err = ImportReconciler::new(store.clone())
            .reconcile(&bytes, "skills/t/x/v1/")
            .unwrap_err();
        assert!(matches!(err, SkillError::MissingManifestRoot(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_front_matter_writes_nothing() {
        let bytes = pack(&[FileEntry::text(SKILL_FILE, "---\nname: x\n---\n")]).unwrap();
        let store = Arc::new(MemoryStore::new());
        let err = ImportReconciler::new(store.clone())
            .reconcile(&bytes, "skills/t/x/v1/")
            .unwrap_err();
        assert!(matches!(err, SkillError::SchemaViolation { ref field, .. } if field == "description"));
        assert!(store.is_empty());
    }

    #[test]
    fn partial_failure_leaves_written_entries() {
        let store = Arc::new(FailingStore::fail_puts_after(1));
        let err = ImportReconciler::new(store.clone())
            .reconcile(&demo_archive(), "skills/t/demo/v1/")
            .unwrap_err();
        let SkillError::PartialWrite { written, .. } = err else {
            panic!("expected partial write");
        };
        assert_eq!(written.len(), 1);
        assert_eq!(store.inner().list("skills/t/demo/v1/").unwrap().len(), 1);
    }
}
