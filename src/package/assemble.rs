//! Package assembly: stored file set -> archive plus metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archive::{self, FileEntry};
use crate::document::{self, ParsedDocument, SKILL_FILE};
use crate::error::{Result, SkillError};
use crate::storage::ObjectStore;

use super::paths::{normalize_prefix, slugify};

/// Summary of one file inside an exported package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFile {
    pub path: String,
    pub size: u64,
    pub content_type: String,
}

/// Describes an assembled archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub version: u32,
    pub tags: Vec<String>,
    pub exported_at: DateTime<Utc>,
    pub storage_prefix: String,
    /// `<slug>-v<version>.tar.gz`
    pub archive_name: String,
    pub files: Vec<PackageFile>,
}

#[must_use]
pub fn archive_name(slug: &str, version: u32) -> String {
    format!("{slug}-v{version}.tar.gz")
}

/// A stored file set read back from one prefix.
#[derive(Debug, Clone)]
pub struct StoredPackage {
    pub prefix: String,
    /// `SKILL.md` first, the rest sorted by path.
    pub files: Vec<FileEntry>,
    pub document: ParsedDocument,
}

impl StoredPackage {
    /// Files other than `SKILL.md`.
    pub fn ancillary(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(|file| file.path != SKILL_FILE)
    }
}

/// Read every object under `prefix` and parse its `SKILL.md`.
///
/// # Errors
///
/// [`SkillError::EmptyPackage`] when nothing is stored under the prefix,
/// [`SkillError::MissingManifestRoot`] when there is no top-level `SKILL.md`.
pub fn load_package(store: &dyn ObjectStore, prefix: &str) -> Result<StoredPackage> {
    let prefix = normalize_prefix(prefix)?;
    let keys = store.list(&prefix)?;
    if keys.is_empty() {
        return Err(SkillError::EmptyPackage(prefix));
    }

    let mut files = Vec::with_capacity(keys.len());
    for key in &keys {
        let Some(path) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let bytes = store.get(key)?;
        files.push(FileEntry::classified(path, bytes));
    }
    files.sort_by(|a, b| {
        (a.path != SKILL_FILE)
            .cmp(&(b.path != SKILL_FILE))
            .then_with(|| a.path.cmp(&b.path))
    });

    let Some(root) = files.first().filter(|file| file.path == SKILL_FILE) else {
        return Err(SkillError::MissingManifestRoot(prefix));
    };
    let text = root.content.as_text().ok_or_else(|| {
        SkillError::MalformedFrontMatter(format!("{prefix}{SKILL_FILE} is not valid UTF-8"))
    })?;
    let document = document::parse(text)?;

    debug!(prefix = %prefix, files = files.len(), "loaded stored package");
    Ok(StoredPackage {
        prefix,
        files,
        document,
    })
}

/// Builds export archives from stored packages. Never writes to storage.
pub struct PackageAssembler {
    store: Arc<dyn ObjectStore>,
}

impl PackageAssembler {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Pack the file set under `prefix` into an archive and describe it.
    pub fn assemble(&self, prefix: &str) -> Result<(Vec<u8>, PackageMetadata)> {
        let package = load_package(self.store.as_ref(), prefix)?;
        let bytes = archive::pack(&package.files)?;

        let front_matter = &package.document.front_matter;
        let slug = slugify(front_matter.name());
        let version = front_matter.version();
        let metadata = PackageMetadata {
            name: front_matter.name().to_string(),
            description: front_matter.description().to_string(),
            tags: front_matter.tags().to_vec(),
            version,
            exported_at: Utc::now(),
            archive_name: archive_name(&slug, version),
            slug,
            files: package
                .files
                .iter()
                .map(|file| PackageFile {
                    path: file.path.clone(),
                    size: file.size() as u64,
                    content_type: file.resolved_content_type(),
                })
                .collect(),
            storage_prefix: package.prefix,
        };

        info!(
            prefix = %metadata.storage_prefix,
            archive = %metadata.archive_name,
            files = metadata.files.len(),
            bytes = bytes.len(),
            "assembled package"
        );
        Ok((bytes, metadata))
    }
}
