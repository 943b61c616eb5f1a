//! Caller-side orchestration over one object store.
//!
//! `SkillLibrary` strings the parser, assembler, reconciler and legacy
//! adapter together into the flows a host service runs: create, publish
//! check, iterate, export, import, read and delete. It keeps no state beyond
//! the injected store and package settings.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::archive::{FileEntry, content_type, normalize_relative_path};
use crate::config::PackagesConfig;
use crate::document::{self, CreateSkillInput, SKILL_FILE, ValidationReport, render_document};
use crate::error::{Result, SkillError};
use crate::storage::ObjectStore;

use super::assemble::{PackageAssembler, PackageMetadata, load_package};
use super::legacy::{from_legacy_bundle, to_legacy_bundle};
use super::manifest::{ManifestEntry, write_files};
use super::paths::{SKILLS_ROOT, Scope, StoragePath, normalize_prefix, slugify};
use super::reconcile::{ImportReconciler, ImportedSkill};

/// Opaque collaborator that rewrites documents.
pub trait DocumentTransformer {
    /// New SKILL.md text addressing `feedback`.
    fn revise(&self, current: &str, feedback: &str) -> Result<String>;

    /// Short changelog describing the step from `previous` to `revised`.
    fn summarize(&self, previous: &str, revised: &str) -> Result<String>;
}

/// Transformer with a fixed answer, for revisions written outside the tool.
#[derive(Debug, Clone)]
pub struct StaticRevision {
    pub content: String,
    pub changelog: String,
}

impl DocumentTransformer for StaticRevision {
    fn revise(&self, _current: &str, _feedback: &str) -> Result<String> {
        Ok(self.content.clone())
    }

    fn summarize(&self, _previous: &str, _revised: &str) -> Result<String> {
        Ok(self.changelog.clone())
    }
}

/// A package version that now exists in storage.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSkill {
    pub path: StoragePath,
    pub skill: ImportedSkill,
    pub manifest: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Iteration {
    pub previous: StoragePath,
    pub stored: StoredSkill,
    pub changelog: String,
}

pub struct SkillLibrary {
    store: Arc<dyn ObjectStore>,
    packages: PackagesConfig,
}

impl SkillLibrary {
    pub fn new(store: Arc<dyn ObjectStore>, packages: PackagesConfig) -> Self {
        Self { store, packages }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    #[must_use]
    pub fn path_for(&self, scope: &Scope, slug: &str, version: u32) -> StoragePath {
        StoragePath::for_scope(scope, &self.packages, slug, version)
    }

    /// Write version 1 of a new skill. `content` replaces the rendered
    /// template when given and must declare version 1; `files` follow
    /// `SKILL.md`.
    pub fn create(
        &self,
        input: &CreateSkillInput,
        content: Option<&str>,
        files: &[FileEntry],
        scope: &Scope,
    ) -> Result<StoredSkill> {
        let content = match content {
            Some(text) => text.to_string(),
            None => render_document(input)?,
        };
        let parsed = document::parse(&content)?;
        if parsed.front_matter.version() != 1 {
            return Err(SkillError::schema(
                "version",
                format!("a new skill starts at 1, found {}", parsed.front_matter.version()),
            ));
        }

        let slug = slugify(&input.name);
        let path = self.path_for(scope, &slug, 1);
        self.ensure_vacant(&path)?;

        let mut to_write = Vec::with_capacity(files.len() + 1);
        to_write.push(skill_file(&content));
        for file in files {
            if normalize_relative_path(&file.path)? == SKILL_FILE {
                return Err(SkillError::InvalidPath(format!(
                    "{}: ancillary files cannot replace {SKILL_FILE}",
                    file.path
                )));
            }
            to_write.push(file.clone());
        }
        let manifest = write_files(self.store.as_ref(), &path.prefix(), &to_write)?;

        info!(prefix = %path, files = manifest.len(), "created skill");
        Ok(StoredSkill {
            skill: ImportedSkill {
                name: input.name.clone(),
                slug,
                description: input.description.clone(),
                content,
                version: 1,
                tags: input.tags.clone(),
            },
            path,
            manifest,
        })
    }

    /// Validate the stored `SKILL.md` before publishing.
    ///
    /// # Errors
    ///
    /// [`SkillError::ValidationFailed`] listing every error when the document
    /// is not valid. Warnings are returned, never raised.
    pub fn publish_check(&self, prefix: &str) -> Result<ValidationReport> {
        let file = self.read_file(prefix, SKILL_FILE)?;
        let text = file.content.as_text().ok_or_else(|| {
            SkillError::MalformedFrontMatter(format!("{SKILL_FILE} is not valid UTF-8"))
        })?;
        let report = document::validate(text);
        if !report.valid {
            return Err(SkillError::ValidationFailed(report.errors.join("; ")));
        }
        Ok(report)
    }

    /// Produce the next version from feedback. The current prefix is never
    /// modified; ancillary files are carried forward unchanged. The revised
    /// front-matter `version` is rewritten to the new prefix's version.
    pub fn iterate(
        &self,
        prefix: &str,
        feedback: &str,
        transformer: &dyn DocumentTransformer,
    ) -> Result<Iteration> {
        let current = StoragePath::parse(prefix)?;
        let package = load_package(self.store.as_ref(), &current.prefix())?;
        let previous_text = package.document.raw();

        let revised = transformer.revise(previous_text, feedback)?;
        let revised = revised.trim();
        if revised.is_empty() {
            return Err(SkillError::Transform("transformer returned empty text".to_string()));
        }
        let next = current.next_version();
        let revised = document::parse(&format!("{revised}\n"))
            .and_then(|doc| document::front_matter::with_version(doc.raw(), next.version))
            .map_err(|err| SkillError::Transform(format!("revised document does not parse: {err}")))?;
        let revised_doc = document::parse(&revised)?;
        let changelog = transformer.summarize(previous_text, &revised)?.trim().to_string();

        self.ensure_vacant(&next)?;

        let mut files = vec![skill_file(&revised)];
        files.extend(package.ancillary().cloned());
        let manifest = write_files(self.store.as_ref(), &next.prefix(), &files)?;

        let mut skill = ImportedSkill::from_document(&revised_doc);
        skill.slug.clone_from(&current.slug);

        info!(from = %current, to = %next, files = manifest.len(), "iterated skill");
        Ok(Iteration {
            previous: current,
            stored: StoredSkill {
                path: next,
                skill,
                manifest,
            },
            changelog,
        })
    }

    pub fn export_archive(&self, prefix: &str) -> Result<(Vec<u8>, PackageMetadata)> {
        PackageAssembler::new(Arc::clone(&self.store)).assemble(prefix)
    }

    /// Legacy JSON for the package at `prefix`. Binary ancillary files have
    /// no place in the format and are left out.
    pub fn export_legacy(&self, prefix: &str) -> Result<Vec<u8>> {
        let package = load_package(self.store.as_ref(), prefix)?;
        let mut assets = BTreeMap::new();
        for file in package.ancillary() {
            match file.content.as_text() {
                Some(text) => {
                    assets.insert(file.path.clone(), text.to_string());
                }
                None => debug!(path = %file.path, "skipping binary file in legacy export"),
            }
        }
        to_legacy_bundle(&package.document, &assets)
    }

    /// Import an archive: reconcile into a staging prefix, then move the
    /// files to the canonical prefix for the recovered slug and version.
    ///
    /// The move is a copy followed by a prefix delete. A crash in between
    /// leaves the staging prefix behind.
    pub fn import_archive(&self, bytes: &[u8], scope: &Scope) -> Result<StoredSkill> {
        let staging_slug = format!("{}-{}", self.packages.staging_prefix, Uuid::new_v4().simple());
        let staging = self.path_for(scope, &staging_slug, 1);

        let result = ImportReconciler::new(Arc::clone(&self.store)).reconcile(bytes, &staging.prefix())?;
        let canonical = self.path_for(scope, &result.skill.slug, result.skill.version);
        if canonical == staging {
            return Ok(StoredSkill {
                path: staging,
                skill: result.skill,
                manifest: result.manifest,
            });
        }

        if let Err(err) = self.ensure_vacant(&canonical) {
            self.store.delete_prefix(&staging.prefix())?;
            return Err(err);
        }

        let manifest = write_files(self.store.as_ref(), &canonical.prefix(), &result.files)
            .inspect_err(|_| {
                warn!(staging = %staging, canonical = %canonical, "re-home failed; staging prefix left in place");
            })?;
        let removed = self.store.delete_prefix(&staging.prefix())?;
        debug!(staging = %staging, removed, "cleared staging prefix");

        info!(prefix = %canonical, files = manifest.len(), "imported archive");
        Ok(StoredSkill {
            path: canonical,
            skill: result.skill,
            manifest,
        })
    }

    /// Import a legacy JSON bundle straight to its canonical prefix.
    pub fn import_legacy(&self, bytes: &[u8], scope: &Scope) -> Result<StoredSkill> {
        let result = from_legacy_bundle(bytes)?;
        let path = self.path_for(scope, &result.skill.slug, result.skill.version);
        self.ensure_vacant(&path)?;

        let manifest = write_files(self.store.as_ref(), &path.prefix(), &result.files)?;
        info!(prefix = %path, files = manifest.len(), "imported legacy bundle");
        Ok(StoredSkill {
            path,
            skill: result.skill,
            manifest,
        })
    }

    /// One stored file, classified by extension.
    pub fn read_file(&self, prefix: &str, path: &str) -> Result<FileEntry> {
        let key = self.key(prefix, path)?;
        if !self.store.exists(&key)? {
            return Err(SkillError::ObjectNotFound(key));
        }
        let bytes = self.store.get(&key)?;
        Ok(FileEntry::classified(normalize_relative_path(path)?, bytes))
    }

    pub fn signed_url(&self, prefix: &str, path: &str, ttl: Duration) -> Result<String> {
        let key = self.key(prefix, path)?;
        self.store.signed_url(&key, ttl)
    }

    /// Versions stored for a skill, ascending.
    pub fn versions(&self, scope: &Scope, slug: &str) -> Result<Vec<u32>> {
        let root = self.skill_root(scope, slug)?;
        let mut versions: Vec<u32> = self
            .store
            .list(&root)?
            .iter()
            .filter_map(|key| key.strip_prefix(root.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .filter_map(|segment| segment.strip_prefix('v'))
            .filter_map(|digits| digits.parse().ok())
            .collect();
        versions.sort_unstable();
        versions.dedup();
        Ok(versions)
    }

    /// Remove every version of a skill. Returns the number of objects removed.
    pub fn delete_skill(&self, scope: &Scope, slug: &str) -> Result<usize> {
        let root = self.skill_root(scope, slug)?;
        let removed = self.store.delete_prefix(&root)?;
        if removed == 0 {
            return Err(SkillError::ObjectNotFound(root));
        }
        info!(root = %root, removed, "deleted skill");
        Ok(removed)
    }

    fn skill_root(&self, scope: &Scope, slug: &str) -> Result<String> {
        if slug.is_empty() || slug.contains('/') {
            return Err(SkillError::InvalidPath(format!("{slug:?}: not a slug")));
        }
        normalize_prefix(&format!("{SKILLS_ROOT}/{}/{slug}/", scope.segment(&self.packages)))
    }

    fn key(&self, prefix: &str, path: &str) -> Result<String> {
        Ok(format!("{}{}", normalize_prefix(prefix)?, normalize_relative_path(path)?))
    }

    fn ensure_vacant(&self, path: &StoragePath) -> Result<()> {
        if self.store.list(&path.prefix())?.is_empty() {
            Ok(())
        } else {
            Err(SkillError::VersionExists(path.prefix()))
        }
    }
}

fn skill_file(content: &str) -> FileEntry {
    FileEntry::text(SKILL_FILE, content).with_content_type(content_type::MARKDOWN)
}
