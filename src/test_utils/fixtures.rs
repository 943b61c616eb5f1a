use std::path::PathBuf;

use tempfile::TempDir;

use crate::document::CreateSkillInput;

/// Minimal valid document: required sections only, no tags.
pub const DEMO_SKILL: &str =
    "---\nname: Demo\ndescription: d\nversion: 1\n---\n\n## Purpose\nP\n\n## Instructions\nDo X.";

/// Document that passes validation without warnings.
pub const COMPLETE_SKILL: &str = "---
name: Changelog Writer
description: Summarize merged pull requests into release notes
tags: [docs, release]
version: 2
---

# Changelog Writer

## Purpose
Turn a list of merged changes into readable release notes.

## When to Use
Before tagging a release.

## Instructions
Group changes by area, lead with user-facing fixes, and keep each line under one sentence.

## Examples
Input: three merged PRs. Output: a short Fixes and Features list.

## References
CONTRIBUTING.md
";

#[must_use]
pub fn demo_input() -> CreateSkillInput {
    CreateSkillInput {
        name: "Demo".to_string(),
        description: "d".to_string(),
        ..CreateSkillInput::default()
    }
}

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    /// # Panics
    ///
    /// When the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {}", data_path.display());

        Self { temp_dir, data_path }
    }

    /// Create a test file with content.
    ///
    /// # Panics
    ///
    /// When the file cannot be written.
    pub fn create_file(&self, relative_path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content.as_ref()).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {} ({} bytes)",
            full_path.display(),
            content.as_ref().len()
        );
        full_path
    }

    /// Create a package directory holding `SKILL.md` plus `scripts/run.py`.
    pub fn create_package_dir(&self, name: &str, skill: &str) -> PathBuf {
        self.create_file(&format!("{name}/SKILL.md"), skill);
        self.create_file(&format!("{name}/scripts/run.py"), "print('hi')\n");
        self.data_path.join(name)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {}", self.data_path.display());
    }
}
