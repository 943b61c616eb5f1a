//! Storage path derivation: `skills/<scope>/<slug>/v<version>/`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PackagesConfig;
use crate::error::{Result, SkillError};
use crate::storage::validate_prefix;

/// First segment of every package key.
pub const SKILLS_ROOT: &str = "skills";

/// Slug used when a name has no ASCII alphanumerics at all.
pub const FALLBACK_SLUG: &str = "skill";

/// Owner of a skill: a team, or the caller personally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Scope {
    Team(String),
    Personal,
}

impl Scope {
    /// `None` means personal.
    pub fn from_team(team: Option<impl Into<String>>) -> Self {
        team.map_or(Self::Personal, |id| Self::Team(id.into()))
    }

    /// Path segment for this scope.
    #[must_use]
    pub fn segment<'a>(&'a self, packages: &'a PackagesConfig) -> &'a str {
        match self {
            Self::Team(id) => id,
            Self::Personal => &packages.personal_scope,
        }
    }
}

/// Location of one package version in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoragePath {
    pub scope: String,
    pub slug: String,
    pub version: u32,
}

impl StoragePath {
    pub fn new(scope: impl Into<String>, slug: impl Into<String>, version: u32) -> Self {
        Self {
            scope: scope.into(),
            slug: slug.into(),
            version,
        }
    }

    #[must_use]
    pub fn for_scope(scope: &Scope, packages: &PackagesConfig, slug: &str, version: u32) -> Self {
        Self::new(scope.segment(packages), slug, version)
    }

    /// Parse `skills/<scope>/<slug>/v<version>/`; the trailing slash is optional.
    pub fn parse(prefix: &str) -> Result<Self> {
        let invalid = |reason: &str| SkillError::InvalidPath(format!("{prefix}: {reason}"));
        let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
        let parts: Vec<&str> = trimmed.split('/').collect();
        let [root, scope, slug, version] = parts.as_slice() else {
            return Err(invalid("expected skills/<scope>/<slug>/v<version>/"));
        };
        if *root != SKILLS_ROOT {
            return Err(invalid("must start with skills/"));
        }
        if scope.is_empty() || slug.is_empty() {
            return Err(invalid("empty scope or slug"));
        }
        let version = version
            .strip_prefix('v')
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| invalid("version segment must be v<positive integer>"))?;
        let path = Self::new(*scope, *slug, version);
        validate_prefix(&path.prefix())?;
        Ok(path)
    }

    /// Full prefix with trailing slash.
    #[must_use]
    pub fn prefix(&self) -> String {
        self.to_string()
    }

    /// Prefix covering every version of this skill.
    #[must_use]
    pub fn skill_root(&self) -> String {
        format!("{SKILLS_ROOT}/{}/{}/", self.scope, self.slug)
    }

    #[must_use]
    pub fn next_version(&self) -> Self {
        Self::new(self.scope.clone(), self.slug.clone(), self.version + 1)
    }

    /// Storage key of a package-relative path.
    #[must_use]
    pub fn key(&self, path: &str) -> String {
        format!("{self}{path}")
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SKILLS_ROOT}/{}/{}/v{}/", self.scope, self.slug, self.version)
    }
}

/// Validate a caller-supplied prefix and make sure it ends with `/`.
pub fn normalize_prefix(prefix: &str) -> Result<String> {
    if prefix.is_empty() || prefix == "/" {
        return Err(SkillError::InvalidPath("empty storage prefix".to_string()));
    }
    validate_prefix(prefix)?;
    if prefix.ends_with('/') {
        Ok(prefix.to_string())
    } else {
        Ok(format!("{prefix}/"))
    }
}

/// URL-safe identifier: lowercase ASCII alphanumerics joined by single hyphens.
#[must_use]
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_dash = false;

    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }

    let slug = out.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
