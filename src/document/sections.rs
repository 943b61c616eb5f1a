//! Named `## Title` sections of a SKILL.md body.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").expect("valid header regex"));

/// Recognized section keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Purpose,
    WhenToUse,
    Instructions,
    Examples,
    References,
}

impl SectionKey {
    pub const ALL: [Self; 5] = [
        Self::Purpose,
        Self::WhenToUse,
        Self::Instructions,
        Self::Examples,
        Self::References,
    ];

    /// Canonical header title as written in a document.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Purpose => "Purpose",
            Self::WhenToUse => "When to Use",
            Self::Instructions => "Instructions",
            Self::Examples => "Examples",
            Self::References => "References",
        }
    }

    /// Lowercase map key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Purpose => "purpose",
            Self::WhenToUse => "whentouse",
            Self::Instructions => "instructions",
            Self::Examples => "examples",
            Self::References => "references",
        }
    }

    /// Exact, case-insensitive title match. "References & Links" is not
    /// `References`, and neither is "References " with a trailing space.
    /// Only a CRLF line's `\r` is dropped.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let lowered = title.strip_suffix('\r').unwrap_or(title).to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.title().to_lowercase() == lowered)
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Recognized sections of one document, keyed by [`SectionKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionMap(BTreeMap<SectionKey, String>);

impl SectionMap {
    #[must_use]
    pub fn get(&self, key: SectionKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Present and non-empty after trimming.
    #[must_use]
    pub fn has(&self, key: SectionKey) -> bool {
        self.get(key).is_some_and(|s| !s.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Extract recognized sections from a markdown body in one pass.
///
/// Each `## ` header opens a section that runs to the next `## ` header or
/// the end of the text. Deeper headers stay inside the section content.
/// Unrecognized titles are dropped; a repeated title keeps the later block.
#[must_use]
pub fn extract(body: &str) -> SectionMap {
    let headers: Vec<(usize, usize, &str)> = HEADER_REGEX
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?;
            Some((whole.start(), whole.end(), title.as_str()))
        })
        .collect();

    let mut map = BTreeMap::new();
    for (idx, (_, content_start, title)) in headers.iter().enumerate() {
        let content_end = headers.get(idx + 1).map_or(body.len(), |next| next.0);
        if let Some(key) = SectionKey::from_title(title) {
            map.insert(key, body[*content_start..content_end].trim().to_string());
        }
    }
    SectionMap(map)
}
