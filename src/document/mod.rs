//! SKILL.md document model.
//!
//! A document is a front-matter block fenced by `---` lines followed by a
//! markdown body. Parsing never caches: a [`ParsedDocument`] is recomputed
//! from the raw text every time.

pub mod front_matter;
pub mod sections;
pub mod template;
pub mod validate;

use serde::Serialize;

use crate::error::Result;

pub use front_matter::FrontMatter;
pub use sections::{SectionKey, SectionMap};
pub use template::{CreateSkillInput, render_document};
pub use validate::{MIN_INSTRUCTIONS_LEN, ValidationReport, validate, validate_parsed};

/// File name of the document inside every package.
pub const SKILL_FILE: &str = "SKILL.md";

/// Front-matter plus recognized sections, derived from raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    /// Markdown after the closing fence.
    pub body: String,
    pub sections: SectionMap,
    #[serde(skip)]
    raw: String,
}

impl ParsedDocument {
    /// The full text this document was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn section(&self, key: SectionKey) -> Option<&str> {
        self.sections.get(key)
    }
}

/// Parse raw SKILL.md text.
///
/// # Errors
///
/// [`SkillError::MalformedFrontMatter`](crate::SkillError::MalformedFrontMatter)
/// when the block cannot be decoded and
/// [`SkillError::SchemaViolation`](crate::SkillError::SchemaViolation) when a
/// required field is absent or mistyped. Missing sections are not errors.
pub fn parse(raw: &str) -> Result<ParsedDocument> {
    let (yaml, body) = front_matter::split(raw)?;
    let value = match yaml {
        Some(yaml) => front_matter::decode(yaml)?,
        None => serde_yaml::Value::Null,
    };
    let front_matter = FrontMatter::from_value(&value)?;
    let sections = sections::extract(body);

    Ok(ParsedDocument {
        front_matter,
        body: body.to_string(),
        sections,
        raw: raw.to_string(),
    })
}
