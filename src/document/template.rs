//! Canonical SKILL.md template for newly created skills.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::front_matter::{FENCE, FrontMatter};
use super::sections::SectionKey;
use crate::error::Result;

/// Inputs for a brand-new skill document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSkillInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

fn placeholder(key: SectionKey) -> &'static str {
    match key {
        SectionKey::Purpose => "Describe the purpose of this skill.",
        SectionKey::WhenToUse => "Describe when to trigger this skill.",
        SectionKey::Instructions => "Add step-by-step instructions here.",
        SectionKey::Examples => "Add input/output examples here.",
        SectionKey::References => "Add reference links here.",
    }
}

/// Render a version-1 document with all five recognized sections.
///
/// # Errors
///
/// Returns a schema violation when `name` or `description` is empty.
pub fn render_document(input: &CreateSkillInput) -> Result<String> {
    let front_matter = FrontMatter::new(
        input.name.clone(),
        input.description.clone(),
        input.tags.clone(),
        1,
    )?;
    let yaml = front_matter.to_yaml()?;

    let mut out = String::with_capacity(512);
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&yaml);
    out.push_str(FENCE);
    out.push_str("\n\n");
    let _ = writeln!(out, "# {}\n", input.name);

    for key in SectionKey::ALL {
        let prose = match key {
            SectionKey::Purpose => input.purpose.as_deref(),
            SectionKey::Instructions => input.instructions.as_deref(),
            _ => None,
        }
        .unwrap_or_else(|| placeholder(key));
        let _ = writeln!(out, "## {}\n{}\n", key.title(), prose.trim());
    }

    Ok(out.trim_end().to_string() + "\n")
}
