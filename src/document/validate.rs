//! Structural validation of SKILL.md documents.

use serde::{Deserialize, Serialize};

use super::{ParsedDocument, SectionKey, parse};

/// Instructions shorter than this (in characters) draw a warning.
pub const MIN_INSTRUCTIONS_LEN: usize = 50;

/// Outcome of [`validate`]. Warnings never affect `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_lists(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate raw document text.
///
/// A parse failure yields exactly one error and no warnings. Otherwise the
/// checks run in a fixed order so identical input gives identical lists.
#[must_use]
pub fn validate(raw: &str) -> ValidationReport {
    match parse(raw) {
        Ok(doc) => validate_parsed(&doc),
        Err(err) => ValidationReport::from_lists(vec![format!("Failed to parse skill: {err}")], Vec::new()),
    }
}

/// Run the section and quality checks on an already-parsed document.
#[must_use]
pub fn validate_parsed(doc: &ParsedDocument) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let sections = &doc.sections;

    if !sections.has(SectionKey::Purpose) {
        errors.push("Skill must have a '## Purpose' section".to_string());
    }
    if !sections.has(SectionKey::Instructions) {
        errors.push("Skill must have an '## Instructions' section".to_string());
    }

    if !sections.has(SectionKey::WhenToUse) {
        warnings.push("Consider adding a '## When to Use' section".to_string());
    }
    if !sections.has(SectionKey::Examples) {
        warnings.push("Consider adding an '## Examples' section".to_string());
    }
    if let Some(instructions) = sections.get(SectionKey::Instructions) {
        let len = instructions.chars().count();
        if len > 0 && len < MIN_INSTRUCTIONS_LEN {
            warnings.push(format!(
                "Instructions section is shorter than {MIN_INSTRUCTIONS_LEN} characters; consider adding more detail"
            ));
        }
    }
    if doc.front_matter.tags().is_empty() {
        warnings.push("Consider adding tags for discoverability".to_string());
    }

    ValidationReport::from_lists(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str =
        "---\nname: Demo\ndescription: d\nversion: 1\n---\n\n## Purpose\nP\n\n## Instructions\nDo X.";

    #[test]
    fn demo_is_valid_with_quality_warnings() {
        let report = validate(DEMO);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                "Consider adding a '## When to Use' section".to_string(),
                "Consider adding an '## Examples' section".to_string(),
                format!(
                    "Instructions section is shorter than {MIN_INSTRUCTIONS_LEN} characters; consider adding more detail"
                ),
                "Consider adding tags for discoverability".to_string(),
            ]
        );
    }

    #[test]
    fn missing_instructions_is_an_error() {
        let report = validate("---\nname: a\ndescription: d\ntags: [x]\n---\n## Purpose\nP\n");
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Skill must have an '## Instructions' section"]);
    }

    #[test]
    fn empty_required_section_counts_as_missing() {
        let report = validate("---\nname: a\ndescription: d\n---\n## Purpose\n\n## Instructions\nx");
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Skill must have a '## Purpose' section"]);
    }

    #[test]
    fn parse_failure_short_circuits() {
        let report = validate("---\nname: [broken\n---\n## Purpose\nP");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Failed to parse skill:"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn complete_document_has_no_warnings() {
        let instructions = "Step one: read the input. Step two: transform it carefully.";
        let doc = format!(
            "---\nname: a\ndescription: d\ntags: [t]\n---\n## Purpose\nP\n## When to Use\nW\n## Instructions\n{instructions}\n## Examples\nE\n"
        );
        let report = validate(&doc);
        assert!(report.valid);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn output_is_deterministic() {
        let doc = "---\nname: a\ndescription: d\n---\nno sections";
        assert_eq!(validate(doc), validate(doc));
    }
}
