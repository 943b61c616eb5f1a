use proptest::prelude::*;

use skillpack::document::validate;
use skillpack::package::slugify;

fn document(name: &str, purpose: &str, instructions: Option<&str>) -> String {
    let mut doc = format!("---\nname: \"{name}\"\ndescription: d\n---\n\n## Purpose\n{purpose}\n");
    if let Some(text) = instructions {
        doc.push_str(&format!("\n## Instructions\n{text}\n"));
    }
    doc
}

proptest! {
    #[test]
    fn slugify_is_idempotent(input in ".{0,64}") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once.clone());
    }

    #[test]
    fn slugify_output_shape(input in ".{0,64}") {
        let slug = slugify(&input);
        prop_assert!(!slug.is_empty());
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn documents_with_required_sections_are_valid(
        name in "[A-Za-z][A-Za-z0-9 ]{0,20}",
        purpose in "[A-Za-z][A-Za-z0-9 .]{0,80}",
        instructions in "[A-Za-z][A-Za-z0-9 .]{0,120}",
    ) {
        let report = validate(&document(&name, &purpose, Some(&instructions)));
        prop_assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn documents_without_instructions_are_invalid(
        name in "[A-Za-z][A-Za-z0-9 ]{0,20}",
        purpose in "[A-Za-z][A-Za-z0-9 .]{0,80}",
    ) {
        let report = validate(&document(&name, &purpose, None));
        prop_assert!(!report.valid);
        prop_assert!(!report.errors.is_empty());
    }
}
