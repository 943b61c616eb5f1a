//! Legacy single-JSON bundle format.
//!
//! `{metadata, content, assets, version, exportedAt}`. New packages are never
//! stored this way; it is only produced on export and accepted on import.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::archive::{FileEntry, content_type};
use crate::document::{FrontMatter, ParsedDocument, SKILL_FILE};
use crate::error::{Result, SkillError};

use super::paths::slugify;
use super::reconcile::{ImportResult, ImportedSkill};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBundle<'a> {
    metadata: &'a FrontMatter,
    content: &'a str,
    assets: &'a BTreeMap<String, String>,
    version: u32,
    exported_at: String,
}

/// Serialize a document plus text assets as pretty-printed bundle JSON.
pub fn to_legacy_bundle(doc: &ParsedDocument, assets: &BTreeMap<String, String>) -> Result<Vec<u8>> {
    let bundle = LegacyBundle {
        metadata: &doc.front_matter,
        content: doc.raw(),
        assets,
        version: doc.front_matter.version(),
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_vec_pretty(&bundle)?)
}

/// Decode bundle JSON into an import result with `SKILL.md` first.
///
/// The skill record comes from `metadata`; `content` is carried verbatim.
/// Assets get no content type. The manifest is empty since nothing is
/// written here.
///
/// # Errors
///
/// [`SkillError::InvalidBundle`] for undecodable JSON or a missing
/// `metadata`/`content`, [`SkillError::SchemaViolation`] for bad metadata.
pub fn from_legacy_bundle(bytes: &[u8]) -> Result<ImportResult> {
    let raw: Value = serde_json::from_slice(bytes)
        .map_err(|err| SkillError::InvalidBundle(format!("JSON decode failed: {err}")))?;
    let Value::Object(bundle) = raw else {
        return Err(SkillError::InvalidBundle("bundle must be a JSON object".to_string()));
    };

    let metadata = match bundle.get("metadata") {
        Some(value @ Value::Object(_)) => value,
        Some(_) => return Err(SkillError::InvalidBundle("metadata must be an object".to_string())),
        None => return Err(SkillError::InvalidBundle("missing metadata".to_string())),
    };
    let front_matter = FrontMatter::from_value(&serde_yaml::to_value(metadata)?)?;

    let content = match bundle.get("content") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => return Err(SkillError::InvalidBundle("missing content".to_string())),
    };

    // Asset files follow the bundle's key order.
    let mut files = vec![FileEntry::text(SKILL_FILE, content.clone()).with_content_type(content_type::MARKDOWN)];
    match bundle.get("assets") {
        None | Some(Value::Null) => {}
        Some(Value::Object(assets)) => {
            for (path, text) in assets {
                let Value::String(text) = text else {
                    return Err(SkillError::InvalidBundle(format!(
                        "asset {path} must be text"
                    )));
                };
                files.push(FileEntry::text(path.clone(), text.clone()));
            }
        }
        Some(_) => {
            return Err(SkillError::InvalidBundle("assets must map paths to text".to_string()));
        }
    }

    Ok(ImportResult {
        skill: ImportedSkill {
            name: front_matter.name().to_string(),
            slug: slugify(front_matter.name()),
            description: front_matter.description().to_string(),
            content,
            version: front_matter.version(),
            tags: front_matter.tags().to_vec(),
        },
        files,
        manifest: Vec::new(),
    })
}
