//! Front-matter block: splitting, decoding and schema checks.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, SkillError};

/// Fence line that opens and closes the front-matter block.
pub const FENCE: &str = "---";

/// Validated SKILL.md front-matter.
///
/// Only obtainable through [`FrontMatter::new`] or [`FrontMatter::from_value`],
/// so a value of this type always satisfies the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    name: String,
    description: String,
    tags: Vec<String>,
    version: u32,
}

impl FrontMatter {
    /// Build front-matter from already-typed fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        version: u32,
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        if name.is_empty() {
            return Err(SkillError::schema("name", "must be a non-empty string"));
        }
        if description.is_empty() {
            return Err(SkillError::schema("description", "must be a non-empty string"));
        }
        if version == 0 {
            return Err(SkillError::schema("version", "must be a positive integer"));
        }
        Ok(Self {
            name,
            description,
            tags,
            version,
        })
    }

    /// Validate a decoded mapping. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let empty = Mapping::new();
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => &empty,
            other => {
                return Err(SkillError::MalformedFrontMatter(format!(
                    "expected a key/value mapping, found {}",
                    kind_of(other)
                )));
            }
        };

        let name = required_string(map, "name")?;
        let description = required_string(map, "description")?;
        let tags = match map.get("tags") {
            None => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        SkillError::schema("tags", "every tag must be a string")
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(SkillError::schema(
                    "tags",
                    format!("expected a list of strings, found {}", kind_of(other)),
                ));
            }
        };
        let version = match map.get("version") {
            None => 1,
            Some(value) => positive_int(value)
                .ok_or_else(|| SkillError::schema("version", "must be a positive integer"))?,
        };

        Self::new(name, description, tags, version)
    }

    /// Serialize back to YAML (no fences).
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }
}

/// Split raw document text into the front-matter YAML (if any) and the body.
///
/// Text that does not open with a `---` line has no front-matter and the
/// whole input is the body. An opening fence without a closing one is an
/// error.
pub fn split(raw: &str) -> Result<(Option<&str>, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some((first, rest)) = split_line(text) else {
        return Ok((None, text));
    };
    if first.trim_end() != FENCE {
        return Ok((None, text));
    }

    let mut offset = 0;
    let mut remaining = rest;
    while let Some((line, after)) = split_line(remaining) {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            return Ok((Some(yaml), after));
        }
        offset += remaining.len() - after.len();
        remaining = after;
    }

    Err(SkillError::MalformedFrontMatter(
        "front-matter block is missing its closing `---`".to_string(),
    ))
}

/// Rewrite the top-level `version:` line of the front-matter block to
/// `version`, appending one when the block has none. Everything else in
/// `raw`, including key order and comments, is left as written.
pub fn with_version(raw: &str, version: u32) -> Result<String> {
    let (Some(yaml), _) = split(raw)? else {
        return Err(SkillError::MalformedFrontMatter(
            "document has no front-matter block".to_string(),
        ));
    };
    // `yaml` borrows from `raw`, so its offset locates the block.
    let start = yaml.as_ptr() as usize - raw.as_ptr() as usize;
    let end = start + yaml.len();

    let line = format!("version: {version}");
    let mut replaced = false;
    let mut block = String::with_capacity(yaml.len() + line.len() + 1);
    for current in yaml.split_inclusive('\n') {
        let content = current.trim_end_matches(['\n', '\r']);
        if !replaced && is_version_key(content) {
            block.push_str(&line);
            block.push_str(&current[content.len()..]);
            replaced = true;
        } else {
            block.push_str(current);
        }
    }
    if !replaced {
        if !block.is_empty() && !block.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(&line);
        block.push('\n');
    }

    Ok(format!("{}{block}{}", &raw[..start], &raw[end..]))
}

fn is_version_key(line: &str) -> bool {
    line.strip_prefix("version")
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// Decode the YAML between the fences into a mapping value.
pub fn decode(yaml: &str) -> Result<Value> {
    if yaml.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(yaml).map_err(|err| SkillError::MalformedFrontMatter(err.to_string()))
}

/// Returns the first line (without its terminator) and the rest after it.
fn split_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(idx) => Some((&text[..idx], &text[idx + 1..])),
        None => Some((text, "")),
    }
}

fn required_string(map: &Mapping, field: &str) -> Result<String> {
    match map.get(field) {
        None => Err(SkillError::schema(field, "is required")),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(SkillError::schema(field, "must be a non-empty string")),
        Some(other) => Err(SkillError::schema(
            field,
            format!("expected a string, found {}", kind_of(other)),
        )),
    }
}

// Integral floats such as `2.0` are accepted, matching JSON producers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn positive_int(value: &Value) -> Option<u32> {
    let Value::Number(n) = value else {
        return None;
    };
    let raw = match n.as_u64() {
        Some(v) => v,
        None => {
            let f = n.as_f64()?;
            if f.fract() != 0.0 || f < 1.0 || f > f64::from(u32::MAX) {
                return None;
            }
            f as u64
        }
    };
    u32::try_from(raw).ok().filter(|v| *v > 0)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
