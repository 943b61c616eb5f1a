//! File entries: one relative path plus its content.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::content_type;
use crate::error::{Result, SkillError};

/// Content of one file: UTF-8 text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "data")]
pub enum FileContent {
    #[serde(rename = "utf8")]
    Text(String),
    #[serde(rename = "base64", serialize_with = "to_base64", deserialize_with = "from_base64")]
    Bytes(Vec<u8>),
}

impl FileContent {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn to_base64<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn from_base64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD.decode(encoded).map_err(serde::de::Error::custom)
}

/// One file of a package's file set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Relative, forward-slash path with no leading slash.
    pub path: String,
    pub content: FileContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileEntry {
    pub fn text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Text(text.into()),
            content_type: None,
        }
    }

    pub fn bytes(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Bytes(bytes.into()),
            content_type: None,
        }
    }

    /// Classify raw bytes by extension; textual types that decode as UTF-8
    /// become text, everything else stays bytes.
    pub fn classified(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let path = path.into();
        let content_type = content_type::infer(&path);
        let content = if content_type::is_textual(content_type) {
            match String::from_utf8(bytes) {
                Ok(text) => FileContent::Text(text),
                Err(err) => FileContent::Bytes(err.into_bytes()),
            }
        } else {
            FileContent::Bytes(bytes)
        };
        Self {
            path,
            content,
            content_type: Some(content_type.to_string()),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Declared content type, else the one inferred from the extension.
    #[must_use]
    pub fn resolved_content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| content_type::infer(&self.path).to_string())
    }

    /// Same path and byte-identical content; content type is not compared.
    #[must_use]
    pub fn same_file(&self, other: &Self) -> bool {
        self.path == other.path && self.content.as_bytes() == other.content.as_bytes()
    }
}

/// Normalize a package-relative path.
///
/// Strips `./` and empty segments. Rejects absolute paths, backslashes,
/// NUL bytes and `..` segments.
pub fn normalize_relative_path(path: &str) -> Result<String> {
    if path.starts_with('/') {
        return Err(SkillError::InvalidPath(format!("{path}: must be relative")));
    }
    if path.contains('\\') || path.contains('\0') {
        return Err(SkillError::InvalidPath(format!(
            "{}: contains a backslash or NUL byte",
            path.escape_default()
        )));
    }
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(SkillError::InvalidPath(format!(
                    "{path}: parent directory segments are not allowed"
                )));
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return Err(SkillError::InvalidPath(format!("{path:?}: empty path")));
    }
    Ok(segments.join("/"))
}
