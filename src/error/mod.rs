//! Error handling for skillpack.
//!
//! This module provides:
//! - [`SkillError`]: The main error enum for all package operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error with suggestion and context

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::package::ManifestEntry;

pub use codes::ErrorCode;

/// Main error type for skillpack operations.
#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Malformed front-matter: {0}")]
    MalformedFrontMatter(String),

    #[error("Front-matter field `{field}` is invalid: {reason}")]
    SchemaViolation { field: String, reason: String },

    #[error("No files found under storage prefix {0}")]
    EmptyPackage(String),

    #[error("Package has no top-level SKILL.md: {0}")]
    MissingManifestRoot(String),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("Archive entry {path} is truncated: declared {declared} bytes, found {actual}")]
    TruncatedEntry {
        path: String,
        declared: u64,
        actual: u64,
    },

    #[error("Invalid legacy bundle: {0}")]
    InvalidBundle(String),

    #[error("Version already exists at {0}")]
    VersionExists(String),

    #[error("Storage {op} failed for {key}: {reason}")]
    Storage {
        op: &'static str,
        key: String,
        reason: String,
    },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Write stopped after {} of the entries: {source}", .written.len())]
    PartialWrite {
        written: Vec<ManifestEntry>,
        #[source]
        source: Box<SkillError>,
    },

    #[error("Skill validation failed: {0}")]
    ValidationFailed(String),

    #[error("Document transform failed: {0}")]
    Transform(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SkillError {
    /// Build a [`SkillError::SchemaViolation`] for a named field.
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`SkillError::Storage`] failure.
    pub fn storage(op: &'static str, key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Storage {
            op,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedFrontMatter(_) => ErrorCode::FrontMatterMalformed,
            Self::SchemaViolation { .. } => ErrorCode::SchemaViolation,
            Self::EmptyPackage(_) => ErrorCode::PackageEmpty,
            Self::MissingManifestRoot(_) => ErrorCode::ManifestRootMissing,
            Self::CorruptArchive(_) => ErrorCode::ArchiveCorrupt,
            Self::TruncatedEntry { .. } => ErrorCode::ArchiveTruncated,
            Self::InvalidBundle(_) => ErrorCode::BundleInvalid,
            Self::VersionExists(_) => ErrorCode::VersionExists,
            Self::Storage { op, .. } => match *op {
                "get" | "list" | "exists" => ErrorCode::StorageReadError,
                _ => ErrorCode::StorageWriteError,
            },
            Self::ObjectNotFound(_) => ErrorCode::ObjectNotFound,
            Self::InvalidPath(_) => ErrorCode::InvalidPath,
            Self::PartialWrite { .. } => ErrorCode::StoragePartialWrite,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::Transform(_) => ErrorCode::TransformFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SchemaViolation { field, .. } => Some(serde_json::json!({ "field": field })),
            Self::EmptyPackage(prefix)
            | Self::MissingManifestRoot(prefix)
            | Self::VersionExists(prefix) => {
                Some(serde_json::json!({ "prefix": prefix }))
            }
            Self::TruncatedEntry {
                path,
                declared,
                actual,
            } => Some(serde_json::json!({
                "path": path,
                "declared": declared,
                "actual": actual,
            })),
            Self::Storage { op, key, .. } => Some(serde_json::json!({ "op": op, "key": key })),
            Self::ObjectNotFound(key) => Some(serde_json::json!({ "key": key })),
            Self::PartialWrite { written, .. } => {
                let keys: Vec<&str> = written.iter().map(|e| e.storage_key.as_str()).collect();
                Some(serde_json::json!({ "written": keys }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_skill_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "MANIFEST_ROOT_MISSING")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 202)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "document", "storage")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`SkillError`].
    #[must_use]
    pub fn from_skill_error(err: &SkillError) -> Self {
        let code = err.code();
        let context = err.context();
        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion: suggest_for_error(code, context.as_ref()),
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error, regenerating the suggestion.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.suggestion = suggest_for_error(self.code, Some(&context));
        self.context = Some(context);
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<SkillError> for StructuredError {
    fn from(err: SkillError) -> Self {
        Self::from_skill_error(&err)
    }
}

impl From<&SkillError> for StructuredError {
    fn from(err: &SkillError) -> Self {
        Self::from_skill_error(err)
    }
}

/// Context-aware suggestion; falls back to the code's default.
#[must_use]
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    let ctx_str = |key: &str| {
        context
            .and_then(|c| c.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    match code {
        ErrorCode::SchemaViolation => ctx_str("field").map_or_else(
            || code.suggestion().to_string(),
            |field| format!("Fix the `{field}` field in the front-matter block"),
        ),
        ErrorCode::PackageEmpty | ErrorCode::ManifestRootMissing => ctx_str("prefix").map_or_else(
            || code.suggestion().to_string(),
            |prefix| format!("Run `skillpack ls {prefix}` and make sure SKILL.md is stored there"),
        ),
        ErrorCode::ObjectNotFound => ctx_str("key").map_or_else(
            || code.suggestion().to_string(),
            |key| format!("`{key}` does not exist. Run `skillpack ls` on its prefix"),
        ),
        _ => code.suggestion().to_string(),
    }
}

/// Result type alias using [`SkillError`].
pub type Result<T> = std::result::Result<T, SkillError>;
