//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Document errors
//! - 2xx: Package and archive errors
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 7xx: Transform errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for JSON output.
///
/// Each variant maps to a numeric code (e.g., `FrontMatterMalformed` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Document errors (1xx)
    // ========================================
    /// E101: Front-matter block could not be decoded
    FrontMatterMalformed,
    /// E102: Front-matter decoded but a field is missing or mistyped
    SchemaViolation,

    // ========================================
    // Package and archive errors (2xx)
    // ========================================
    /// E201: Storage prefix holds no objects
    PackageEmpty,
    /// E202: File set has no top-level SKILL.md
    ManifestRootMissing,
    /// E203: Compressed stream or tar headers are unreadable
    ArchiveCorrupt,
    /// E204: An entry declares more bytes than the archive holds
    ArchiveTruncated,
    /// E205: Legacy JSON bundle is malformed
    BundleInvalid,
    /// E206: Target version prefix already holds files
    VersionExists,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Failed to read from the object store
    StorageReadError,
    /// E602: Failed to write to the object store
    StorageWriteError,
    /// E603: A multi-object write stopped part way
    StoragePartialWrite,
    /// E604: Object key does not exist
    ObjectNotFound,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Transform errors (7xx)
    // ========================================
    /// E701: The document transformer failed or returned unusable text
    TransformFailed,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Validation rules failed
    ValidationFailed,
    /// E802: Relative path or storage key is unsafe
    InvalidPath,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `PackageEmpty` -> 201).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::FrontMatterMalformed => 101,
            Self::SchemaViolation => 102,

            Self::PackageEmpty => 201,
            Self::ManifestRootMissing => 202,
            Self::ArchiveCorrupt => 203,
            Self::ArchiveTruncated => 204,
            Self::BundleInvalid => 205,
            Self::VersionExists => 206,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::StorageReadError => 601,
            Self::StorageWriteError => 602,
            Self::StoragePartialWrite => 603,
            Self::ObjectNotFound => 604,
            Self::SerializationError => 605,

            Self::TransformFailed => 701,

            Self::ValidationFailed => 801,
            Self::InvalidPath => 802,

            Self::InternalError => 901,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::FrontMatterMalformed => "Check the YAML between the leading `---` fences. Run `skillpack parse <file>` for details",
            Self::SchemaViolation => "Front-matter needs a non-empty `name` and `description`; `tags` must be a list and `version` a positive integer",

            Self::PackageEmpty => "No files were found under that prefix. Run `skillpack ls <prefix>` to inspect storage",
            Self::ManifestRootMissing => "Every package needs a top-level SKILL.md. Add one before packaging",
            Self::ArchiveCorrupt => "The archive is not a readable .tar.gz. Re-export it from the source environment",
            Self::ArchiveTruncated => "The archive ends early. The download or copy was probably interrupted",
            Self::BundleInvalid => "Legacy bundles need `metadata` and `content` fields. Check the JSON",
            Self::VersionExists => "Published versions are immutable. Iterate to a new version or remove the old one with `skillpack rm`",

            Self::ConfigInvalid => "Check TOML syntax in the config file and the SKILLPACK_* environment variables",
            Self::ConfigMissingRequired => "Set the missing value in config.toml or through its SKILLPACK_* variable",

            Self::StorageReadError => "Check that the storage root exists and is readable",
            Self::StorageWriteError => "Check disk space and write permissions on the storage root",
            Self::StoragePartialWrite => "Some files were written. Retry the remaining entries or remove the prefix with `skillpack rm`",
            Self::ObjectNotFound => "The key does not exist. Run `skillpack ls <prefix>` to list stored files",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            Self::TransformFailed => "The document transformer returned no usable SKILL.md. Retry or revise the feedback",

            Self::ValidationFailed => "Review the validation errors and fix each issue. Run `skillpack validate <file>` for details",
            Self::InvalidPath => "Use relative, forward-slash paths without `..` segments or a leading `/`",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::FrontMatterMalformed
            | Self::SchemaViolation
            | Self::PackageEmpty
            | Self::ManifestRootMissing
            | Self::ArchiveTruncated
            | Self::BundleInvalid
            | Self::VersionExists
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::StorageReadError
            | Self::StorageWriteError
            | Self::StoragePartialWrite
            | Self::ObjectNotFound
            | Self::TransformFailed
            | Self::ValidationFailed
            | Self::InvalidPath
            | Self::IoError => true,

            Self::ArchiveCorrupt | Self::SerializationError | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "document",
            2 => "package",
            3 => "config",
            6 => "storage",
            7 => "transform",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::FrontMatterMalformed,
            Self::SchemaViolation,
            Self::PackageEmpty,
            Self::ManifestRootMissing,
            Self::ArchiveCorrupt,
            Self::ArchiveTruncated,
            Self::BundleInvalid,
            Self::VersionExists,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::StorageReadError,
            Self::StorageWriteError,
            Self::StoragePartialWrite,
            Self::ObjectNotFound,
            Self::SerializationError,
            Self::TransformFailed,
            Self::ValidationFailed,
            Self::InvalidPath,
            Self::InternalError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
