//! Object-store capability and its in-tree backends.
//!
//! Components receive an `Arc<dyn ObjectStore>` at construction time. Keys
//! are forward-slash strings such as `skills/_personal/demo/v1/SKILL.md`;
//! prefixes are the same with a trailing slash.

pub mod fs;
pub mod memory;
pub mod signer;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Result, SkillError};

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use signer::UrlSigner;

/// Key/value object storage addressed by string keys.
///
/// Implementations never retry. `list` returns full keys in ascending
/// lexicographic order.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()>;

    /// Fails with [`SkillError::ObjectNotFound`] for an absent key.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Remove every key under `prefix`, returning how many were removed.
    fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        let keys = self.list(prefix)?;
        for key in &keys {
            self.delete(key)?;
        }
        Ok(keys.len())
    }

    fn exists(&self, key: &str) -> Result<bool>;

    /// Time-limited URL for reading `key`.
    fn signed_url(&self, key: &str, ttl: Duration) -> Result<String>;
}

/// Open the backend named by the storage config.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    let signer = UrlSigner::from_config(config);
    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Fs => Arc::new(FsStore::open(&config.root, signer)?),
        StorageBackend::Memory => Arc::new(MemoryStore::with_signer(signer)),
    };
    Ok(store)
}

/// Check that `key` names a single object.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SkillError::InvalidPath("empty storage key".to_string()));
    }
    if key.ends_with('/') {
        return Err(SkillError::InvalidPath(format!("{key}: key must not end with '/'")));
    }
    validate_prefix(key)
}

/// Check a listing prefix. The empty prefix is allowed.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.starts_with('/') {
        return Err(SkillError::InvalidPath(format!("{prefix}: leading '/'")));
    }
    if prefix.contains('\\') || prefix.contains('\0') {
        return Err(SkillError::InvalidPath(format!(
            "{}: contains a backslash or NUL byte",
            prefix.escape_default()
        )));
    }
    let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
    if !trimmed.is_empty()
        && trimmed
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(SkillError::InvalidPath(format!(
            "{prefix}: empty, '.' or '..' segment"
        )));
    }
    Ok(())
}
