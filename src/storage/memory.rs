//! In-process object store backed by a sorted map.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::trace;

use super::{ObjectStore, UrlSigner, validate_key, validate_prefix};
use crate::error::{Result, SkillError};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

#[derive(Debug)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    signer: UrlSigner,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_signer(UrlSigner::new("memory://skillpack", "memory"))
    }

    #[must_use]
    pub fn with_signer(signer: UrlSigner) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            signer,
        }
    }

    /// Content type recorded by the last `put` of `key`.
    #[must_use]
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .get(key)
            .and_then(|object| object.content_type.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()> {
        validate_key(key)?;
        trace!(key, size = bytes.len(), "memory put");
        self.objects.write().insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;
        self.objects
            .read()
            .get(key)
            .map(|object| object.bytes.clone())
            .ok_or_else(|| SkillError::ObjectNotFound(key.to_string()))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        validate_prefix(prefix)?;
        Ok(self
            .objects
            .read()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.objects.write().remove(key);
        Ok(())
    }

    fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        validate_prefix(prefix)?;
        let mut objects = self.objects.write();
        let before = objects.len();
        objects.retain(|key, _| !key.starts_with(prefix));
        Ok(before - objects.len())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.objects.read().contains_key(key))
    }

    fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        if !self.exists(key)? {
            return Err(SkillError::ObjectNotFound(key.to_string()));
        }
        Ok(self.signer.sign(key, ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_list_delete() {
        let store = MemoryStore::new();
        store.put("p/v1/b.md", b"b", Some("text/markdown")).unwrap();
        store.put("p/v1/a.md", b"a", None).unwrap();
        store.put("p/v10/a.md", b"x", None).unwrap();

        assert_eq!(store.get("p/v1/a.md").unwrap(), b"a");
        assert_eq!(store.list("p/v1/").unwrap(), vec!["p/v1/a.md", "p/v1/b.md"]);
        assert_eq!(store.content_type("p/v1/b.md").as_deref(), Some("text/markdown"));

        store.delete("p/v1/a.md").unwrap();
        store.delete("p/v1/a.md").unwrap();
        assert!(!store.exists("p/v1/a.md").unwrap());
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get("nope"), Err(SkillError::ObjectNotFound(_))));
        assert!(matches!(
            store.signed_url("nope", Duration::from_secs(60)),
            Err(SkillError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn delete_prefix_leaves_siblings() {
        let store = MemoryStore::new();
        store.put("s/a/v1/SKILL.md", b"1", None).unwrap();
        store.put("s/a/v1/x.py", b"2", None).unwrap();
        store.put("s/a/v2/SKILL.md", b"3", None).unwrap();
        assert_eq!(store.delete_prefix("s/a/v1/").unwrap(), 2);
        assert_eq!(store.list("").unwrap(), vec!["s/a/v2/SKILL.md"]);
    }

    #[test]
    fn signed_url_uses_signer() {
        let store = MemoryStore::new();
        store.put("k/a.md", b"a", None).unwrap();
        let url = store.signed_url("k/a.md", Duration::from_secs(60)).unwrap();
        assert!(url.starts_with("memory://skillpack/k/a.md?expires="));
    }
}
