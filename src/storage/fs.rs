//! Filesystem object store.
//!
//! Objects live at `<root>/objects/<key>`. Writes go through a temp file in
//! `<root>/tmp` and are renamed into place. Content types are not persisted;
//! readers re-infer them from the extension.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::trace;
use walkdir::WalkDir;

use super::{ObjectStore, UrlSigner, validate_key, validate_prefix};
use crate::error::{Result, SkillError};

const OBJECTS_DIR: &str = "objects";
const TMP_DIR: &str = "tmp";

#[derive(Debug)]
pub struct FsStore {
    objects: PathBuf,
    tmp: PathBuf,
    signer: UrlSigner,
}

impl FsStore {
    pub fn open(root: impl AsRef<Path>, signer: UrlSigner) -> Result<Self> {
        let root = root.as_ref();
        let objects = root.join(OBJECTS_DIR);
        let tmp = root.join(TMP_DIR);
        for dir in [&objects, &tmp] {
            fs::create_dir_all(dir).map_err(|err| {
                SkillError::Config(format!("create object store {}: {err}", dir.display()))
            })?;
        }
        Ok(Self {
            objects,
            tmp,
            signer,
        })
    }

    #[must_use]
    pub fn objects_dir(&self) -> &Path {
        &self.objects
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(key
            .split('/')
            .fold(self.objects.clone(), |path, segment| path.join(segment)))
    }

    /// Deepest directory that can hold keys under `prefix`: everything up to
    /// its last `/`.
    fn walk_root(&self, prefix: &str) -> PathBuf {
        let dir = prefix.rsplit_once('/').map_or("", |(dir, _)| dir);
        dir.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.objects.clone(), |path, segment| path.join(segment))
    }

    /// Remove now-empty directories between `path` and the objects root.
    fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.objects || fs::remove_dir(dir).is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}

impl ObjectStore for FsStore {
    fn put(&self, key: &str, bytes: &[u8], _content_type: Option<&str>) -> Result<()> {
        let path = self.object_path(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| SkillError::InvalidPath(key.to_string()))?;
        fs::create_dir_all(parent).map_err(|err| SkillError::storage("put", key, err))?;

        let mut tmp =
            NamedTempFile::new_in(&self.tmp).map_err(|err| SkillError::storage("put", key, err))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| SkillError::storage("put", key, err))?;
        tmp.persist(&path)
            .map_err(|err| SkillError::storage("put", key, err.error))?;
        trace!(key, size = bytes.len(), "fs put");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(SkillError::ObjectNotFound(key.to_string()))
            }
            Err(err) => Err(SkillError::storage("get", key, err)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        validate_prefix(prefix)?;
        let root = self.walk_root(prefix);
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(|err| SkillError::storage("list", prefix, err))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.objects) else {
                continue;
            };
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                self.prune_empty_parents(&path);
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SkillError::storage("delete", key, err)),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.object_path(key)?.is_file())
    }

    fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        if !self.exists(key)? {
            return Err(SkillError::ObjectNotFound(key.to_string()));
        }
        Ok(self.signer.sign(key, ttl))
    }
}
