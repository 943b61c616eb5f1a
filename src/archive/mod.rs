//! Gzip-compressed tar archive codec for package file sets.
//!
//! [`pack`] writes deterministic headers (mtime 0, mode 0644, uid/gid 0) so
//! the same file set always yields the same bytes. [`unpack`] pulls entries
//! one at a time, keeps regular files only and classifies each by extension.

pub mod content_type;
pub mod entry;

use std::collections::HashSet;
use std::io::Read;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, trace};

use crate::error::{Result, SkillError};

pub use entry::{FileContent, FileEntry, normalize_relative_path};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Upper bound on entries accepted from one archive.
pub const MAX_ARCHIVE_ENTRIES: usize = 10_000;

/// Upper bound on the decompressed tar stream.
pub const MAX_UNPACKED_BYTES: u64 = 512 * 1024 * 1024;

const ENTRY_MODE: u32 = 0o644;

/// Serialize files into a gzip-compressed tar archive, preserving order.
///
/// # Errors
///
/// [`SkillError::InvalidPath`] for an unsafe or duplicate path.
pub fn pack(files: &[FileEntry]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut seen = HashSet::with_capacity(files.len());

    for file in files {
        let path = normalize_relative_path(&file.path)?;
        if !seen.insert(path.clone()) {
            return Err(SkillError::InvalidPath(format!("{path}: duplicate entry")));
        }
        let data = file.content.as_bytes();

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        builder.append_data(&mut header, &path, data)?;
        trace!(path = %path, size = data.len(), "packed entry");
    }

    let encoder = builder.into_inner()?;
    let bytes = encoder.finish()?;
    debug!(entries = files.len(), bytes = bytes.len(), "packed archive");
    Ok(bytes)
}

/// Read a gzip-compressed tar archive back into file entries.
///
/// Directories, links and other non-regular entries are skipped. Leading
/// `./` is stripped from entry names.
///
/// # Errors
///
/// - [`SkillError::CorruptArchive`] when the gzip or tar framing is invalid
/// - [`SkillError::TruncatedEntry`] when an entry holds fewer bytes than its header declares
/// - [`SkillError::InvalidPath`] when an entry escapes the package root
pub fn unpack(bytes: &[u8]) -> Result<Vec<FileEntry>> {
    if bytes.len() < GZIP_MAGIC.len() || bytes[..2] != GZIP_MAGIC {
        return Err(SkillError::CorruptArchive("not a gzip stream".to_string()));
    }

    let mut tape = Vec::new();
    GzDecoder::new(bytes)
        .take(MAX_UNPACKED_BYTES + 1)
        .read_to_end(&mut tape)
        .map_err(|err| SkillError::CorruptArchive(format!("gzip: {err}")))?;
    if tape.len() as u64 > MAX_UNPACKED_BYTES {
        return Err(SkillError::CorruptArchive(format!(
            "decompressed size exceeds {MAX_UNPACKED_BYTES} bytes"
        )));
    }

    let mut archive = tar::Archive::new(tape.as_slice());
    let entries = archive.entries().map_err(corrupt)?;
    let mut files = Vec::new();

    for entry in entries {
        let mut entry = entry.map_err(corrupt)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        if files.len() >= MAX_ARCHIVE_ENTRIES {
            return Err(SkillError::CorruptArchive(format!(
                "more than {MAX_ARCHIVE_ENTRIES} entries"
            )));
        }

        let raw_path = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();
        let path = normalize_relative_path(&raw_path)?;
        let declared = entry.size();

        let mut data = Vec::with_capacity(usize::try_from(declared.min(tape.len() as u64)).unwrap_or(0));
        entry.read_to_end(&mut data).map_err(corrupt)?;
        let actual = data.len() as u64;
        if actual < declared {
            return Err(SkillError::TruncatedEntry {
                path,
                declared,
                actual,
            });
        }

        trace!(path = %path, size = actual, "unpacked entry");
        files.push(FileEntry::classified(path, data));
    }

    debug!(entries = files.len(), "unpacked archive");
    Ok(files)
}

fn corrupt(err: std::io::Error) -> SkillError {
    SkillError::CorruptArchive(err.to_string())
}
