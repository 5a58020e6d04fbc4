//! Zip extraction with path-traversal protection.
//!
//! Every entry name is joined onto the destination and resolved lexically before
//! anything is written for it. An entry that would land outside the destination
//! (`../../evil`, `/etc/passwd`, ...) fails the whole extraction with
//! [`FetchError::PathTraversal`].
//!
//! Extraction is not transactional: entries written before a failure stay on
//! disk. Callers extract into a scratch directory they discard on error.

use crate::core::FetchError;
use crate::utils::fs::{contained_join, normalize_path};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Permission bits for file entries that carry no Unix mode.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// One entry written by [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Entry name as stored in the archive
    pub archive_path: String,
    /// Where the entry was written, always inside the destination
    pub resolved_path: PathBuf,
    /// Whether the entry is a directory
    pub is_directory: bool,
}

/// Extract every entry of the zip at `archive` into `destination`.
///
/// `destination` is created if missing. Returns the entries in archive order.
///
/// # Errors
///
/// - [`FetchError::PathTraversal`] for an entry escaping `destination`
/// - [`FetchError::Io`] when the archive cannot be read or a file cannot be written
pub fn extract(archive: &Path, destination: &Path) -> Result<Vec<ExtractedEntry>, FetchError> {
    let file = File::open(archive).map_err(|e| FetchError::io("open archive", archive, e))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| FetchError::io("read archive", archive, io::Error::from(e)))?;

    fs::create_dir_all(destination).map_err(|e| FetchError::io("create directory", destination, e))?;

    let mut extracted = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| FetchError::io("read archive entry in", archive, io::Error::from(e)))?;

        let name = entry.name().to_string();
        let resolved = contained_join(destination, &name).ok_or_else(|| FetchError::PathTraversal {
            entry: name.clone(),
            destination: normalize_path(destination),
        })?;

        if entry.is_dir() {
            fs::create_dir_all(&resolved).map_err(|e| FetchError::io("create directory", &resolved, e))?;
            debug!("Created {}", resolved.display());
        } else {
            if let Some(parent) = resolved.parent() {
                fs::create_dir_all(parent).map_err(|e| FetchError::io("create directory", parent, e))?;
            }

            let mode = entry.unix_mode().map_or(DEFAULT_FILE_MODE, |m| m & 0o777);
            let mut out = open_for_write(&resolved, mode).map_err(|e| FetchError::io("create file", &resolved, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| FetchError::io("extract", &resolved, e))?;
            debug!("Extracted {} ({:o})", resolved.display(), mode);
        }

        extracted.push(ExtractedEntry {
            archive_path: name,
            is_directory: entry.is_dir(),
            resolved_path: resolved,
        });
    }

    Ok(extracted)
}

#[cfg(unix)]
fn open_for_write(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new().write(true).create(true).truncate(true).mode(mode).open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}
