//! Binary installation.
//!
//! Installing a downloaded archive means:
//!
//! 1. Check the install directory exists (it is never created)
//! 2. Extract the archive into a fresh scratch directory
//! 3. Copy the product executable from the top level of the scratch directory
//!    into the install directory, replacing any previous copy
//! 4. Mark it executable (`0o755`) unless the target is Windows
//! 5. Delete the archive
//!
//! The scratch directory is a [`tempfile::TempDir`], removed when it goes out of
//! scope whether installation succeeded or not.
//!
//! Replacement is not atomic: a crash during the copy can leave a truncated
//! executable in the install directory.

pub mod decision;

pub use decision::{Decision, RunMode, decide};

use crate::archive;
use crate::config::ReleaseSource;
use crate::core::FetchError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix of scratch directories created under the system temp dir.
pub const SCRATCH_PREFIX: &str = "relfetch-";

/// Expand a leading `~` in a user-supplied install path.
pub fn expand_install_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Copy the product executable from `scratch` into `destination`.
///
/// Returns the installed path.
///
/// # Errors
///
/// - [`FetchError::BinaryNotFound`] when `scratch` has no top-level executable
///   named for the product and target OS
/// - [`FetchError::Io`] when the copy or the permission change fails
pub fn install(
    scratch: &Path,
    destination: &Path,
    source: &ReleaseSource,
    target_os: &str,
) -> Result<PathBuf, FetchError> {
    let binary_name = source.binary_name(target_os);
    let src = scratch.join(&binary_name);

    if !src.is_file() {
        return Err(FetchError::BinaryNotFound {
            name: binary_name,
            searched: scratch.to_path_buf(),
        });
    }

    let dst = destination.join(&binary_name);
    fs::copy(&src, &dst).map_err(|e| FetchError::io("copy binary to", &dst, e))?;

    if target_os != "windows" {
        make_executable(&dst)?;
    }

    debug!("Installed {} -> {}", src.display(), dst.display());
    Ok(dst)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), FetchError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| FetchError::io("make executable", path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), FetchError> {
    Ok(())
}

/// Extract `archive` into a scratch directory and install its executable into
/// `destination`. The archive is deleted afterwards.
pub fn install_from_archive(
    archive_path: &Path,
    destination: &Path,
    source: &ReleaseSource,
    target_os: &str,
) -> Result<PathBuf, FetchError> {
    match fs::metadata(destination) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(FetchError::io(
                "use install path",
                destination,
                io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FetchError::io(
                "use install path",
                destination,
                io::Error::new(io::ErrorKind::NotFound, "install path does not exist"),
            ));
        }
        Err(e) => return Err(FetchError::io("use install path", destination, e)),
    }

    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .map_err(|e| FetchError::io("create scratch directory in", std::env::temp_dir(), e))?;
    debug!("Extracting into {}", scratch.path().display());

    println!("Extracting {}...", archive_path.display());
    archive::extract(archive_path, scratch.path())?;

    println!(
        "Installing to {}...",
        destination.join(source.binary_name(target_os)).display()
    );
    let installed = install(scratch.path(), destination, source, target_os)?;

    if let Err(e) = fs::remove_file(archive_path) {
        warn!("Could not remove {}: {e}", archive_path.display());
    }

    Ok(installed)
}
