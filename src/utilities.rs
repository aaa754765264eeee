//! Internal utility functions.
//!
//! Size formatting helpers shared by the scanner, the orchestrator report,
//! and the command-line binary, plus the staging-file plumbing that keeps
//! partially written GIFs out of the output directory.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

const BYTES_IN_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Convert a byte count to MiB, rounded to two decimals.
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_IN_MEGABYTE * 100.0).round() / 100.0
}

/// Format a byte count with a binary unit suffix (`KiB`, `MiB`, ...).
pub fn human_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KiB", "MiB", "GiB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TiB")
}

/// Create a hidden staging file in `directory` for an output that is
/// written in full before it replaces its destination.
pub(crate) fn staging_file_in(directory: &Path) -> io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".gifmake-")
        .suffix(".gif.part")
        .tempfile_in(directory)
}

/// The directory holding `path`, or `.` for a bare file name.
pub(crate) fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Atomically move a completed staging file over `destination`.
///
/// Returns the size of the published file in bytes.
pub(crate) fn persist_staged(staging: NamedTempFile, destination: &Path) -> io::Result<u64> {
    staging.as_file().sync_all()?;

    // Staging files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staging
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    let file = staging.persist(destination).map_err(|error| error.error)?;
    Ok(file.metadata()?.len())
}
