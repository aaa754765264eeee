//! Directory scanning.
//!
//! [`scan_directory`] lists the immediate children of a directory, keeps the
//! regular files whose extension is a recognized image type, and returns them
//! numerically ordered together with the files it skipped.
//!
//! # Example
//!
//! ```no_run
//! use gifmake::scan::scan_directory;
//!
//! let report = scan_directory("frames")?;
//! println!("{report}");
//! for image in &report.images {
//!     println!("{}", image.path.display());
//! }
//! # Ok::<(), gifmake::GifmakeError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GifmakeError;
use crate::ordering::order_paths;
use crate::utilities::bytes_to_megabytes;

/// Image file types accepted as animation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    /// `.png`
    Png,
    /// `.jpg`
    Jpg,
    /// `.jpeg`
    Jpeg,
}

impl ImageExtension {
    /// Classify a path by its extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageExtension::Png),
            "jpg" => Some(ImageExtension::Jpg),
            "jpeg" => Some(ImageExtension::Jpeg),
            _ => None,
        }
    }

    /// The canonical lowercase extension, without the leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
        }
    }
}

impl Display for ImageExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, ".{}", self.as_str())
    }
}

/// A frame file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    /// Full path to the image file.
    pub path: PathBuf,
    /// The recognized extension of `path`.
    pub extension: ImageExtension,
}

impl ImageReference {
    /// Build a reference if `path` has a recognized image extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let extension = ImageExtension::from_path(&path)?;
        Some(Self { path, extension })
    }
}

impl AsRef<Path> for ImageReference {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Result of scanning a frame directory.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The directory that was scanned.
    pub directory: PathBuf,
    /// Accepted images, ordered by frame number.
    pub images: Vec<ImageReference>,
    /// Files skipped because their extension is not recognized, sorted by
    /// path.
    pub rejected: Vec<PathBuf>,
    /// Combined on-disk size of the accepted images in bytes.
    pub total_bytes: u64,
}

impl ScanReport {
    /// Number of accepted images.
    pub fn accepted_count(&self) -> usize {
        self.images.len()
    }

    /// Number of skipped files.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Size of the accepted images in MiB, rounded to two decimals.
    pub fn estimated_megabytes(&self) -> f64 {
        bytes_to_megabytes(self.total_bytes)
    }
}

impl Display for ScanReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(
            f,
            "Found {} images. Size: {}MB",
            self.accepted_count(),
            self.estimated_megabytes(),
        )?;
        writeln!(f, "Skipping {} non-image files...", self.rejected_count())?;
        for path in &self.rejected {
            writeln!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Scan `directory` for frame images.
///
/// Only immediate children are considered; subdirectories are ignored rather
/// than descended into or reported as rejected.
///
/// # Errors
///
/// - [`GifmakeError::InvalidDirectory`] if `directory` is missing or not a
///   directory.
/// - [`GifmakeError::EmptyImageSet`] if no recognized image is found.
/// - [`GifmakeError::AmbiguousFilename`] if any accepted image cannot be
///   numbered.
pub fn scan_directory<P: AsRef<Path>>(directory: P) -> Result<ScanReport, GifmakeError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(GifmakeError::InvalidDirectory {
            path: directory.to_path_buf(),
        });
    }

    log::debug!("Scanning {}", directory.display());

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    let mut total_bytes = 0_u64;

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        // Follows symlinks; a dangling link is skipped.
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(error) => {
                log::warn!("Skipping {}: {error}", entry.path().display());
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        match ImageReference::from_path(entry.path()) {
            Some(image) => {
                total_bytes += metadata.len();
                accepted.push(image);
            }
            None => rejected.push(entry.path()),
        }
    }

    if accepted.is_empty() {
        return Err(GifmakeError::EmptyImageSet {
            directory: directory.to_path_buf(),
        });
    }

    rejected.sort();
    let images = order_paths(accepted)?;

    log::debug!(
        "Accepted {} images ({} bytes), rejected {} files",
        images.len(),
        total_bytes,
        rejected.len(),
    );

    Ok(ScanReport {
        directory: directory.to_path_buf(),
        images,
        rejected,
        total_bytes,
    })
}
