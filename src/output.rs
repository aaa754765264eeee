//! Output file naming.
//!
//! An [`OutputTarget`] places the animation inside the frame directory. The
//! base name defaults to the directory's own name, and the `.gif` extension
//! is appended exactly once.
//!
//! # Example
//!
//! ```no_run
//! use gifmake::OutputTarget;
//!
//! let target = OutputTarget::new("frames", Some("intro"))?;
//! assert_eq!(target.file_name(), "intro.gif");
//!
//! let same = OutputTarget::new("frames", Some("intro.gif"))?;
//! assert_eq!(same.path(), target.path());
//! # Ok::<(), gifmake::GifmakeError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::error::GifmakeError;

/// Extension of the animation container, without the leading dot.
pub const ANIMATION_EXTENSION: &str = "gif";

/// Normalize an output base name to `<stem>.gif`.
///
/// # Errors
///
/// Returns [`GifmakeError::InvalidOutputName`] if `name` has an extension
/// other than `.gif`.
pub fn normalize_output_name(name: &str) -> Result<String, GifmakeError> {
    let path = Path::new(name);
    match path.extension().map(|extension| extension.to_string_lossy()) {
        None => Ok(format!("{name}.{ANIMATION_EXTENSION}")),
        Some(extension) if extension.eq_ignore_ascii_case(ANIMATION_EXTENSION) => {
            Ok(name.to_string())
        }
        Some(extension) => Err(GifmakeError::InvalidOutputName {
            name: name.to_string(),
            extension: format!(".{extension}"),
        }),
    }
}

/// Where the finished animation is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    directory: PathBuf,
    file_name: String,
}

impl OutputTarget {
    /// Build the target for `directory`, using `name` if given and the
    /// directory's leaf name otherwise.
    ///
    /// # Errors
    ///
    /// - [`GifmakeError::InvalidDirectory`] if `directory` does not exist,
    ///   is not a directory, or has no usable leaf name.
    /// - [`GifmakeError::InvalidOutputName`] if `name` has a foreign
    ///   extension.
    pub fn new<P: AsRef<Path>>(directory: P, name: Option<&str>) -> Result<Self, GifmakeError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(GifmakeError::InvalidDirectory {
                path: directory.to_path_buf(),
            });
        }

        // Only an explicit name is checked for a foreign extension; a
        // directory called `shots.v2` still yields `shots.v2.gif`.
        let file_name = match name {
            Some(name) => normalize_output_name(name)?,
            None => {
                let leaf = leaf_name(directory)?;
                if leaf.ends_with(&format!(".{ANIMATION_EXTENSION}")) {
                    leaf
                } else {
                    format!("{leaf}.{ANIMATION_EXTENSION}")
                }
            }
        };

        Ok(Self {
            directory: directory.to_path_buf(),
            file_name,
        })
    }

    /// The directory the animation is written into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The output file name, always ending in `.gif`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the output file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Leaf name of `directory`, resolving `.` and `..` through the filesystem.
fn leaf_name(directory: &Path) -> Result<String, GifmakeError> {
    let resolved = directory.canonicalize()?;
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| GifmakeError::InvalidDirectory {
            path: directory.to_path_buf(),
        })
}
