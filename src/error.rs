//! Error types for the `gifmake` crate.
//!
//! This module defines [`GifmakeError`], the unified error type returned by
//! all fallible operations in the crate. Every variant is fatal to a
//! conversion run except where noted: a missing optimizer is reported as a
//! warning unless optimization was made mandatory.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `gifmake` operations.
///
/// Every public function that can fail returns `Result<T, GifmakeError>`.
/// Variants carry the offending path, name, or value so the message is
/// useful without extra logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GifmakeError {
    /// The input path does not exist or is not a directory.
    #[error("{} is not a valid directory", path.display())]
    InvalidDirectory {
        /// Path that was given as the frame directory.
        path: PathBuf,
    },

    /// The directory holds no file with a recognized image extension.
    #[error("No images found in directory: {}", directory.display())]
    EmptyImageSet {
        /// The scanned directory.
        directory: PathBuf,
    },

    /// A file name does not contain exactly one run of digits.
    #[error("File name numbering {name} is ambiguous: {reason}")]
    AmbiguousFilename {
        /// The path (or string) that could not be numbered.
        name: String,
        /// Why no single frame number could be extracted.
        reason: String,
    },

    /// Both a frame rate and a total duration were requested.
    #[error("Cannot specify both a duration ({duration}s) and an FPS ({fps})")]
    ConflictingTiming {
        /// Requested frames per second.
        fps: u32,
        /// Requested total duration in seconds.
        duration: f64,
    },

    /// A timing value is outside its valid domain (negative or not finite).
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// An explicit output name carries an extension other than `.gif`.
    #[error("{extension} is an invalid output extension for {name} (expected .gif)")]
    InvalidOutputName {
        /// The name as given by the caller.
        name: String,
        /// The foreign extension, including the leading dot.
        extension: String,
    },

    /// A frame could not be decoded.
    #[error("Failed to decode {}: {source}", path.display())]
    DecodeError {
        /// The image file that failed to decode.
        path: PathBuf,
        /// Error reported by the `image` crate.
        #[source]
        source: ImageError,
    },

    /// The animation could not be encoded or written.
    #[error("GIF encoding error: {0}")]
    EncodeError(String),

    /// Optimization was required but the optimizer program is not installed.
    #[error("Optimizer `{program}` is not installed")]
    OptimizerUnavailable {
        /// The program that was probed.
        program: String,
    },

    /// The optimizer ran but did not complete successfully.
    #[error("Optimization failed: {0}")]
    OptimizeError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl GifmakeError {
    /// Returns `true` for errors caused by the caller's input rather than by
    /// a failing stage of the conversion.
    ///
    /// The command-line binary exits with status 2 for these and 1 for
    /// everything else.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            GifmakeError::InvalidDirectory { .. }
                | GifmakeError::EmptyImageSet { .. }
                | GifmakeError::AmbiguousFilename { .. }
                | GifmakeError::ConflictingTiming { .. }
                | GifmakeError::InvalidTiming(_)
                | GifmakeError::InvalidOutputName { .. }
        )
    }
}

impl From<gif::EncodingError> for GifmakeError {
    fn from(error: gif::EncodingError) -> Self {
        GifmakeError::EncodeError(error.to_string())
    }
}
