//! The conversion pipeline.
//!
//! [`GifMaker`] runs one directory-to-GIF conversion through a fixed
//! sequence of stages:
//!
//! 1. **Scan**: list, filter, and numerically order the frame files.
//! 2. **Decode**: load every frame in order.
//! 3. **Transform**: downscale and drop alpha channels.
//! 4. **Resolve frame rate**: turn the timing intent into an fps value.
//! 5. **Encode**: write the GIF through a scoped [`GifWriter`].
//! 6. **Optimize**: optionally run the external optimizer.
//!
//! Failures in scanning, decoding, or encoding abort the run and leave no
//! output file behind. Optimization is best effort unless
//! [`OptimizeMode::Required`] is set.
//!
//! # Example
//!
//! ```no_run
//! use gifmake::{ConvertOptions, GifMaker, GifmakeError};
//!
//! let options = ConvertOptions::new().with_max_size(600);
//! let report = GifMaker::new("frames", options).run()?;
//! println!("{} frames at {} fps -> {}", report.frame_count, report.frames_per_second,
//!     report.output.display());
//! # Ok::<(), GifmakeError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;

use crate::configuration::ConvertOptions;
use crate::error::GifmakeError;
use crate::gif::GifWriter;
use crate::optimize::OptimizeMode;
use crate::output::OutputTarget;
use crate::progress::{ConversionEvent, OperationType, ProgressTracker};
use crate::scan::{ImageReference, ScanReport, scan_directory};
use crate::timing::frame_delay_centiseconds;

/// What the optimization stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizationOutcome {
    /// Optimization was turned off.
    Disabled,
    /// The optimizer rewrote the GIF.
    Applied,
    /// Optimization was attempted on a best-effort basis and skipped.
    Skipped {
        /// Why the optimizer did not run or did not succeed.
        reason: String,
    },
}

/// Everything a run needs before any frame is decoded.
///
/// Produced by [`GifMaker::plan`]; useful for dry runs.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    /// The ordered frames and skipped files.
    pub scan: ScanReport,
    /// Where the GIF will be written.
    pub target: OutputTarget,
    /// Resolved playback rate.
    pub frames_per_second: u32,
}

/// Summary of a finished conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Path of the written GIF.
    pub output: PathBuf,
    /// Number of frames in the animation.
    pub frame_count: usize,
    /// Resolved playback rate.
    pub frames_per_second: u32,
    /// Delay between frames in hundredths of a second.
    pub frame_delay: u16,
    /// Combined size of the source images.
    pub source_bytes: u64,
    /// Size of the GIF as encoded.
    pub encoded_bytes: u64,
    /// Size of the GIF after optimization (equal to `encoded_bytes` when
    /// the optimizer did not run).
    pub final_bytes: u64,
    /// What the optimization stage did.
    pub optimization: OptimizationOutcome,
}

/// Converts one directory of frames into one animated GIF.
#[derive(Debug, Clone)]
pub struct GifMaker {
    directory: PathBuf,
    options: ConvertOptions,
}

impl GifMaker {
    /// Create a converter for `directory`.
    pub fn new<P: AsRef<Path>>(directory: P, options: ConvertOptions) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            options,
        }
    }

    /// The frame directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The run configuration.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Validate the output name, scan the directory, and resolve the frame
    /// rate without decoding anything.
    ///
    /// # Errors
    ///
    /// Returns the first input error: an invalid directory or output name,
    /// an empty or ambiguous image set.
    pub fn plan(&self) -> Result<ConversionPlan, GifmakeError> {
        let target = OutputTarget::new(&self.directory, self.options.name())?;
        let scan = scan_directory(&self.directory)?;
        let frames_per_second = self.options.frame_rate.resolve(scan.accepted_count());

        Ok(ConversionPlan {
            scan,
            target,
            frames_per_second,
        })
    }

    /// Run the whole conversion.
    ///
    /// # Errors
    ///
    /// Any stage failure is returned as-is. On error no output file is left
    /// in place; a GIF already present at the target path is untouched.
    pub fn run(&self) -> Result<ConversionReport, GifmakeError> {
        let progress = Arc::clone(&self.options.progress);

        let target = OutputTarget::new(&self.directory, self.options.name())?;
        let scan = scan_directory(&self.directory)?;
        log::info!(
            "Found {} images in {} ({} skipped)",
            scan.accepted_count(),
            self.directory.display(),
            scan.rejected_count(),
        );
        progress.on_event(&ConversionEvent::ScanCompleted(scan.clone()));

        let frames = self.decode_frames(&scan.images)?;
        let frames = self.transform_frames(frames);

        let frames_per_second = self.options.frame_rate.resolve(frames.len());
        log::debug!(
            "Resolved {:?} over {} frames to {frames_per_second} fps",
            self.options.frame_rate,
            frames.len(),
        );

        let output = target.path();
        let encoded_bytes = self.encode_frames(&output, &frames, frames_per_second)?;
        progress.on_event(&ConversionEvent::OutputWritten {
            path: output.clone(),
            bytes: encoded_bytes,
        });

        let (optimization, final_bytes) = self.optimize_output(&output, encoded_bytes)?;

        Ok(ConversionReport {
            output,
            frame_count: frames.len(),
            frames_per_second,
            frame_delay: frame_delay_centiseconds(frames_per_second),
            source_bytes: scan.total_bytes,
            encoded_bytes,
            final_bytes,
            optimization,
        })
    }

    fn tracker(&self, operation: OperationType, total: usize) -> ProgressTracker {
        ProgressTracker::new(
            Arc::clone(&self.options.progress),
            operation,
            Some(total as u64),
            self.options.batch_size,
        )
    }

    fn decode_frames(&self, images: &[ImageReference]) -> Result<Vec<DynamicImage>, GifmakeError> {
        log::debug!("Decoding {} frames", images.len());
        let mut tracker = self.tracker(OperationType::Decoding, images.len());
        let mut frames = Vec::with_capacity(images.len());

        for image in images {
            let frame = image::open(&image.path).map_err(|source| GifmakeError::DecodeError {
                path: image.path.clone(),
                source,
            })?;
            frames.push(frame);
            tracker.advance(Some(image.path.clone()));
        }

        tracker.finish();
        Ok(frames)
    }

    fn transform_frames(&self, frames: Vec<DynamicImage>) -> Vec<DynamicImage> {
        let transform = self.options.transform;
        let count = frames.len();
        let mut tracker = self.tracker(OperationType::Transforming, count);

        #[cfg(feature = "rayon")]
        let frames = crate::rayon::parallel_transform_frames(frames, &transform);
        #[cfg(not(feature = "rayon"))]
        let frames = transform.apply_all(frames);

        tracker.complete(count as u64);
        frames
    }

    fn encode_frames(
        &self,
        output: &Path,
        frames: &[DynamicImage],
        frames_per_second: u32,
    ) -> Result<u64, GifmakeError> {
        let mut tracker = self.tracker(OperationType::Encoding, frames.len());
        let mut writer = GifWriter::create(output, frames_per_second, &self.options.gif)?;

        for frame in frames {
            writer.write_frame(frame)?;
            tracker.advance(None);
        }

        let bytes = writer.finish()?;
        tracker.finish();
        Ok(bytes)
    }

    fn optimize_output(
        &self,
        output: &Path,
        encoded_bytes: u64,
    ) -> Result<(OptimizationOutcome, u64), GifmakeError> {
        let mode = self.options.optimize;
        if mode == OptimizeMode::Disabled {
            return Ok((OptimizationOutcome::Disabled, encoded_bytes));
        }

        let optimizer = &self.options.optimizer;
        let attempt = if optimizer.probe() {
            optimizer.optimize(output, self.options.optimizer_timeout)
        } else {
            Err(GifmakeError::OptimizerUnavailable {
                program: optimizer.name().to_string(),
            })
        };

        match attempt {
            Ok(()) => {
                let bytes_after = std::fs::metadata(output)?.len();
                log::info!("Optimized {}: {encoded_bytes} -> {bytes_after} bytes", output.display());
                self.options.progress.on_event(&ConversionEvent::Optimized {
                    bytes_before: encoded_bytes,
                    bytes_after,
                });
                Ok((OptimizationOutcome::Applied, bytes_after))
            }
            Err(error) if mode == OptimizeMode::BestEffort => {
                let reason = error.to_string();
                log::warn!("Skipping optimization: {reason}");
                self.options
                    .progress
                    .on_event(&ConversionEvent::OptimizerSkipped {
                        reason: reason.clone(),
                    });
                Ok((OptimizationOutcome::Skipped { reason }, encoded_bytes))
            }
            Err(error) => Err(error),
        }
    }
}
