//! # gifmake
//!
//! Turn a directory of numbered still images into an animated GIF.
//!
//! `gifmake` scans a directory for PNG and JPEG frames, orders them by the
//! number embedded in each file name (so `2.png` plays before `10.png`),
//! optionally downscales them, encodes them into a looping GIF at a chosen
//! frame rate or total duration, and optionally shrinks the result with
//! [gifsicle](https://www.lcdf.org/gifsicle/).
//!
//! ## Quick Start
//!
//! ### Convert a Directory
//!
//! ```no_run
//! use gifmake::{ConvertOptions, GifMaker};
//!
//! let report = GifMaker::new("frames", ConvertOptions::new()).run().unwrap();
//! println!("Wrote {}", report.output.display());
//! ```
//!
//! ### Fit a Fixed Duration
//!
//! ```no_run
//! use gifmake::{ConvertOptions, FrameRateSpec, GifMaker};
//!
//! // Spread however many frames there are over four seconds.
//! let options = ConvertOptions::new()
//!     .with_name("walk-cycle")
//!     .with_max_size(480)
//!     .with_frame_rate(FrameRateSpec::new(None, Some(4.0)).unwrap());
//! GifMaker::new("frames", options).run().unwrap();
//! ```
//!
//! ### Inspect Without Writing
//!
//! ```no_run
//! use gifmake::{ConvertOptions, GifMaker};
//!
//! let plan = GifMaker::new("frames", ConvertOptions::new()).plan().unwrap();
//! print!("{}", plan.scan);
//! println!("{} at {} fps", plan.target.path().display(), plan.frames_per_second);
//! ```
//!
//! ## Features
//!
//! - **Numeric ordering**: frames are ordered by the single run of digits
//!   in their file name; names with zero or several runs are rejected
//! - **Timing**: a fixed fps or a total duration, defaulting to 30 fps
//! - **Downscaling**: cap the longest edge while keeping the aspect ratio
//! - **Atomic output**: the GIF is staged and moved into place only when
//!   complete
//! - **Optimization**: best-effort or mandatory gifsicle pass with a
//!   timeout
//! - **Progress**: per-frame callbacks and stage events
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Frame transforms run across rayon threads |
//! | `full` | Enables all of the above |

pub mod configuration;
pub mod convert;
pub mod error;
pub mod gif;
pub mod optimize;
pub mod ordering;
pub mod output;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod scan;
pub mod timing;
pub mod transform;
pub mod utilities;

pub use self::gif::{GifOptions, GifWriter, encode_gif};
pub use configuration::ConvertOptions;
pub use convert::{ConversionPlan, ConversionReport, GifMaker, OptimizationOutcome};
pub use error::GifmakeError;
pub use optimize::{Gifsicle, OptimizeMode, Optimizer};
pub use ordering::{extract_frame_number, order_paths};
pub use output::OutputTarget;
pub use progress::{ConversionEvent, OperationType, ProgressCallback, ProgressInfo};
pub use scan::{ImageExtension, ImageReference, ScanReport, scan_directory};
pub use timing::{FrameRateSpec, resolve_frame_rate};
pub use transform::FrameTransform;
