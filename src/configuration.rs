//! Conversion configuration.
//!
//! [`ConvertOptions`] is a builder that threads the progress callback,
//! output naming, frame timing, transform, encoder, and optimizer settings
//! through a [`GifMaker`](crate::GifMaker) run without polluting every
//! function signature.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use gifmake::{ConvertOptions, FrameRateSpec, OptimizeMode};
//!
//! let options = ConvertOptions::new()
//!     .with_name("intro")
//!     .with_max_size(600)
//!     .with_frame_rate(FrameRateSpec::new(Some(24), None)?)
//!     .with_optimize(OptimizeMode::Required)
//!     .with_optimizer_timeout(Duration::from_secs(30));
//! # Ok::<(), gifmake::GifmakeError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::gif::GifOptions;
use crate::optimize::{DEFAULT_OPTIMIZER_TIMEOUT, Gifsicle, OptimizeMode, Optimizer};
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::timing::FrameRateSpec;
use crate::transform::FrameTransform;

/// Configuration for a conversion run.
///
/// All fields have sensible defaults: the output is named after the
/// directory, frames are not resized, playback is 30 fps, and gifsicle is
/// used if it is installed.
#[derive(Clone)]
#[must_use]
pub struct ConvertOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
    /// Explicit output base name.
    pub(crate) name: Option<String>,
    /// Per-frame transform settings.
    pub(crate) transform: FrameTransform,
    /// Timing intent.
    pub(crate) frame_rate: FrameRateSpec,
    /// GIF encoder settings.
    pub(crate) gif: GifOptions,
    /// Optimization policy.
    pub(crate) optimize: OptimizeMode,
    /// Optimizer used when `optimize` is not disabled.
    pub(crate) optimizer: Arc<dyn Optimizer>,
    /// Upper bound on the optimizer run.
    pub(crate) optimizer_timeout: Duration,
}

impl Debug for ConvertOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConvertOptions")
            .field("batch_size", &self.batch_size)
            .field("name", &self.name)
            .field("max_size", &self.transform.max_size)
            .field("frame_rate", &self.frame_rate)
            .field("gif", &self.gif)
            .field("optimize", &self.optimize)
            .field("optimizer", &self.optimizer.name())
            .field("optimizer_timeout", &self.optimizer_timeout)
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
            name: None,
            transform: FrameTransform::default(),
            frame_rate: FrameRateSpec::Default,
            gif: GifOptions::default(),
            optimize: OptimizeMode::default(),
            optimizer: Arc::new(Gifsicle::new()),
            optimizer_timeout: DEFAULT_OPTIMIZER_TIMEOUT,
        }
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every frame; 10 means every 10th frame.
    /// Clamped to a minimum of 1.
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the output base name. `.gif` is appended if missing.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Limit the longest edge of every frame to `max_size` pixels.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.transform.max_size = Some(max_size);
        self
    }

    /// Set the timing intent.
    pub fn with_frame_rate(mut self, frame_rate: FrameRateSpec) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Set the GIF encoder options.
    pub fn with_gif_options(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }

    /// Set the optimization policy.
    pub fn with_optimize(mut self, mode: OptimizeMode) -> Self {
        self.optimize = mode;
        self
    }

    /// Replace the optimizer (gifsicle by default).
    pub fn with_optimizer(mut self, optimizer: Arc<dyn Optimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the upper bound on a single optimizer run.
    pub fn with_optimizer_timeout(mut self, timeout: Duration) -> Self {
        self.optimizer_timeout = timeout;
        self
    }

    /// The configured output base name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The configured timing intent.
    pub fn frame_rate(&self) -> FrameRateSpec {
        self.frame_rate
    }

    /// The configured optimization policy.
    pub fn optimize_mode(&self) -> OptimizeMode {
        self.optimize
    }
}
