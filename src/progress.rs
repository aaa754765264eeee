//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring a conversion,
//! [`ProgressInfo`] for per-frame progress snapshots, and
//! [`ConversionEvent`] for one-off notifications such as the scan summary
//! or a skipped optimization.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gifmake::{
//!     ConversionEvent, ConvertOptions, GifMaker, GifmakeError, ProgressCallback, ProgressInfo,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//!
//!     fn on_event(&self, event: &ConversionEvent) {
//!         if let ConversionEvent::ScanCompleted(report) = event {
//!             print!("{report}");
//!         }
//!     }
//! }
//!
//! let options = ConvertOptions::new().with_progress(Arc::new(PrintProgress));
//! let report = GifMaker::new("frames", options).run()?;
//! # Ok::<(), GifmakeError>(())
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::scan::ScanReport;

/// The kind of per-frame work currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Decoding frame images from disk.
    Decoding,
    /// Downscaling and normalizing decoded frames.
    Transforming,
    /// Quantizing and writing frames into the GIF.
    Encoding,
}

/// A snapshot of conversion progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled
/// by [`ConvertOptions::with_batch_size`](crate::ConvertOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many frames have been processed so far.
    pub current: u64,
    /// Total frames expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// The frame file currently being processed, when there is one.
    pub current_path: Option<PathBuf>,
}

/// One-off notifications emitted by the orchestrator.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ConversionEvent {
    /// The directory was scanned and ordered.
    ScanCompleted(ScanReport),
    /// The GIF was fully written.
    OutputWritten {
        /// Where the GIF was written.
        path: PathBuf,
        /// Size of the written file.
        bytes: u64,
    },
    /// The optimizer ran successfully.
    Optimized {
        /// Size before optimization.
        bytes_before: u64,
        /// Size after optimization.
        bytes_after: u64,
    },
    /// Optimization was requested on a best-effort basis and did not happen.
    OptimizerSkipped {
        /// Why the optimizer was skipped.
        reason: String,
    },
}

/// Trait for receiving progress updates during a conversion.
///
/// Implementations must be [`Send`] and [`Sync`] because they are shared
/// through [`ConvertOptions`](crate::ConvertOptions), which may cross threads.
///
/// Callbacks are **infallible**: they observe but cannot halt the run.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals while frames are processed.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called once per notable event. The default ignores events.
    fn on_event(&self, _event: &ConversionEvent) {}
}

/// A no-op implementation that discards all notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    /// Create a new tracker.
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one completed item and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self, path: Option<PathBuf>) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(path);
            self.items_since_last_report = 0;
        }
    }

    /// Mark `count` items complete at once and emit a final report.
    pub(crate) fn complete(&mut self, count: u64) {
        self.current = count;
        self.report(None);
        self.items_since_last_report = 0;
    }

    /// Emit a final report unless the last advance already reported it.
    pub(crate) fn finish(&mut self) {
        if self.items_since_last_report > 0 || self.current == 0 {
            self.report(None);
            self.items_since_last_report = 0;
        }
    }

    fn report(&self, path: Option<PathBuf>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|t| {
                let remaining = t.saturating_sub(self.current);
                elapsed.mul_f64(remaining as f64 / self.current as f64)
            })
        } else {
            None
        };

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_path: path,
        };

        self.callback.on_progress(&info);
    }
}
