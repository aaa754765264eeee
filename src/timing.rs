//! Frame-rate resolution.
//!
//! A caller states its timing intent as a [`FrameRateSpec`]: an explicit
//! frames-per-second value, a total animation duration, or neither. The intent
//! is resolved against the number of frames to a single positive fps.
//!
//! # Example
//!
//! ```
//! use gifmake::FrameRateSpec;
//!
//! let intent = FrameRateSpec::new(None, Some(5.0))?;
//! assert_eq!(intent.resolve(200), 40);
//! assert_eq!(FrameRateSpec::default().resolve(200), 30);
//! # Ok::<(), gifmake::GifmakeError>(())
//! ```

use crate::error::GifmakeError;

/// Frame rate used when neither fps nor duration is given.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 30;

/// The caller's timing intent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrameRateSpec {
    /// Use [`DEFAULT_FRAMES_PER_SECOND`].
    #[default]
    Default,
    /// Play at exactly this many frames per second.
    FramesPerSecond(u32),
    /// Stretch all frames over this many seconds.
    Duration(f64),
}

impl FrameRateSpec {
    /// Build the timing intent from optional fps and duration values.
    ///
    /// A zero fps or zero duration counts as not given.
    ///
    /// # Errors
    ///
    /// - [`GifmakeError::ConflictingTiming`] if both are given.
    /// - [`GifmakeError::InvalidTiming`] if the duration is negative or not
    ///   finite.
    pub fn new(fps: Option<u32>, duration: Option<f64>) -> Result<Self, GifmakeError> {
        let fps = fps.filter(|&value| value != 0);
        let duration = duration.filter(|&value| value != 0.0);

        if let Some(seconds) = duration {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(GifmakeError::InvalidTiming(format!(
                    "duration must be a positive number of seconds, got {seconds}"
                )));
            }
        }

        match (fps, duration) {
            (Some(fps), Some(duration)) => Err(GifmakeError::ConflictingTiming { fps, duration }),
            (Some(fps), None) => Ok(FrameRateSpec::FramesPerSecond(fps)),
            (None, Some(duration)) => Ok(FrameRateSpec::Duration(duration)),
            (None, None) => Ok(FrameRateSpec::Default),
        }
    }

    /// Resolve to frames per second for `frame_count` frames.
    ///
    /// A duration resolves to `frame_count / duration` rounded to the nearest
    /// integer, ties to even, with a floor of 1 so a long duration over few
    /// frames never yields 0 fps.
    pub fn resolve(&self, frame_count: usize) -> u32 {
        match *self {
            FrameRateSpec::Default => DEFAULT_FRAMES_PER_SECOND,
            FrameRateSpec::FramesPerSecond(fps) => fps,
            FrameRateSpec::Duration(seconds) => {
                let fps = (frame_count as f64 / seconds).round_ties_even();
                // Saturating cast; the floor keeps the result positive.
                (fps as u32).max(1)
            }
        }
    }
}

/// Validate and resolve in one step.
///
/// # Errors
///
/// Same as [`FrameRateSpec::new`].
pub fn resolve_frame_rate(
    fps: Option<u32>,
    duration: Option<f64>,
    frame_count: usize,
) -> Result<u32, GifmakeError> {
    Ok(FrameRateSpec::new(fps, duration)?.resolve(frame_count))
}

/// Convert frames per second to a GIF frame delay in hundredths of a second.
///
/// GIF delays are whole centiseconds, so rates above 100 fps all clamp to the
/// minimum delay of 1.
pub fn frame_delay_centiseconds(frames_per_second: u32) -> u16 {
    let delay = (100.0 / f64::from(frames_per_second.max(1))).round();
    (delay as u16).max(1)
}
