//! Animated GIF encoding.
//!
//! This module provides [`GifOptions`] for configuring the animation and
//! [`GifWriter`], a scoped encoder that accepts frames one at a time.
//!
//! The writer encodes into a temporary file next to the destination and
//! only moves it into place in [`GifWriter::finish`]. Dropping a writer
//! without finishing it (for example after a decode error mid-stream)
//! deletes the temporary file, so a failed run never leaves a truncated GIF
//! behind and never clobbers an existing one.
//!
//! # Example
//!
//! ```no_run
//! use gifmake::{GifOptions, GifWriter};
//!
//! let frame = image::open("frames/1.png")?;
//! let mut writer = GifWriter::create("frames/out.gif", 24, &GifOptions::new())?;
//! writer.write_frame(&frame)?;
//! writer.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use gif::{Encoder, Frame, Repeat};
use image::DynamicImage;
use tempfile::NamedTempFile;

use crate::error::GifmakeError;
use crate::timing::frame_delay_centiseconds;
use crate::utilities::{parent_directory, persist_staged, staging_file_in};

/// Fastest quantizer speed accepted by the `gif` crate.
pub const MAX_QUANTIZER_SPEED: i32 = 30;

/// Configuration for animated GIF output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifOptions {
    /// How many times the animation repeats. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Palette quantizer speed, 1 (best quality) to 30 (fastest). Values
    /// outside that range are clamped when frames are written.
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            repeat: None,
            speed: 10,
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repeat count. `None` means loop forever.
    #[must_use]
    pub fn with_repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the quantizer speed, clamped to `1..=30`.
    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, MAX_QUANTIZER_SPEED);
        self
    }

    fn quantizer_speed(&self) -> i32 {
        self.speed.clamp(1, MAX_QUANTIZER_SPEED)
    }

    fn repeat_mode(&self) -> Repeat {
        match self.repeat {
            None => Repeat::Infinite,
            Some(count) => Repeat::Finite(count),
        }
    }
}

/// Encoder state created lazily from the first frame, which fixes the
/// canvas size.
struct Canvas {
    encoder: Encoder<BufWriter<NamedTempFile>>,
    width: u16,
    height: u16,
}

/// Scoped animated GIF writer.
///
/// Frames are written in the order [`write_frame`](GifWriter::write_frame)
/// is called. All frames must share the first frame's dimensions.
pub struct GifWriter {
    destination: PathBuf,
    staging: Option<NamedTempFile>,
    canvas: Option<Canvas>,
    options: GifOptions,
    delay: u16,
    frames_written: usize,
}

impl GifWriter {
    /// Prepare to write an animation to `path` at `frames_per_second`.
    ///
    /// The staging file is created immediately in `path`'s directory.
    ///
    /// # Errors
    ///
    /// Returns [`GifmakeError::IoError`] if the staging file cannot be
    /// created.
    pub fn create<P: AsRef<Path>>(
        path: P,
        frames_per_second: u32,
        options: &GifOptions,
    ) -> Result<Self, GifmakeError> {
        let destination = path.as_ref().to_path_buf();
        let staging = staging_file_in(&parent_directory(&destination))?;

        let delay = frame_delay_centiseconds(frames_per_second);
        log::debug!(
            "Writing GIF to {} via {} (fps={frames_per_second}, delay={delay}cs, repeat={:?})",
            destination.display(),
            staging.path().display(),
            options.repeat,
        );

        Ok(Self {
            destination,
            staging: Some(staging),
            canvas: None,
            options: options.clone(),
            delay,
            frames_written: 0,
        })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Delay between frames in hundredths of a second.
    pub fn frame_delay(&self) -> u16 {
        self.delay
    }

    /// Quantize `image` to a 256-colour palette and append it.
    ///
    /// # Errors
    ///
    /// Returns [`GifmakeError::EncodeError`] if the frame exceeds the GIF
    /// size limit, differs in size from the first frame, or cannot be
    /// written.
    pub fn write_frame(&mut self, image: &DynamicImage) -> Result<(), GifmakeError> {
        let (width, height) = gif_dimensions(image)?;
        if self.canvas.is_none() {
            self.canvas = Some(self.open_canvas(width, height)?);
        }

        let frame_number = self.frames_written + 1;
        let (delay, speed) = (self.delay, self.options.quantizer_speed());
        let canvas = self
            .canvas
            .as_mut()
            .ok_or_else(|| GifmakeError::EncodeError("GIF writer already finished".to_string()))?;

        if (width, height) != (canvas.width, canvas.height) {
            return Err(GifmakeError::EncodeError(format!(
                "frame {frame_number} is {width}x{height} but the animation is {}x{}",
                canvas.width, canvas.height,
            )));
        }

        let mut pixels = image.to_rgba8().into_raw();
        let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, speed);
        frame.delay = delay;
        canvas.encoder.write_frame(&frame)?;

        self.frames_written += 1;
        Ok(())
    }

    /// Finalize the animation and move it to its destination.
    ///
    /// Returns the size of the written file in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GifmakeError::EncodeError`] if no frame was written, or an
    /// I/O error if the file cannot be flushed or moved into place.
    pub fn finish(mut self) -> Result<u64, GifmakeError> {
        let canvas = self
            .canvas
            .take()
            .ok_or_else(|| GifmakeError::EncodeError("no frames were written".to_string()))?;

        // `into_inner` writes the GIF trailer.
        let buffered = canvas.encoder.into_inner()?;
        let staging = buffered.into_inner().map_err(|error| error.into_error())?;
        let bytes = persist_staged(staging, &self.destination)?;

        log::info!(
            "Wrote {} frames ({bytes} bytes) to {}",
            self.frames_written,
            self.destination.display(),
        );
        Ok(bytes)
    }

    fn open_canvas(&mut self, width: u16, height: u16) -> Result<Canvas, GifmakeError> {
        let staging = self
            .staging
            .take()
            .ok_or_else(|| GifmakeError::EncodeError("GIF writer already consumed".to_string()))?;

        let mut encoder = Encoder::new(BufWriter::new(staging), width, height, &[])?;
        encoder.set_repeat(self.options.repeat_mode())?;

        Ok(Canvas {
            encoder,
            width,
            height,
        })
    }
}

/// Frame dimensions as GIF's 16-bit sizes.
fn gif_dimensions(image: &DynamicImage) -> Result<(u16, u16), GifmakeError> {
    let too_large = || {
        GifmakeError::EncodeError(format!(
            "frame is {}x{} but GIF frames are limited to {}x{}",
            image.width(),
            image.height(),
            u16::MAX,
            u16::MAX,
        ))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

/// Encode a complete sequence of frames to `path`.
///
/// Returns the size of the written file in bytes.
///
/// # Errors
///
/// See [`GifWriter::write_frame`] and [`GifWriter::finish`].
pub fn encode_gif<P: AsRef<Path>>(
    path: P,
    frames: &[DynamicImage],
    frames_per_second: u32,
    options: &GifOptions,
) -> Result<u64, GifmakeError> {
    let mut writer = GifWriter::create(path, frames_per_second, options)?;
    for frame in frames {
        writer.write_frame(frame)?;
    }
    writer.finish()
}

impl Drop for GifWriter {
    fn drop(&mut self) {
        if self.canvas.is_some() || self.staging.is_some() {
            log::debug!(
                "Discarding unfinished GIF for {} after {} frames",
                self.destination.display(),
                self.frames_written,
            );
        }
    }
}
