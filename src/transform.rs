//! Per-frame transforms applied between decoding and encoding.
//!
//! A [`FrameTransform`] runs two steps in a fixed order:
//!
//! 1. **Downscale**: when a maximum edge length is set and the frame's
//!    longest edge exceeds it, both axes are scaled by
//!    `max_edge / longest_edge`. Each axis is rounded to the nearest pixel
//!    (ties to even) on its own, so the aspect ratio may drift by up to one pixel per axis.
//!    Frames are never upscaled.
//! 2. **Drop alpha**: four-channel frames lose their alpha channel. Frames
//!    with one, two, or three channels pass through.
//!
//! Transforms read nothing but the frame they are given, so frames can be
//! processed in any order or in parallel (see the `rayon` feature).

use image::{ColorType, DynamicImage, imageops::FilterType};

/// Resampling filter used when downscaling.
const DOWNSCALE_FILTER: FilterType = FilterType::Triangle;

/// Target dimensions for a `width`×`height` frame under a longest-edge limit.
///
/// Returns the input unchanged when the frame already fits.
pub fn scaled_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max_edge == 0 || longest <= max_edge {
        return (width, height);
    }

    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled = |edge: u32| ((f64::from(edge) * scale).round_ties_even() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Shrink `frame` so its longest edge is at most `max_edge`.
pub fn downscale(frame: DynamicImage, max_edge: u32) -> DynamicImage {
    let (width, height) = (frame.width(), frame.height());
    let (target_width, target_height) = scaled_dimensions(width, height, max_edge);
    if (target_width, target_height) == (width, height) {
        return frame;
    }

    log::trace!("Downscaling {width}x{height} -> {target_width}x{target_height}");
    frame.resize_exact(target_width, target_height, DOWNSCALE_FILTER)
}

/// Drop the alpha channel of a four-channel frame, keeping its bit depth.
pub fn drop_alpha(frame: DynamicImage) -> DynamicImage {
    match frame.color() {
        ColorType::Rgba8 => DynamicImage::ImageRgb8(frame.to_rgb8()),
        ColorType::Rgba16 => DynamicImage::ImageRgb16(frame.to_rgb16()),
        ColorType::Rgba32F => DynamicImage::ImageRgb32F(frame.to_rgb32f()),
        _ => frame,
    }
}

/// The configured transform pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTransform {
    /// Longest-edge limit in pixels. `None` disables downscaling.
    pub max_size: Option<u32>,
}

impl FrameTransform {
    /// Create a transform with the given longest-edge limit.
    pub fn new(max_size: Option<u32>) -> Self {
        Self { max_size }
    }

    /// Run the pipeline on one frame.
    pub fn apply(&self, frame: DynamicImage) -> DynamicImage {
        let frame = match self.max_size {
            Some(max_edge) => downscale(frame, max_edge),
            None => frame,
        };
        drop_alpha(frame)
    }

    /// Run the pipeline on every frame sequentially, preserving order.
    pub fn apply_all(&self, frames: Vec<DynamicImage>) -> Vec<DynamicImage> {
        frames.into_iter().map(|frame| self.apply(frame)).collect()
    }
}
