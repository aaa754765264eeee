//! Parallel frame transforms.
//!
//! This module provides [`parallel_transform_frames`] which spreads the
//! [`FrameTransform`] pipeline across rayon's global thread pool. Frames are
//! independent, so workers share nothing but the read-only transform.
//!
//! The orchestrator calls this instead of
//! [`FrameTransform::apply_all`] when the `rayon` feature is enabled.

use ::rayon::iter::{IntoParallelIterator, ParallelIterator};
use image::DynamicImage;

use crate::transform::FrameTransform;

/// Transform frames in parallel.
///
/// `collect` on an indexed parallel iterator keeps input positions, so the
/// output is in the same (frame-number) order as `frames`.
pub(crate) fn parallel_transform_frames(
    frames: Vec<DynamicImage>,
    transform: &FrameTransform,
) -> Vec<DynamicImage> {
    log::debug!(
        "Transforming {} frames on {} rayon threads",
        frames.len(),
        ::rayon::current_num_threads(),
    );

    frames
        .into_par_iter()
        .map(|frame| transform.apply(frame))
        .collect()
}
