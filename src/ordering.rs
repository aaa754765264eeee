//! Numeric ordering of frame files.
//!
//! Frames are ordered by the single integer embedded in each file name, so
//! that `2.png` comes before `10.png`. There is no lexicographic fallback: a
//! name with zero or several digit runs makes the whole ordering fail.
//!
//! # Example
//!
//! ```
//! use gifmake::ordering::order_paths;
//!
//! let ordered = order_paths(vec!["1.png", "10.png", "2.png", "100.png"])?;
//! assert_eq!(ordered, vec!["1.png", "2.png", "10.png", "100.png"]);
//! # Ok::<(), gifmake::GifmakeError>(())
//! ```

use std::path::Path;

use crate::error::GifmakeError;

/// Split a string into its maximal runs of ASCII decimal digits.
pub fn digit_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = None;

    for (index, character) in text.char_indices() {
        match (character.is_ascii_digit(), start) {
            (true, None) => start = Some(index),
            (false, Some(run_start)) => {
                runs.push(&text[run_start..index]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(run_start) = start {
        runs.push(&text[run_start..]);
    }

    runs
}

/// Extract the single integer embedded in `name`.
///
/// # Errors
///
/// Returns [`GifmakeError::AmbiguousFilename`] if `name` contains no digit
/// run, more than one digit run, or a run too large for a `u64`.
pub fn extract_frame_number(name: &str) -> Result<u64, GifmakeError> {
    let ambiguous = |reason: String| GifmakeError::AmbiguousFilename {
        name: name.to_string(),
        reason,
    };

    match digit_runs(name).as_slice() {
        [run] => run
            .parse::<u64>()
            .map_err(|_| ambiguous(format!("frame number {run} does not fit in 64 bits"))),
        [] => Err(ambiguous("no digits found".to_string())),
        runs => Err(ambiguous(format!("found {} separate digit runs", runs.len()))),
    }
}

/// The part of a path that carries its frame number: the file stem, or the
/// whole string when the path has no stem.
fn numbering_key(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Order paths ascending by the frame number in their file stem.
///
/// Equal numbers (`01.png` and `1.jpg`) are ordered by the full path string
/// so the result never depends on input order.
///
/// # Errors
///
/// Fails with [`GifmakeError::AmbiguousFilename`], naming the full path, on
/// the first path whose stem does not hold exactly one digit run. No partial
/// ordering is returned.
pub fn order_paths<I, P>(paths: I) -> Result<Vec<P>, GifmakeError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut keyed = paths
        .into_iter()
        .map(|path| {
            let number = extract_frame_number(&numbering_key(path.as_ref())).map_err(
                |error| match error {
                    GifmakeError::AmbiguousFilename { reason, .. } => {
                        GifmakeError::AmbiguousFilename {
                            name: path.as_ref().display().to_string(),
                            reason,
                        }
                    }
                    other => other,
                },
            )?;
            Ok((number, path))
        })
        .collect::<Result<Vec<(u64, P)>, GifmakeError>>()?;

    keyed.sort_by(|(left_number, left), (right_number, right)| {
        left_number
            .cmp(right_number)
            .then_with(|| left.as_ref().as_os_str().cmp(right.as_ref().as_os_str()))
    });

    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}
