//! Output naming tests.

use std::fs;

use gifmake::output::normalize_output_name;
use gifmake::{GifmakeError, OutputTarget};
use tempfile::TempDir;

#[test]
fn normalize_appends_extension() {
    assert_eq!(normalize_output_name("intro").unwrap(), "intro.gif");
}

#[test]
fn normalize_keeps_existing_extension() {
    assert_eq!(normalize_output_name("intro.gif").unwrap(), "intro.gif");
    assert_eq!(normalize_output_name("intro.GIF").unwrap(), "intro.GIF");
}

#[test]
fn normalize_rejects_foreign_extension() {
    match normalize_output_name("intro.png") {
        Err(GifmakeError::InvalidOutputName { name, extension }) => {
            assert_eq!(name, "intro.png");
            assert_eq!(extension, ".png");
        }
        other => panic!("Expected InvalidOutputName, got: {other:?}"),
    }
}

#[test]
fn explicit_name_lands_in_frame_directory() {
    let dir = TempDir::new().unwrap();
    let target = OutputTarget::new(dir.path(), Some("intro")).unwrap();

    assert_eq!(target.file_name(), "intro.gif");
    assert_eq!(target.directory(), dir.path());
    assert_eq!(target.path(), dir.path().join("intro.gif"));
}

#[test]
fn explicit_name_with_and_without_extension_match() {
    let dir = TempDir::new().unwrap();
    let bare = OutputTarget::new(dir.path(), Some("clip")).unwrap();
    let suffixed = OutputTarget::new(dir.path(), Some("clip.gif")).unwrap();
    assert_eq!(bare.path(), suffixed.path());
}

#[test]
fn default_name_is_directory_leaf() {
    let root = TempDir::new().unwrap();
    let frames = root.path().join("walk-cycle");
    fs::create_dir(&frames).unwrap();

    let target = OutputTarget::new(&frames, None).unwrap();
    assert_eq!(target.file_name(), "walk-cycle.gif");
    assert_eq!(target.path(), frames.join("walk-cycle.gif"));
}

#[test]
fn default_name_keeps_dotted_directory_names() {
    let root = TempDir::new().unwrap();
    let frames = root.path().join("shots.v2");
    fs::create_dir(&frames).unwrap();

    let target = OutputTarget::new(&frames, None).unwrap();
    assert_eq!(target.file_name(), "shots.v2.gif");
}

#[test]
fn default_name_resolves_relative_components() {
    let root = TempDir::new().unwrap();
    let frames = root.path().join("sprites");
    fs::create_dir_all(frames.join("sub")).unwrap();

    let target = OutputTarget::new(frames.join("sub").join(".."), None).unwrap();
    assert_eq!(target.file_name(), "sprites.gif");
}

#[test]
fn explicit_foreign_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = OutputTarget::new(dir.path(), Some("intro.mp4"));
    assert!(matches!(result, Err(GifmakeError::InvalidOutputName { .. })));
}

#[test]
fn missing_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = OutputTarget::new(dir.path().join("missing"), Some("intro"));
    assert!(matches!(result, Err(GifmakeError::InvalidDirectory { .. })));
}
