//! GIF encoder tests.
//!
//! Written files are read back with the `gif` crate's decoder.

use std::fs::{self, File};
use std::path::Path;

use gifmake::{GifOptions, GifWriter, GifmakeError, encode_gif, gif::MAX_QUANTIZER_SPEED};
use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;

fn solid_frame(width: u32, height: u32, shade: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([shade, 255 - shade, 64])))
}

struct DecodedGif {
    width: u16,
    height: u16,
    delays: Vec<u16>,
}

fn decode(path: &Path) -> DecodedGif {
    let file = File::open(path).expect("GIF was not written");
    let mut decoder = gif::DecodeOptions::new()
        .read_info(file)
        .expect("Failed to read GIF header");
    let (width, height) = (decoder.width(), decoder.height());

    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().expect("Failed to read GIF frame") {
        delays.push(frame.delay);
    }
    DecodedGif {
        width,
        height,
        delays,
    }
}

/// The loop count stored in the NETSCAPE2.0 application extension, if any.
fn netscape_loop_count(path: &Path) -> Option<u16> {
    let bytes = fs::read(path).unwrap();
    let marker = b"NETSCAPE2.0";
    let position = bytes.windows(marker.len()).position(|window| window == marker)?;
    let block = &bytes[position + marker.len()..];
    // Sub-block: size 3, id 1, little-endian count.
    assert_eq!(&block[..2], &[3, 1]);
    Some(u16::from_le_bytes([block[2], block[3]]))
}

fn leftover_files(directory: &Path) -> Vec<String> {
    fs::read_dir(directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// ── GifOptions ─────────────────────────────────────────────────────

#[test]
fn gif_options_defaults() {
    let options = GifOptions::new();
    assert_eq!(options.repeat, None);
    assert_eq!(options.speed, 10);
    assert_eq!(options, GifOptions::default());
}

#[test]
fn gif_options_speed_is_clamped() {
    assert_eq!(GifOptions::new().with_speed(0).speed, 1);
    assert_eq!(GifOptions::new().with_speed(99).speed, MAX_QUANTIZER_SPEED);
    assert_eq!(GifOptions::new().with_speed(15).speed, 15);
}

// ── GifWriter ──────────────────────────────────────────────────────

#[test]
fn writer_clamps_out_of_range_speed_fields() {
    let dir = TempDir::new().unwrap();

    for speed in [0, -4, 50] {
        let path = dir.path().join(format!("speed{speed}.gif"));
        let mut options = GifOptions::new();
        options.speed = speed;

        let mut writer = GifWriter::create(&path, 10, &options).unwrap();
        writer.write_frame(&solid_frame(4, 4, 90)).unwrap();
        writer.finish().unwrap();

        assert_eq!(decode(&path).delays, vec![10]);
    }
}


#[test]
fn writer_encodes_frames_in_order_with_delay() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.gif");

    let mut writer = GifWriter::create(&path, 10, &GifOptions::new()).unwrap();
    assert_eq!(writer.frame_delay(), 10);
    for shade in [0, 100, 200] {
        writer.write_frame(&solid_frame(8, 6, shade)).unwrap();
    }
    assert_eq!(writer.frames_written(), 3);
    let bytes = writer.finish().unwrap();

    assert_eq!(bytes, fs::metadata(&path).unwrap().len());
    let decoded = decode(&path);
    assert_eq!((decoded.width, decoded.height), (8, 6));
    assert_eq!(decoded.delays, vec![10, 10, 10]);
}

#[test]
fn writer_loops_forever_by_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loop.gif");
    encode_gif(&path, &[solid_frame(4, 4, 1), solid_frame(4, 4, 2)], 30, &GifOptions::new())
        .unwrap();

    assert_eq!(netscape_loop_count(&path), Some(0));
}

#[test]
fn writer_honours_finite_repeat() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("twice.gif");
    let options = GifOptions::new().with_repeat(Some(2));
    encode_gif(&path, &[solid_frame(4, 4, 1), solid_frame(4, 4, 2)], 30, &options).unwrap();

    assert_eq!(netscape_loop_count(&path), Some(2));
}

#[test]
fn writer_accepts_rgba_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rgba.gif");
    let frame = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        5,
        5,
        image::Rgba([10, 20, 30, 0]),
    ));
    encode_gif(&path, &[frame], 1, &GifOptions::new()).unwrap();

    assert_eq!(decode(&path).delays, vec![100]);
}

#[test]
fn writer_rejects_mismatched_frame_size() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.gif");

    let mut writer = GifWriter::create(&path, 30, &GifOptions::new()).unwrap();
    writer.write_frame(&solid_frame(8, 8, 0)).unwrap();
    match writer.write_frame(&solid_frame(9, 8, 0)) {
        Err(GifmakeError::EncodeError(message)) => {
            assert!(message.contains("frame 2 is 9x8"), "got: {message}");
        }
        other => panic!("Expected EncodeError, got: {other:?}"),
    }
}

#[test]
fn writer_without_frames_fails_to_finish() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.gif");

    let writer = GifWriter::create(&path, 30, &GifOptions::new()).unwrap();
    assert!(matches!(
        writer.finish(),
        Err(GifmakeError::EncodeError(_))
    ));
    assert!(!path.exists());
}

#[test]
fn dropped_writer_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abandoned.gif");

    {
        let mut writer = GifWriter::create(&path, 30, &GifOptions::new()).unwrap();
        writer.write_frame(&solid_frame(4, 4, 0)).unwrap();
        assert!(!path.exists(), "output visible before finish");
    }

    assert!(leftover_files(dir.path()).is_empty());
}

#[test]
fn dropped_writer_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keep.gif");
    fs::write(&path, b"previous").unwrap();

    {
        let mut writer = GifWriter::create(&path, 30, &GifOptions::new()).unwrap();
        writer.write_frame(&solid_frame(4, 4, 0)).unwrap();
    }

    assert_eq!(fs::read(&path).unwrap(), b"previous");
    assert_eq!(leftover_files(dir.path()), vec!["keep.gif"]);
}

#[test]
fn finish_replaces_previous_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("replace.gif");
    fs::write(&path, b"previous").unwrap();

    encode_gif(&path, &[solid_frame(4, 4, 0)], 30, &GifOptions::new()).unwrap();

    assert_eq!(decode(&path).delays.len(), 1);
    assert_eq!(leftover_files(dir.path()), vec!["replace.gif"]);
}

#[test]
fn writer_rejects_oversized_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.gif");
    let frame = DynamicImage::ImageRgb8(RgbImage::new(70_000, 1));

    let mut writer = GifWriter::create(&path, 30, &GifOptions::new()).unwrap();
    assert!(matches!(
        writer.write_frame(&frame),
        Err(GifmakeError::EncodeError(_))
    ));
}

#[cfg(unix)]
#[test]
fn finished_gif_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("perm.gif");
    encode_gif(&path, &[solid_frame(2, 2, 0)], 30, &GifOptions::new()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}
