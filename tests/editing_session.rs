//! End-to-end editing sessions on the pure-Rust raster backend.
//!
//! Run with: cargo test --test editing_session -- --nocapture

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use retouch::config::{CommitPolicy, load_config};
use retouch::imaging::{CropRect, DisplaySize, EncodeFormat, RustBackend};
use retouch::output::{format_compression_result, format_history_status, format_image_info};
use retouch::shortcuts::{Key, KeyPress, Modifiers};
use retouch::{Adjustment, AdjustmentState, EditError, Editor, Flip};
use std::io::Cursor;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Deterministic opaque noise, PNG-encoded.
fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x2545_F491;
    let pixels = RgbaImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let [r, g, b, _] = seed.to_le_bytes();
        Rgba([r, g, b, 255])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn session(width: u32, height: u32) -> Editor<RustBackend> {
    let mut editor = Editor::new(RustBackend::new());
    editor.upload_bytes(&noise_png(width, height)).unwrap();
    editor
}

#[test]
fn full_session_edit_crop_undo_compress_export() {
    init_tracing();
    let mut editor = session(160, 120);
    assert_eq!(
        format_image_info(editor.image_info().unwrap()),
        "160×120px"
    );

    // One slider drag, one preset, one rotation
    for value in [105.0, 115.0, 125.0] {
        editor.set_adjustment(Adjustment::Brightness, value);
    }
    assert!(editor.finish_gesture());
    editor.apply_preset("cool").unwrap();
    editor.rotate(90);
    assert_eq!(editor.undo_count(), 3);

    // Crop the left half as shown at half size
    editor.start_crop().unwrap();
    editor.set_crop_rect(CropRect::new(0.0, 0.0, 40.0, 60.0));
    let cropped = editor.apply_crop(DisplaySize::new(80.0, 60.0)).unwrap();
    assert_eq!(cropped.as_tuple(), (80, 120));
    assert_eq!(editor.state().rotation, 90);

    // Rendered output is rotated
    let rendered = editor.render().unwrap();
    assert_eq!(rendered.dimensions().as_tuple(), (120, 80));

    let result = editor.compress().unwrap();
    assert!(result.original_size_bytes > 0);
    assert!(result.reduction_percent >= 0.0);
    assert!(result.bytes.starts_with(&[0xFF, 0xD8]));
    assert_eq!(format_compression_result(&result)[0], "Compression Result");

    let artifact = editor.export().unwrap();
    assert_eq!(artifact.format, EncodeFormat::Png);
    let exported = image::load_from_memory(&artifact.bytes).unwrap();
    assert_eq!((exported.width(), exported.height()), (120, 80));

    // Walk all the way back to the upload
    while editor.undo() {}
    assert_eq!(editor.state(), AdjustmentState::default());
    assert_eq!(editor.baseline(), editor.original());
    assert_eq!(
        format_history_status(editor.undo_count(), editor.redo_count()),
        "0 undo steps, 4 redo steps"
    );
}

#[test]
fn keyboard_drives_undo_redo_and_export() {
    init_tracing();
    let mut editor = session(32, 32);
    editor.flip_x();
    assert_eq!(editor.state().flip_x, Flip::Mirrored);

    let ctrl_z = KeyPress::new(Key::from_dom("z"), Modifiers::ctrl());
    let cmd_shift_z = KeyPress::new(Key::from_dom("Z"), Modifiers::meta().with_shift());
    let ctrl_s = KeyPress::new(Key::from_dom("s"), Modifiers::ctrl());

    editor.handle_key(&ctrl_z).unwrap();
    assert_eq!(editor.state().flip_x, Flip::Normal);
    editor.handle_key(&cmd_shift_z).unwrap();
    assert_eq!(editor.state().flip_x, Flip::Mirrored);

    let artifact = editor.handle_key(&ctrl_s).unwrap().unwrap();
    assert_eq!(artifact.filename, "edited-image.png");
}

#[test]
fn invalid_upload_and_crop_leave_session_intact() {
    init_tracing();
    let mut editor = session(64, 64);
    editor.rotate(180);

    let err = editor.upload_bytes(b"not an image").unwrap_err();
    assert!(matches!(err, EditError::Decode(_)));
    assert_eq!(editor.state().rotation, 180);

    editor.start_crop().unwrap();
    editor.set_crop_rect(CropRect::new(0.0, 0.0, 0.0, 10.0));
    let err = editor.apply_crop(DisplaySize::new(64.0, 64.0)).unwrap_err();
    assert!(matches!(err, EditError::InvalidCrop(_)));
    assert!(editor.is_cropping());
    assert_eq!(editor.undo_count(), 1);
}

#[test]
fn config_from_disk_changes_session_behavior() {
    init_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("config.toml"),
        r#"
[compression]
quality = 40

[export]
compressed_filename = "small.jpg"

[history]
commit = "every-change"

[presets.noir]
contrast = 160
saturate = 0
"#,
    )
    .unwrap();

    let config = load_config(tmp.path()).unwrap();
    assert_eq!(config.history.commit, CommitPolicy::EveryChange);

    let mut editor = Editor::with_config(RustBackend::new(), config);
    editor.upload_bytes(&noise_png(48, 48)).unwrap();

    editor.set_adjustment(Adjustment::Hue, 30.0);
    editor.set_adjustment(Adjustment::Hue, 60.0);
    assert_eq!(editor.undo_count(), 2);

    editor.apply_preset("noir").unwrap();
    assert_eq!(editor.state().contrast, 160.0);
    assert_eq!(editor.state().hue, 60.0);

    let result = editor.compress().unwrap();
    assert_eq!(result.filename, "small.jpg");
    assert!(result.compressed_size_bytes < result.original_size_bytes);
}
