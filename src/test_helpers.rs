//! Shared test utilities: synthetic bitmaps and encoded uploads.
//!
//! Everything here is deterministic so pixel assertions are stable.

use crate::imaging::ImageHandle;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Opaque image whose red channel ramps along x and green along y.
pub fn gradient_image(width: u32, height: u32) -> ImageHandle {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    });
    ImageHandle::new(DynamicImage::ImageRgba8(pixels))
}

/// Opaque per-pixel noise from a fixed-seed xorshift generator.
///
/// Compresses badly as PNG, which makes lossy savings visible.
pub fn noise_image(width: u32, height: u32) -> ImageHandle {
    let mut seed: u32 = 0x9E37_79B9;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };
    let pixels = RgbaImage::from_fn(width, height, |_, _| {
        let [r, g, b, _] = next().to_le_bytes();
        Rgba([r, g, b, 255])
    });
    ImageHandle::new(DynamicImage::ImageRgba8(pixels))
}

/// PNG-encoded gradient, as an upload would arrive.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    gradient_image(width, height)
        .image()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn noise_is_deterministic() {
    let a = noise_image(4, 4).image().to_rgba8();
    let b = noise_image(4, 4).image().to_rgba8();
    assert_eq!(a, b);
    assert_ne!(a.get_pixel(0, 0), a.get_pixel(1, 0));
}
