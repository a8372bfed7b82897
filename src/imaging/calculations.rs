//! Pure calculation functions for crop geometry and size reporting.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropRect, DisplaySize, PixelRect};

/// A crop rectangle scaled into natural pixel space, before clipping and rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalRect {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
}

/// Scale a display-space crop rectangle into natural pixel space.
///
/// Each axis is scaled independently by `natural / displayed`.
///
/// # Arguments
/// * `rect` - Selection in on-screen coordinates
/// * `displayed` - On-screen size of the rendered image element
/// * `natural` - Natural bitmap dimensions (width, height)
///
/// # Examples
/// ```
/// # use retouch::imaging::{CropRect, DisplaySize, scale_crop_rect};
/// // 200x100 on screen, 800x400 natural → everything scales by 4
/// let r = scale_crop_rect(
///     &CropRect::new(50.0, 25.0, 100.0, 50.0),
///     DisplaySize::new(200.0, 100.0),
///     (800, 400),
/// );
/// assert_eq!((r.sx, r.sy, r.sw, r.sh), (200.0, 100.0, 400.0, 200.0));
/// ```
pub fn scale_crop_rect(rect: &CropRect, displayed: DisplaySize, natural: (u32, u32)) -> NaturalRect {
    let (nat_w, nat_h) = natural;
    let scale_x = nat_w as f64 / displayed.width;
    let scale_y = nat_h as f64 / displayed.height;

    NaturalRect {
        sx: rect.x * scale_x,
        sy: rect.y * scale_y,
        sw: rect.width * scale_x,
        sh: rect.height * scale_y,
    }
}

/// Clip a natural-space rectangle to the bitmap bounds and round to whole pixels.
///
/// Returns `None` when nothing of the rectangle survives (zero or negative
/// size, or entirely outside the bitmap).
pub fn clip_to_bounds(rect: NaturalRect, bounds: (u32, u32)) -> Option<PixelRect> {
    if !(rect.sw > 0.0 && rect.sh > 0.0) {
        return None;
    }
    let (max_w, max_h) = (bounds.0 as f64, bounds.1 as f64);

    let x0 = rect.sx.max(0.0).round();
    let y0 = rect.sy.max(0.0).round();
    let x1 = (rect.sx + rect.sw).min(max_w).round();
    let y1 = (rect.sy + rect.sh).min(max_h).round();

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(PixelRect {
        sx: x0 as u32,
        sy: y0 as u32,
        sw: (x1 - x0) as u32,
        sh: (y1 - y0) as u32,
    })
}

/// Normalize an accumulated rotation into `[0, 360)` degrees.
pub fn normalize_rotation(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Bounding box of a `width × height` bitmap rotated by `degrees`.
///
/// Quarter turns come out exact (90° and 270° swap the axes).
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (w, h) = (width as f64, height as f64);

    let out_w = (w * cos + h * sin).round().max(1.0) as u32;
    let out_h = (w * sin + h * cos).round().max(1.0) as u32;
    (out_w, out_h)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage saved by the compressed encode, rounded to two decimals.
///
/// Negative when the "compressed" output is larger. An empty original yields 0.
pub fn reduction_percent(original_bytes: u64, compressed_bytes: u64) -> f64 {
    if original_bytes == 0 {
        return 0.0;
    }
    let saved = original_bytes as f64 - compressed_bytes as f64;
    round2(saved / original_bytes as f64 * 100.0)
}

/// Bytes → kilobytes (1 KB = 1024 bytes), rounded to two decimals.
pub fn bytes_to_kilobytes(bytes: u64) -> f64 {
    round2(bytes as f64 / 1024.0)
}
