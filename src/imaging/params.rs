//! Parameter types for raster operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to crop or encode) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 92). Clamped on construction.
//! - [`EncodeFormat`]: Output container for an encode: lossless PNG or lossy JPEG.
//! - [`CropRect`]: A selection in on-screen display coordinates.
//! - [`DisplaySize`]: Size of the rendered image element on screen.
//! - [`PixelRect`]: A rectangle in natural pixel coordinates.
//! - [`DrawParams`]: Full specification for a `drawImage`: source rect + destination size.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Build from a canvas-style `[0, 1]` quality (`0.92` → 92).
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new((fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn as_fraction(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeFormat {
    /// Lossless; quality is ignored.
    Png,
    Jpeg,
}

impl EncodeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EncodeFormat::Png => "png",
            EncodeFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            EncodeFormat::Png => "image/png",
            EncodeFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Crop selection in the on-screen coordinates of the rendered image element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// On-screen size of the rendered image element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle in natural pixel coordinates of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub sx: u32,
    pub sy: u32,
    pub sw: u32,
    pub sh: u32,
}

/// Parameters for a `drawImage(source, sx, sy, sw, sh, 0, 0, dw, dh)` onto a
/// fresh `dw × dh` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawParams {
    pub source: PixelRect,
    pub dest_width: u32,
    pub dest_height: u32,
}

impl DrawParams {
    /// Copy `source` at its natural resolution.
    pub fn natural(source: PixelRect) -> Self {
        Self {
            source,
            dest_width: source.sw,
            dest_height: source.sh,
        }
    }
}
