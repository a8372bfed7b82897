//! Pure Rust raster backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Draw (crop + optional scale) | `DynamicImage::crop_imm` + `imageops::resize` (`Lanczos3`) |
//! | Filter chain | [`filters::apply_filter_chain`](super::filters::apply_filter_chain) (rayon) |
//! | Quarter-turn rotation, flips | `imageops::{rotate90, rotate180, rotate270, flip_horizontal, flip_vertical}` |
//! | Arbitrary rotation | bilinear inverse mapping into the rotated bounding box (rayon) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, alpha flattened onto black |

use super::backend::{BackendError, ImageHandle, RasterBackend};
use super::calculations::rotated_bounds;
use super::filters::apply_filter_chain;
use super::params::{DrawParams, EncodeFormat, Quality};
use crate::render::{TransformOp, VisualDescription};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use rayon::prelude::*;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one transform step to pixels.
fn apply_transform(image: RgbaImage, op: &TransformOp) -> RgbaImage {
    match *op {
        TransformOp::Rotate { degrees } => match degrees.rem_euclid(360) {
            0 => image,
            90 => imageops::rotate90(&image),
            180 => imageops::rotate180(&image),
            270 => imageops::rotate270(&image),
            other => rotate_arbitrary(&image, other as f64),
        },
        TransformOp::Scale { x, y } => {
            let image = if x < 0 {
                imageops::flip_horizontal(&image)
            } else {
                image
            };
            if y < 0 {
                imageops::flip_vertical(&image)
            } else {
                image
            }
        }
    }
}

/// Rotate clockwise about the center into the enlarged bounding box.
///
/// Pixels with no source are transparent.
fn rotate_arbitrary(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();
    let (out_w, out_h) = rotated_bounds(src_w, src_h, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (src_cx, src_cy) = (src_w as f64 / 2.0, src_h as f64 / 2.0);
    let (out_cx, out_cy) = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    let mut out = RgbaImage::new(out_w, out_h);
    let row_len = out_w as usize * 4;
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 + 0.5 - out_cy;
            for (x, pixel) in row.chunks_mut(4).enumerate() {
                let dx = x as f64 + 0.5 - out_cx;
                // Inverse of the clockwise rotation (y axis points down)
                let sx = dx * cos + dy * sin + src_cx - 0.5;
                let sy = -dx * sin + dy * cos + src_cy - 0.5;
                pixel.copy_from_slice(&sample_bilinear(image, sx, sy));
            }
        });
    out
}

fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let texel = |tx: i64, ty: i64| -> [f64; 4] {
        if tx < 0 || ty < 0 || tx >= w || ty >= h {
            return [0.0; 4];
        }
        let p = image.get_pixel(tx as u32, ty as u32).0;
        [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
    };

    let (a, b) = (texel(x0, y0), texel(x0 + 1, y0));
    let (c, d) = (texel(x0, y0 + 1), texel(x0 + 1, y0 + 1));
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = a[i] + (b[i] - a[i]) * fx;
        let bottom = c[i] + (d[i] - c[i]) * fx;
        out[i] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Drop alpha the way a browser canvas does for JPEG: composite onto black.
fn flatten_onto_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}

impl RasterBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, BackendError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| BackendError::Decode(format!("Failed to decode upload: {e}")))?;
        Ok(ImageHandle::new(image))
    }

    fn draw(&self, source: &ImageHandle, params: &DrawParams) -> Result<ImageHandle, BackendError> {
        let rect = params.source;
        let dims = source.dimensions();
        let in_bounds = rect.sx.checked_add(rect.sw).is_some_and(|r| r <= dims.width)
            && rect.sy.checked_add(rect.sh).is_some_and(|b| b <= dims.height);
        if !in_bounds || rect.sw == 0 || rect.sh == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "source rect {}x{}+{}+{} outside {}x{} bitmap",
                rect.sw, rect.sh, rect.sx, rect.sy, dims.width, dims.height
            )));
        }
        if params.dest_width == 0 || params.dest_height == 0 {
            return Err(BackendError::ProcessingFailed(
                "destination surface must be non-empty".into(),
            ));
        }

        let cropped = source.image().crop_imm(rect.sx, rect.sy, rect.sw, rect.sh);
        let drawn = if (params.dest_width, params.dest_height) == (rect.sw, rect.sh) {
            cropped
        } else {
            cropped.resize_exact(params.dest_width, params.dest_height, FilterType::Lanczos3)
        };
        Ok(ImageHandle::new(drawn))
    }

    fn composite(
        &self,
        source: &ImageHandle,
        description: &VisualDescription,
    ) -> Result<ImageHandle, BackendError> {
        let mut pixels = source.image().to_rgba8();
        apply_filter_chain(&mut pixels, &description.filter_chain);

        // CSS applies the transform list right to left to the element.
        let pixels = description
            .transform
            .iter()
            .rev()
            .fold(pixels, apply_transform);

        Ok(ImageHandle::new(DynamicImage::ImageRgba8(pixels)))
    }

    fn encode(
        &self,
        image: &ImageHandle,
        format: EncodeFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let rgba = image.image().to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut buf = Vec::new();

        match format {
            EncodeFormat::Png => PngEncoder::new(&mut buf).write_image(
                rgba.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            EncodeFormat::Jpeg => {
                let rgb = flatten_onto_black(&rgba);
                let quality = u8::try_from(quality.value()).unwrap_or(100);
                JpegEncoder::new_with_quality(&mut buf, quality).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
        }
        .map_err(|e| BackendError::Encode(format!("{} encode failed: {e}", format.extension())))?;

        Ok(buf)
    }
}
