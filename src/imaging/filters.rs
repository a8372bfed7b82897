//! Pixel math for the render pipeline's filter chain.
//!
//! Each [`FilterOp`] follows its CSS Filter Effects Level 1 definition so a
//! rasterized export matches what the browser showed on screen:
//!
//! | Filter | Definition |
//! |---|---|
//! | `brightness(a)` | linear transfer, slope `a` |
//! | `contrast(a)` | linear transfer, slope `a`, intercept `0.5 - 0.5a` |
//! | `saturate(s)` | `feColorMatrix type="saturate"` |
//! | `hue-rotate(θ)` | `feColorMatrix type="hueRotate"` |
//! | `opacity(a)` | alpha multiplied by `a` |
//!
//! Channels are normalized to `[0, 1]` and clamped after every step, as the
//! filter primitives do.

use crate::render::FilterOp;
use image::RgbaImage;
use rayon::prelude::*;

type Matrix3 = [[f32; 3]; 3];

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// A filter step resolved into per-pixel form.
#[derive(Debug, Clone, Copy)]
enum Kernel {
    Linear { slope: f32, intercept: f32 },
    Matrix(Matrix3),
    Alpha(f32),
}

impl Kernel {
    fn from_op(op: FilterOp) -> Option<Self> {
        if op.is_identity() {
            return None;
        }
        Some(match op {
            FilterOp::Brightness(a) => Kernel::Linear {
                slope: a as f32,
                intercept: 0.0,
            },
            FilterOp::Contrast(a) => Kernel::Linear {
                slope: a as f32,
                intercept: 0.5 - 0.5 * a as f32,
            },
            FilterOp::Saturate(s) => Kernel::Matrix(saturate_matrix(s as f32)),
            FilterOp::HueRotate(deg) => Kernel::Matrix(hue_rotate_matrix(deg as f32)),
            FilterOp::Opacity(a) => Kernel::Alpha(a.clamp(0.0, 1.0) as f32),
        })
    }

    fn apply(self, px: &mut [f32; 4]) {
        match self {
            Kernel::Linear { slope, intercept } => {
                for c in &mut px[..3] {
                    *c = (*c * slope + intercept).clamp(0.0, 1.0);
                }
            }
            Kernel::Matrix(m) => {
                let [r, g, b, _] = *px;
                for (row, c) in m.iter().zip(px.iter_mut()) {
                    *c = (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 1.0);
                }
            }
            Kernel::Alpha(a) => px[3] *= a,
        }
    }
}

/// Apply one filter chain to a single normalized RGBA pixel.
pub fn apply_to_pixel(chain: &[FilterOp], rgba: [f32; 4]) -> [f32; 4] {
    let mut px = rgba;
    for kernel in chain.iter().filter_map(|op| Kernel::from_op(*op)) {
        kernel.apply(&mut px);
    }
    px
}

/// Apply a filter chain to every pixel, in place.
///
/// Identity steps are skipped, so the default chain leaves the buffer
/// untouched. Pixels are processed in parallel.
pub fn apply_filter_chain(image: &mut RgbaImage, chain: &[FilterOp]) {
    let kernels: Vec<Kernel> = chain.iter().filter_map(|op| Kernel::from_op(*op)).collect();
    if kernels.is_empty() {
        return;
    }

    image.par_chunks_mut(4).for_each(|pixel| {
        let mut px = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
            pixel[3] as f32 / 255.0,
        ];
        for kernel in &kernels {
            kernel.apply(&mut px);
        }
        for (out, value) in pixel.iter_mut().zip(px) {
            *out = (value * 255.0).round() as u8;
        }
    });
}
