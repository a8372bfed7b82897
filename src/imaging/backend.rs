//! Raster surface trait and shared types.
//!
//! The [`RasterBackend`] trait defines the four operations every raster
//! surface must support: decode, draw, composite, and encode. The crop and
//! compression engines only ever talk to this trait, so the rest of the
//! codebase is backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. A browser embedding can provide its own backend over a 2D canvas.

use crate::render::VisualDescription;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::params::{DrawParams, EncodeFormat, Quality};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Natural pixel size of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Shared, immutable reference to a decoded bitmap.
///
/// Cloning is cheap. Equality is identity: two handles are equal only when
/// they point at the same bitmap, which is what history snapshots compare.
#[derive(Clone)]
pub struct ImageHandle {
    image: Arc<DynamicImage>,
}

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl Eq for ImageHandle {}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self.dimensions();
        write!(
            f,
            "ImageHandle({}x{} @ {:p})",
            dims.width,
            dims.height,
            Arc::as_ptr(&self.image)
        )
    }
}

/// Trait for raster surfaces.
///
/// Every backend must implement all four operations so the crop, compression
/// and export engines work unchanged on top of any of them.
pub trait RasterBackend {
    /// Decode uploaded bytes into a bitmap.
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, BackendError>;

    /// `drawImage(source, sx, sy, sw, sh, 0, 0, dw, dh)` onto a fresh surface.
    fn draw(&self, source: &ImageHandle, params: &DrawParams) -> Result<ImageHandle, BackendError>;

    /// Rasterize `source` with a filter chain and transform applied.
    fn composite(
        &self,
        source: &ImageHandle,
        description: &VisualDescription,
    ) -> Result<ImageHandle, BackendError>;

    /// Encode a bitmap. `quality` only matters for lossy formats.
    fn encode(
        &self,
        image: &ImageHandle,
        format: EncodeFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
