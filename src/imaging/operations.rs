//! High-level raster operations: crop, compression estimate, export.
//!
//! These functions combine calculations with backend execution. None of
//! them touch edit history; the [`Editor`](crate::editor::Editor) decides
//! what to commit with their results.

use super::backend::{ImageHandle, RasterBackend};
use super::calculations::{bytes_to_kilobytes, clip_to_bounds, reduction_percent, scale_crop_rect};
use super::params::{CropRect, DisplaySize, DrawParams, EncodeFormat, PixelRect, Quality};
use crate::error::{EditError, EditResult};

/// Plan a crop without executing it.
///
/// Scales `rect` from display space into the baseline's natural pixels and
/// clips it to the bitmap.
pub fn plan_crop(
    baseline: &ImageHandle,
    rect: &CropRect,
    displayed: DisplaySize,
) -> EditResult<PixelRect> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(EditError::invalid_crop(format!(
            "selection must have positive size, got {}x{}",
            rect.width, rect.height
        )));
    }
    if !(displayed.width > 0.0 && displayed.height > 0.0) {
        return Err(EditError::invalid_crop(
            "displayed image size must be positive",
        ));
    }

    let natural = baseline.dimensions().as_tuple();
    let scaled = scale_crop_rect(rect, displayed, natural);
    clip_to_bounds(scaled, natural)
        .ok_or_else(|| EditError::invalid_crop("selection does not cover any pixels"))
}

/// Crop the baseline to the display-space selection.
///
/// Produces a new bitmap at natural resolution. Fails with
/// [`EditError::InvalidCrop`] when there is no baseline, no selection, or the
/// selection is empty.
#[tracing::instrument(skip(backend, baseline))]
pub fn crop(
    backend: &impl RasterBackend,
    baseline: Option<&ImageHandle>,
    rect: Option<&CropRect>,
    displayed: DisplaySize,
) -> EditResult<ImageHandle> {
    let baseline = baseline.ok_or_else(|| EditError::invalid_crop("no image loaded"))?;
    let rect = rect.ok_or_else(|| EditError::invalid_crop("no selection"))?;

    let source = plan_crop(baseline, rect, displayed)?;
    let cropped = backend.draw(baseline, &DrawParams::natural(source))?;
    tracing::debug!(?source, "cropped baseline");
    Ok(cropped)
}

/// Outcome of a compression estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub original_size_bytes: u64,
    pub compressed_size_bytes: u64,
    /// `(original - compressed) / original * 100`, two decimals.
    pub reduction_percent: f64,
    /// The compressed encode, ready to download.
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl CompressionResult {
    pub fn original_kb(&self) -> f64 {
        bytes_to_kilobytes(self.original_size_bytes)
    }

    pub fn compressed_kb(&self) -> f64 {
        bytes_to_kilobytes(self.compressed_size_bytes)
    }
}

/// Estimate how much a lossy re-encode saves.
///
/// `rendered` should already be the composited image. It is encoded once as
/// PNG for the reference size, then, after that returns, once as JPEG at
/// `quality`.
#[tracing::instrument(skip(backend, rendered))]
pub fn estimate_compression(
    backend: &impl RasterBackend,
    rendered: Option<&ImageHandle>,
    quality: Quality,
    filename: &str,
) -> EditResult<CompressionResult> {
    let rendered = rendered.ok_or(EditError::EmptyImage)?;

    let reference = backend.encode(rendered, EncodeFormat::Png, quality)?;
    let compressed = backend.encode(rendered, EncodeFormat::Jpeg, quality)?;

    let original_size_bytes = reference.len() as u64;
    let compressed_size_bytes = compressed.len() as u64;
    let result = CompressionResult {
        original_size_bytes,
        compressed_size_bytes,
        reduction_percent: reduction_percent(original_size_bytes, compressed_size_bytes),
        bytes: compressed,
        filename: filename.to_string(),
    };
    tracing::info!(
        original = original_size_bytes,
        compressed = compressed_size_bytes,
        reduction = result.reduction_percent,
        "compression estimated"
    );
    Ok(result)
}

/// A downloadable file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: EncodeFormat,
    pub bytes: Vec<u8>,
}

/// Encode the composited image losslessly for download.
#[tracing::instrument(skip(backend, rendered))]
pub fn export(
    backend: &impl RasterBackend,
    rendered: Option<&ImageHandle>,
    filename: &str,
) -> EditResult<ExportArtifact> {
    let rendered = rendered.ok_or(EditError::EmptyImage)?;
    let bytes = backend.encode(rendered, EncodeFormat::Png, Quality::default())?;
    Ok(ExportArtifact {
        filename: filename.to_string(),
        format: EncodeFormat::Png,
        bytes,
    })
}
