//! Raster work in pure Rust, behind a swappable surface.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode upload** | `image::load_from_memory` |
//! | **Crop** | display → natural scaling, then `drawImage`-style copy |
//! | **Composite** | CSS filter math + quarter-turn/flip/arbitrary rotation |
//! | **Compression estimate** | PNG reference encode, then JPEG at quality 92 |
//! | **Export** | PNG encode of the composited image |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry and size math (unit testable)
//! - **Parameters**: Data structures describing raster operations
//! - **Filters**: Per-pixel filter chain math
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod filters;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageHandle, RasterBackend};
pub use calculations::{
    NaturalRect, bytes_to_kilobytes, clip_to_bounds, normalize_rotation, reduction_percent,
    scale_crop_rect,
};
pub use operations::{
    CompressionResult, ExportArtifact, crop, estimate_compression, export, plan_crop,
};
pub use params::{CropRect, DisplaySize, DrawParams, EncodeFormat, PixelRect, Quality};
pub use rust_backend::RustBackend;
