//! Text formatting for editor panels.
//!
//! # Output Format
//!
//! ## Compression result
//!
//! ```text
//! Compression Result
//!     Original Size: 2.93 KB
//!     Compressed Size: 1.95 KB
//!     Reduction: 33.33%
//!     Download: compressed.jpg
//! ```
//!
//! ## Adjustments
//!
//! ```text
//! Brightness: 110%
//! Contrast: 120%
//! Saturation: 90%
//! Hue Rotation: 0°
//! Opacity: 100%
//! Rotation: 90°
//! Flip: horizontal
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function is pure and returns lines (or a single line) for
//! whatever surface displays them.

use crate::imaging::{CompressionResult, Dimensions, normalize_rotation};
use crate::state::{Adjustment, AdjustmentState, Flip};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Format the compression modal.
pub fn format_compression_result(result: &CompressionResult) -> Vec<String> {
    vec![
        "Compression Result".to_string(),
        format!("{}Original Size: {:.2} KB", indent(1), result.original_kb()),
        format!("{}Compressed Size: {:.2} KB", indent(1), result.compressed_kb()),
        format!("{}Reduction: {:.2}%", indent(1), result.reduction_percent),
        format!("{}Download: {}", indent(1), result.filename),
    ]
}

/// Natural size label, e.g. `800×600px`.
pub fn format_image_info(dims: Dimensions) -> String {
    format!("{}\u{00d7}{}px", dims.width, dims.height)
}

/// One line per slider, then rotation and flips.
///
/// Rotation is shown normalized to `[0, 360)`.
pub fn format_adjustment_panel(state: &AdjustmentState) -> Vec<String> {
    let mut lines: Vec<String> = Adjustment::ALL
        .into_iter()
        .map(|adjustment| {
            format!(
                "{}: {}{}",
                adjustment.label(),
                state.get(adjustment),
                adjustment.unit()
            )
        })
        .collect();

    lines.push(format!(
        "Rotation: {}\u{00b0}",
        normalize_rotation(state.rotation)
    ));
    let flips = match (state.flip_x, state.flip_y) {
        (Flip::Normal, Flip::Normal) => "none",
        (Flip::Mirrored, Flip::Normal) => "horizontal",
        (Flip::Normal, Flip::Mirrored) => "vertical",
        (Flip::Mirrored, Flip::Mirrored) => "horizontal + vertical",
    };
    lines.push(format!("Flip: {flips}"));
    lines
}

/// Summary of the undo and redo stacks.
///
/// ```text
/// 3 undo steps, 1 redo step
/// ```
pub fn format_history_status(undo: usize, redo: usize) -> String {
    format!(
        "{}, {}",
        plural(undo, "undo step"),
        plural(redo, "redo step")
    )
}
