//! Render pipeline: adjustment state → declarative visual description.
//!
//! [`describe`] is a pure function. It never touches pixels or history; it
//! produces the ordered filter chain and transform list that a display
//! surface applies on top of the current baseline bitmap. In the browser the
//! description becomes a CSS `filter` and `transform` pair
//! ([`VisualDescription::to_css_filter`], [`VisualDescription::to_css_transform`]);
//! [`RustBackend`](crate::imaging::RustBackend) applies the same description
//! to pixels when an export or compression forces rasterization.
//!
//! ## Ordering
//!
//! ```text
//! filter:    brightness → contrast → saturate → hue-rotate → opacity
//! transform: rotate(rotation mod 360) → scale(flip_x, flip_y)
//! ```
//!
//! The filters are not commutative (contrast after brightness differs from
//! brightness after contrast once values clip), so every renderer must use
//! this exact sequence.

use crate::imaging::{Dimensions, ImageHandle, normalize_rotation};
use crate::state::AdjustmentState;
use serde::{Deserialize, Serialize};

/// One step of the filter chain.
///
/// Percentages are stored as fractions (`100%` → `1.0`); hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "kebab-case")]
pub enum FilterOp {
    Brightness(f64),
    Contrast(f64),
    Saturate(f64),
    HueRotate(f64),
    Opacity(f64),
}

impl FilterOp {
    /// Whether this step leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        match *self {
            FilterOp::Brightness(v)
            | FilterOp::Contrast(v)
            | FilterOp::Saturate(v)
            | FilterOp::Opacity(v) => v == 1.0,
            FilterOp::HueRotate(deg) => deg.rem_euclid(360.0) == 0.0,
        }
    }

    fn to_css(self) -> String {
        match self {
            FilterOp::Brightness(v) => format!("brightness({}%)", percent(v)),
            FilterOp::Contrast(v) => format!("contrast({}%)", percent(v)),
            FilterOp::Saturate(v) => format!("saturate({}%)", percent(v)),
            FilterOp::HueRotate(deg) => format!("hue-rotate({deg}deg)"),
            FilterOp::Opacity(v) => format!("opacity({}%)", percent(v)),
        }
    }
}

/// One step of the element transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum TransformOp {
    /// Clockwise rotation in degrees, always within `[0, 360)`.
    Rotate { degrees: i32 },
    /// Sign multipliers; `-1` mirrors the axis.
    Scale { x: i8, y: i8 },
}

impl TransformOp {
    fn to_css(self) -> String {
        match self {
            TransformOp::Rotate { degrees } => format!("rotate({degrees}deg)"),
            TransformOp::Scale { x, y } => format!("scaleX({x}) scaleY({y})"),
        }
    }
}

/// Everything a display surface needs to draw the edited image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDescription {
    pub filter_chain: Vec<FilterOp>,
    pub transform: Vec<TransformOp>,
    /// Natural size of the baseline the description applies to, if one is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_size: Option<Dimensions>,
}

impl VisualDescription {
    /// The description for unedited output.
    pub fn identity(natural_size: Option<Dimensions>) -> Self {
        describe_with_size(&AdjustmentState::default(), natural_size)
    }

    pub fn is_identity(&self) -> bool {
        self.filter_chain.iter().all(FilterOp::is_identity)
            && self.transform.iter().all(|op| match *op {
                TransformOp::Rotate { degrees } => degrees == 0,
                TransformOp::Scale { x, y } => x == 1 && y == 1,
            })
    }

    /// Value for a CSS `filter` property.
    pub fn to_css_filter(&self) -> String {
        join_css(self.filter_chain.iter().map(|op| op.to_css()))
    }

    /// Value for a CSS `transform` property.
    pub fn to_css_transform(&self) -> String {
        join_css(self.transform.iter().map(|op| op.to_css()))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Derive the visual description of `state` applied over `baseline`.
pub fn describe(state: &AdjustmentState, baseline: Option<&ImageHandle>) -> VisualDescription {
    describe_with_size(state, baseline.map(ImageHandle::dimensions))
}

fn describe_with_size(state: &AdjustmentState, natural_size: Option<Dimensions>) -> VisualDescription {
    VisualDescription {
        filter_chain: vec![
            FilterOp::Brightness(state.brightness / 100.0),
            FilterOp::Contrast(state.contrast / 100.0),
            FilterOp::Saturate(state.saturate / 100.0),
            FilterOp::HueRotate(state.hue),
            FilterOp::Opacity(state.opacity / 100.0),
        ],
        transform: vec![
            TransformOp::Rotate {
                degrees: normalize_rotation(state.rotation),
            },
            TransformOp::Scale {
                x: state.flip_x.sign(),
                y: state.flip_y.sign(),
            },
        ],
        natural_size,
    }
}

fn percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 1e6).round() / 1e6
}

fn join_css(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}
