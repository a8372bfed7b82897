//! Adjustment state: the value object every edit produces.
//!
//! [`AdjustmentState`] holds the five continuous, non-destructive parameters
//! plus rotation and flip signs. It is `Copy` and never mutated in place:
//! every edit builds a new state and hands it to
//! [`EditHistory::commit`](crate::history::EditHistory::commit).
//!
//! | Field | Unit | Range | Default |
//! |---|---|---|---|
//! | `brightness` | % | 0–200 | 100 |
//! | `contrast` | % | 0–200 | 100 |
//! | `saturate` | % | 0–200 | 100 |
//! | `hue` | degrees | 0–360 (exclusive, wraps) | 0 |
//! | `opacity` | % | 0–100 | 100 |
//! | `rotation` | degrees | unbounded | 0 |
//! | `flip_x`, `flip_y` | sign | ±1 | 1 |
//!
//! The defaults form the identity transform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sign multiplier for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Flip {
    #[default]
    Normal,
    Mirrored,
}

impl Flip {
    pub fn sign(self) -> i8 {
        match self {
            Flip::Normal => 1,
            Flip::Mirrored => -1,
        }
    }

    /// Flip the sign. Applying it twice is a no-op.
    pub fn toggled(self) -> Self {
        match self {
            Flip::Normal => Flip::Mirrored,
            Flip::Mirrored => Flip::Normal,
        }
    }
}

impl From<Flip> for i8 {
    fn from(flip: Flip) -> i8 {
        flip.sign()
    }
}

impl TryFrom<i8> for Flip {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Flip::Normal),
            -1 => Ok(Flip::Mirrored),
            other => Err(format!("flip sign must be 1 or -1, got {other}")),
        }
    }
}

/// Complete, immutable set of edit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentState {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub hue: f64,
    pub opacity: f64,
    /// Accumulated degrees; rendering takes it mod 360.
    pub rotation: i32,
    pub flip_x: Flip,
    pub flip_y: Flip,
}

impl Default for AdjustmentState {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturate: 100.0,
            hue: 0.0,
            opacity: 100.0,
            rotation: 0,
            flip_x: Flip::Normal,
            flip_y: Flip::Normal,
        }
    }
}

impl AdjustmentState {
    pub fn get(&self, adjustment: Adjustment) -> f64 {
        match adjustment {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturate => self.saturate,
            Adjustment::Hue => self.hue,
            Adjustment::Opacity => self.opacity,
        }
    }

    /// Copy of `self` with one slider moved, clamped into its range.
    pub fn with(mut self, adjustment: Adjustment, value: f64) -> Self {
        let value = adjustment.clamp(value);
        match adjustment {
            Adjustment::Brightness => self.brightness = value,
            Adjustment::Contrast => self.contrast = value,
            Adjustment::Saturate => self.saturate = value,
            Adjustment::Hue => self.hue = value,
            Adjustment::Opacity => self.opacity = value,
        }
        self
    }

    pub fn rotated(mut self, degrees: i32) -> Self {
        self.rotation = self.rotation.saturating_add(degrees);
        self
    }

    pub fn flipped_x(mut self) -> Self {
        self.flip_x = self.flip_x.toggled();
        self
    }

    pub fn flipped_y(mut self) -> Self {
        self.flip_y = self.flip_y.toggled();
        self
    }

    pub fn with_preset(self, preset: &PresetValues) -> Self {
        preset.apply(self)
    }
}

/// The five continuous slider parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturate,
    Hue,
    Opacity,
}

impl Adjustment {
    /// All sliders in panel order.
    pub const ALL: [Adjustment; 5] = [
        Adjustment::Brightness,
        Adjustment::Contrast,
        Adjustment::Saturate,
        Adjustment::Hue,
        Adjustment::Opacity,
    ];

    /// `(min, max)` slider range. Inclusive, except hue which wraps at 360.
    pub fn range(self) -> (f64, f64) {
        match self {
            Adjustment::Brightness | Adjustment::Contrast | Adjustment::Saturate => (0.0, 200.0),
            Adjustment::Hue => (0.0, 360.0),
            Adjustment::Opacity => (0.0, 100.0),
        }
    }

    /// Bring `value` into range. Hue wraps into `[0, 360)`; the others clamp.
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default_value();
        }
        match self {
            Adjustment::Hue if value.is_finite() => {
                let wrapped = value.rem_euclid(360.0);
                if wrapped >= 360.0 { 0.0 } else { wrapped }
            }
            Adjustment::Hue => self.default_value(),
            _ => {
                let (min, max) = self.range();
                value.clamp(min, max)
            }
        }
    }

    pub fn default_value(self) -> f64 {
        AdjustmentState::default().get(self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Adjustment::Brightness => "Brightness",
            Adjustment::Contrast => "Contrast",
            Adjustment::Saturate => "Saturation",
            Adjustment::Hue => "Hue Rotation",
            Adjustment::Opacity => "Opacity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Adjustment::Hue => "°",
            _ => "%",
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A partial overlay of the continuous parameters.
///
/// Only the fields that are `Some` are overwritten; rotation and flips are
/// never touched by a preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl PresetValues {
    fn tone(brightness: f64, contrast: f64, saturate: f64) -> Self {
        Self {
            brightness: Some(brightness),
            contrast: Some(contrast),
            saturate: Some(saturate),
            ..Self::default()
        }
    }

    /// `(slider, value)` pairs this preset sets.
    pub fn entries(&self) -> impl Iterator<Item = (Adjustment, f64)> + '_ {
        Adjustment::ALL.into_iter().filter_map(|adjustment| {
            let value = match adjustment {
                Adjustment::Brightness => self.brightness,
                Adjustment::Contrast => self.contrast,
                Adjustment::Saturate => self.saturate,
                Adjustment::Hue => self.hue,
                Adjustment::Opacity => self.opacity,
            };
            value.map(|v| (adjustment, v))
        })
    }

    /// `self` with every field `other` sets replaced.
    pub fn overlaid(&self, other: &PresetValues) -> PresetValues {
        PresetValues {
            brightness: other.brightness.or(self.brightness),
            contrast: other.contrast.or(self.contrast),
            saturate: other.saturate.or(self.saturate),
            hue: other.hue.or(self.hue),
            opacity: other.opacity.or(self.opacity),
        }
    }

    pub fn apply(&self, state: AdjustmentState) -> AdjustmentState {
        self.entries()
            .fold(state, |acc, (adjustment, value)| acc.with(adjustment, value))
    }
}

/// The built-in looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Grayscale,
    Sepia,
    Vintage,
    Cool,
    Warm,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Grayscale,
        Preset::Sepia,
        Preset::Vintage,
        Preset::Cool,
        Preset::Warm,
    ];

    /// Lookup key, as used in `[presets.<name>]` config tables.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Grayscale => "grayscale",
            Preset::Sepia => "sepia",
            Preset::Vintage => "vintage",
            Preset::Cool => "cool",
            Preset::Warm => "warm",
        }
    }

    pub fn values(self) -> PresetValues {
        match self {
            Preset::Grayscale => PresetValues::tone(100.0, 100.0, 0.0),
            Preset::Sepia => PresetValues::tone(105.0, 110.0, 80.0),
            Preset::Vintage => PresetValues::tone(110.0, 120.0, 90.0),
            Preset::Cool => PresetValues::tone(100.0, 105.0, 120.0),
            Preset::Warm => PresetValues::tone(110.0, 100.0, 130.0),
        }
    }
}

/// Built-in presets keyed by name.
pub fn builtin_presets() -> BTreeMap<String, PresetValues> {
    Preset::ALL
        .into_iter()
        .map(|preset| (preset.name().to_string(), preset.values()))
        .collect()
}
