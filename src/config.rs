//! Editor configuration module.
//!
//! Handles loading, validating, and merging a `config.toml`. Stock defaults
//! are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! quality = 92                  # JPEG quality for the compression estimate (1-100)
//!
//! [export]
//! filename = "edited-image.png"         # Full-quality PNG download
//! compressed_filename = "compressed.jpg"
//!
//! [history]
//! commit = "gesture-end"        # or "every-change"
//! # limit = 100                 # Cap on undo depth (omit for unbounded)
//!
//! [presets.grayscale]
//! brightness = 100
//! contrast = 100
//! saturate = 0
//! ```
//!
//! ## Presets
//!
//! The five built-in looks (`grayscale`, `sepia`, `vintage`, `cool`, `warm`)
//! are part of the stock defaults. A `[presets.<name>]` table overrides one of
//! them key by key or adds a new look. Keys a preset leaves out are not
//! touched when it is applied.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use crate::state::{Adjustment, PresetValues, builtin_presets};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Compression estimate settings.
    pub compression: CompressionConfig,
    /// Download file names.
    pub export: ExportConfig,
    /// When slider changes become history entries, and how deep history goes.
    pub history: HistoryConfig,
    /// Named looks applied by `apply_preset`. User tables are layered onto
    /// the built-in looks.
    #[serde(deserialize_with = "deserialize_presets")]
    pub presets: BTreeMap<String, PresetValues>,
}

/// Overlay user preset tables onto [`builtin_presets`] key by key.
fn deserialize_presets<'de, D>(deserializer: D) -> Result<BTreeMap<String, PresetValues>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let user = BTreeMap::<String, PresetValues>::deserialize(deserializer)?;
    let mut presets = builtin_presets();
    for (name, values) in user {
        let merged = match presets.remove(&name) {
            Some(base) => base.overlaid(&values),
            None => values,
        };
        presets.insert(name, merged);
    }
    Ok(presets)
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            compression: CompressionConfig::default(),
            export: ExportConfig::default(),
            history: HistoryConfig::default(),
            presets: builtin_presets(),
        }
    }
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.compression.quality) {
            return Err(ConfigError::Validation(
                "compression.quality must be 1-100".into(),
            ));
        }
        if self.export.filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.filename must not be empty".into(),
            ));
        }
        if self.export.compressed_filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.compressed_filename must not be empty".into(),
            ));
        }
        if self.history.limit == Some(0) {
            return Err(ConfigError::Validation(
                "history.limit must be at least 1".into(),
            ));
        }
        for (name, preset) in &self.presets {
            for (adjustment, value) in preset.entries() {
                let (min, max) = adjustment.range();
                if !(min..=max).contains(&value) {
                    return Err(ConfigError::Validation(format!(
                        "presets.{name}.{} must be {min}-{max}, got {value}",
                        preset_key(adjustment)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a preset by name.
    pub fn preset(&self, name: &str) -> Option<&PresetValues> {
        self.presets.get(name)
    }
}

fn preset_key(adjustment: Adjustment) -> &'static str {
    match adjustment {
        Adjustment::Brightness => "brightness",
        Adjustment::Contrast => "contrast",
        Adjustment::Saturate => "saturate",
        Adjustment::Hue => "hue",
        Adjustment::Opacity => "opacity",
    }
}

/// Compression estimate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
        }
    }
}

impl CompressionConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

/// Download file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Name of the full-quality PNG export.
    pub filename: String,
    /// Name offered for the compression result.
    pub compressed_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "edited-image.png".to_string(),
            compressed_filename: "compressed.jpg".to_string(),
        }
    }
}

/// When a slider change becomes an undo step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Live changes stay in a draft until the gesture ends.
    #[default]
    GestureEnd,
    /// Every change is committed on its own.
    EveryChange,
}

/// History settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub commit: CommitPolicy,
    /// Maximum undo depth. When absent, history is unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EditorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<EditorConfig, ConfigError> {
    let config = resolve_config(stock_defaults_value(), load_raw_config(root)?)?;
    tracing::debug!(
        quality = config.compression.quality,
        presets = config.presets.len(),
        "loaded editor config"
    );
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Retouch Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Compression estimate
# ---------------------------------------------------------------------------
[compression]
# JPEG quality for the lossy re-encode (1 = worst, 100 = best).
quality = 92

# ---------------------------------------------------------------------------
# Downloads
# ---------------------------------------------------------------------------
[export]
# Full-quality PNG export.
filename = "edited-image.png"

# Download name for the compression result.
compressed_filename = "compressed.jpg"

# ---------------------------------------------------------------------------
# Edit history
# ---------------------------------------------------------------------------
[history]
# "gesture-end": a slider drag becomes one undo step when it is released.
# "every-change": each intermediate slider value is its own undo step.
commit = "gesture-end"

# Maximum number of undo steps kept. Omit for unbounded history.
# limit = 100

# ---------------------------------------------------------------------------
# Presets
# ---------------------------------------------------------------------------
# Each preset sets only the sliders it names. Add a [presets.<name>] table to
# define your own look.
[presets.grayscale]
brightness = 100
contrast = 100
saturate = 0

[presets.sepia]
brightness = 105
contrast = 110
saturate = 80

[presets.vintage]
brightness = 110
contrast = 120
saturate = 90

[presets.cool]
brightness = 100
contrast = 105
saturate = 120

[presets.warm]
brightness = 110
contrast = 100
saturate = 130
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = EditorConfig::default();
        assert_eq!(config.compression.quality, 92);
        assert_eq!(config.export.filename, "edited-image.png");
        assert_eq!(config.export.compressed_filename, "compressed.jpg");
        assert_eq!(config.history.commit, CommitPolicy::GestureEnd);
        assert_eq!(config.history.limit, None);
        assert_eq!(config.presets.len(), 5);
    }

    #[test]
    fn compression_quality_converts() {
        let config = CompressionConfig { quality: 80 };
        assert_eq!(config.quality(), Quality::new(80));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[compression]
quality = 75
"#;
        let config: EditorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.compression.quality, 75);
        // Defaults preserved
        assert_eq!(config.export.filename, "edited-image.png");
        assert_eq!(config.presets.len(), 5);
    }

    #[test]
    fn parse_history_policy() {
        let toml = r#"
[history]
commit = "every-change"
limit = 50
"#;
        let config: EditorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.history.commit, CommitPolicy::EveryChange);
        assert_eq!(config.history.limit, Some(50));
    }

    #[test]
    fn unknown_commit_policy_rejected() {
        let toml = r#"
[history]
commit = "sometimes"
"#;
        let result: Result<EditorConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn preset_accepts_integer_values() {
        let toml = r#"
[presets.noir]
contrast = 150
saturate = 0
"#;
        let config: EditorConfig = toml::from_str(toml).unwrap();
        let noir = config.preset("noir").unwrap();
        assert_eq!(noir.contrast, Some(150.0));
        assert_eq!(noir.brightness, None);
    }

    #[test]
    fn parsed_presets_keep_builtins() {
        let config: EditorConfig = toml::from_str("[presets.noir]\ncontrast = 150").unwrap();
        assert_eq!(config.presets.len(), 6);
        assert_eq!(config.preset("grayscale").unwrap().saturate, Some(0.0));
        assert_eq!(config.preset("noir").unwrap().contrast, Some(150.0));
    }

    #[test]
    fn parsed_preset_overrides_builtin_key_by_key() {
        let config: EditorConfig = toml::from_str("[presets.warm]\nsaturate = 140").unwrap();
        let warm = config.preset("warm").unwrap();
        assert_eq!(warm.saturate, Some(140.0));
        assert_eq!(warm.brightness, Some(110.0));
        assert_eq!(warm.contrast, Some(100.0));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[export]
filename = "photo.png"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.filename, "photo.png");
        assert_eq!(config.export.compressed_filename, "compressed.jpg");
    }

    #[test]
    fn load_config_adds_presets_alongside_builtins() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[presets.noir]
contrast = 150
saturate = 0

[presets.warm]
saturate = 140
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.presets.len(), 6);
        assert_eq!(config.presets["noir"].contrast, Some(150.0));
        // Overridden key by key
        assert_eq!(config.presets["warm"].saturate, Some(140.0));
        assert_eq!(config.presets["warm"].brightness, Some(110.0));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[export]
filename = "a.png"
compressed_filename = "a.jpg"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[export]
filename = "b.png"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let export = merged.get("export").unwrap();
        assert_eq!(export.get("filename").unwrap().as_str(), Some("b.png"));
        assert_eq!(
            export.get("compressed_filename").unwrap().as_str(),
            Some("a.jpg")
        );
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[compression]
qualty = 90
"#;
        let result: Result<EditorConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<EditorConfig, _> = toml::from_str("[exports]\nfilename = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_preset_key_rejected() {
        let toml_str = r#"
[presets.noir]
sharpness = 10
"#;
        let result: Result<EditorConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[history]\ncommits = \"x\"").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = EditorConfig::default();
        config.compression.quality = 100;
        assert!(config.validate().is_ok());
        config.compression.quality = 1;
        assert!(config.validate().is_ok());

        config.compression.quality = 0;
        assert!(config.validate().is_err());
        config.compression.quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn validate_empty_filename() {
        let mut config = EditorConfig::default();
        config.export.filename = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_limit() {
        let mut config = EditorConfig::default();
        config.history.limit = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_preset_out_of_range() {
        let mut config = EditorConfig::default();
        config.presets.insert(
            "blinding".into(),
            PresetValues {
                brightness: Some(500.0),
                ..PresetValues::default()
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("presets.blinding.brightness"));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[compression]\nquality = 200").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // resolve_config tests
    // =========================================================================

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str("[history]\nlimit = 10").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.history.limit, Some(10));
        assert_eq!(config.history.commit, CommitPolicy::GestureEnd);
    }

    // =========================================================================
    // stock_config_toml / stock_defaults_value tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: EditorConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("compression").is_some());
        assert!(val.get("export").is_some());
        assert!(val.get("history").is_some());
        assert!(val.get("presets").unwrap().get("sepia").is_some());
        assert!(val.get("history").unwrap().get("limit").is_none());
    }
}
