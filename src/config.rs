//! Server configuration module.
//!
//! Handles loading, validating, and merging `imageserver.toml`. Stock
//! defaults are the base layer; the user file in the config directory only
//! needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [selection]
//! strategies = ["registered", "aspect-ratio", "adapting"]  # Tried in order
//!
//! [quality]
//! allow_upscale = false     # Allow fresh crops smaller than the request
//!
//! [output]
//! quality = 90              # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel renders (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only reuse exact registrations
//! [selection]
//! strategies = ["registered"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::selection::SelectorKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the config directory.
pub const CONFIG_FILENAME: &str = "imageserver.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `imageserver.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Which selectors run, and in which order.
    pub selection: SelectionConfig,
    /// Upscale policy for freshly generated crops.
    pub quality: QualityConfig,
    /// Encoder settings for rendered files.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.strategies.is_empty() {
            return Err(ConfigError::Validation(
                "selection.strategies must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for kind in &self.selection.strategies {
            if !seen.insert(kind) {
                return Err(ConfigError::Validation(format!(
                    "selection.strategies lists '{}' more than once",
                    kind
                )));
            }
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    pub strategies: Vec<SelectorKind>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategies: SelectorKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// When false, a fresh crop with fewer pixels than the requested
    /// resolution is refused.
    pub allow_upscale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ServerConfig::default())?)
}

/// Deep-merge `overlay` into `base`. Tables merge key by key, anything else
/// in the overlay replaces the base value.
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

/// Read `imageserver.toml` from `dir` as a raw value, `None` if absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Stock defaults overlaid with `<dir>/imageserver.toml`.
pub fn load_config(dir: &Path) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `imageserver.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imageserver configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Selection
# ---------------------------------------------------------------------------
# Strategies for reusing registered modifications, tried in order.
# The first one that matches wins; if none match a centered crop is made.
#
#   registered    - the requested resolution id, else exact width and height
#   aspect-ratio  - same aspect ratio: smallest covering resolution, else the
#                   largest smaller one whose crop has enough pixels
#   adapting      - one side matches: grow or shrink the crop on the other;
#                   otherwise extend or cut a crop to the requested ratio
[selection]
strategies = ["registered", "aspect-ratio", "adapting"]

# ---------------------------------------------------------------------------
# Quality
# ---------------------------------------------------------------------------
[quality]
# Allow a fresh crop to be scaled up to the requested resolution.
allow_upscale = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1-100). PNG, WebP and TIFF are lossless.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers. Omit for auto (= number of CPU cores).
# Values larger than the core count are clamped down.
# max_processes = 4
"##
}
