//! Editor configuration supplied by the host page.
//!
//! Every field has a default, so the host may pass a partial JSON object (or
//! nothing at all) and still get a working editor.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::asset::Generation;
use crate::consts::{
    DEFAULT_AREA_DIVISOR, DELETE_BUTTON_RADIUS_PX, MIN_SIZE_RATIO, RESIZE_DEBOUNCE_MS, RESIZE_HANDLE_RADIUS_PX,
    VIEWPORT_FIT_FRACTION,
};

pub const DEFAULT_ASSET_COLLECTION: &str = "monkes";
pub const DEFAULT_EXPORT_FILENAME: &str = "monke-masked-image.png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fit_fraction must be in (0, 1], got {0}")]
    FitFraction(f64),
    #[error("min_size_ratio must be positive, got {0}")]
    MinSizeRatio(f64),
    #[error("default_area_divisor must be finite and positive, got {0}")]
    AreaDivisor(f64),
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fraction of the viewport the fitted photo may occupy.
    pub fit_fraction: f64,
    /// Floor applied to every resize.
    pub min_size_ratio: f64,
    /// New placements cover `1 / default_area_divisor` of the display area.
    pub default_area_divisor: f64,
    /// Quiet period before a viewport resize takes effect.
    pub resize_debounce_ms: f64,
    pub resize_handle_radius_px: f64,
    pub delete_button_radius_px: f64,
    /// First path segment of overlay asset URLs.
    pub asset_collection: String,
    pub generation: Generation,
    pub export_filename: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_fraction: VIEWPORT_FIT_FRACTION,
            min_size_ratio: MIN_SIZE_RATIO,
            default_area_divisor: DEFAULT_AREA_DIVISOR,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            resize_handle_radius_px: RESIZE_HANDLE_RADIUS_PX,
            delete_button_radius_px: DELETE_BUTTON_RADIUS_PX,
            asset_collection: DEFAULT_ASSET_COLLECTION.to_string(),
            generation: Generation::default(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a host-provided JSON object. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON and a range error when a numeric
    /// field would break geometry invariants.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric fields that the geometry code divides by or floors with.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fit_fraction > 0.0 && self.fit_fraction <= 1.0) {
            return Err(ConfigError::FitFraction(self.fit_fraction));
        }
        if self.min_size_ratio <= 0.0 || self.min_size_ratio.is_nan() {
            return Err(ConfigError::MinSizeRatio(self.min_size_ratio));
        }
        if !(self.default_area_divisor.is_finite() && self.default_area_divisor > 0.0) {
            return Err(ConfigError::AreaDivisor(self.default_area_divisor));
        }
        for (field, value) in [
            ("resize_debounce_ms", self.resize_debounce_ms),
            ("resize_handle_radius_px", self.resize_handle_radius_px),
            ("delete_button_radius_px", self.delete_button_radius_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}
