//! Engine tunables, loadable from JSON or `BOARD_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    AUTOSAVE_DELAY_MS, AUTOSAVE_NEW_DELAY_MS, DRAG_THRESHOLD, HANDLE_RADIUS_PX, STROKE_LIFETIME_MS,
    STROKE_SWEEP_INTERVAL_MS, STROKE_VISIBLE_MS, ZOOM_IN_FACTOR, ZOOM_MAX, ZOOM_MIN, ZOOM_OUT_FACTOR,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Every constant the interaction engine consults at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Canvas-space movement separating a click from a drag.
    pub drag_threshold: f64,
    /// Handle and arrow hit slop, in screen pixels.
    pub handle_radius_px: f64,
    pub stroke_visible_ms: u64,
    pub stroke_lifetime_ms: u64,
    pub sweep_interval_ms: u64,
    pub autosave_delay_ms: u64,
    pub autosave_new_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            drag_threshold: DRAG_THRESHOLD,
            handle_radius_px: HANDLE_RADIUS_PX,
            stroke_visible_ms: STROKE_VISIBLE_MS,
            stroke_lifetime_ms: STROKE_LIFETIME_MS,
            sweep_interval_ms: STROKE_SWEEP_INTERVAL_MS,
            autosave_delay_ms: AUTOSAVE_DELAY_MS,
            autosave_new_delay_ms: AUTOSAVE_NEW_DELAY_MS,
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset or malformed.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `BOARD_*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the resulting values are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Self {
            zoom_min: env_parse("BOARD_ZOOM_MIN", d.zoom_min),
            zoom_max: env_parse("BOARD_ZOOM_MAX", d.zoom_max),
            zoom_in_factor: env_parse("BOARD_ZOOM_IN_FACTOR", d.zoom_in_factor),
            zoom_out_factor: env_parse("BOARD_ZOOM_OUT_FACTOR", d.zoom_out_factor),
            drag_threshold: env_parse("BOARD_DRAG_THRESHOLD", d.drag_threshold),
            handle_radius_px: env_parse("BOARD_HANDLE_RADIUS_PX", d.handle_radius_px),
            stroke_visible_ms: env_parse("BOARD_STROKE_VISIBLE_MS", d.stroke_visible_ms),
            stroke_lifetime_ms: env_parse("BOARD_STROKE_LIFETIME_MS", d.stroke_lifetime_ms),
            sweep_interval_ms: env_parse("BOARD_SWEEP_INTERVAL_MS", d.sweep_interval_ms),
            autosave_delay_ms: env_parse("BOARD_AUTOSAVE_DELAY_MS", d.autosave_delay_ms),
            autosave_new_delay_ms: env_parse("BOARD_AUTOSAVE_NEW_DELAY_MS", d.autosave_new_delay_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.zoom_min.is_nan() || self.zoom_min <= 0.0 {
            return invalid("zoom_min", "must be positive");
        }
        if self.zoom_max.is_nan() || self.zoom_max < self.zoom_min {
            return invalid("zoom_max", "must not be below zoom_min");
        }
        if self.zoom_in_factor.is_nan() || self.zoom_in_factor <= 0.0 {
            return invalid("zoom_in_factor", "must be positive");
        }
        if self.zoom_out_factor.is_nan() || self.zoom_out_factor <= 0.0 {
            return invalid("zoom_out_factor", "must be positive");
        }
        if self.drag_threshold.is_nan() || self.drag_threshold < 0.0 {
            return invalid("drag_threshold", "must not be negative");
        }
        if self.handle_radius_px.is_nan() || self.handle_radius_px < 0.0 {
            return invalid("handle_radius_px", "must not be negative");
        }
        if self.stroke_visible_ms > self.stroke_lifetime_ms {
            return invalid("stroke_visible_ms", "must not exceed stroke_lifetime_ms");
        }
        if self.sweep_interval_ms == 0 {
            return invalid("sweep_interval_ms", "must be non-zero");
        }
        Ok(())
    }
}
