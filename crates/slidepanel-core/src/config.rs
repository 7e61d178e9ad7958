#![forbid(unsafe_code)]

//! Host-facing configuration for a sliding panel.
//!
//! Every field defaults to the behavior of the classic Android sliding panel:
//! collapsed, vertical, 300 ms decelerating settle, tap toggles.
//!
//! # Loading
//!
//! With the `config` feature enabled the configuration can be read from TOML
//! or JSON. Missing fields fall back to their defaults.
//!
//! ```toml
//! initial_state = "expanded"
//! orientation = "horizontal"
//! slide_duration = "long"
//! easing = { decelerate = 2.0 }
//! touch_slop = 16.0
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{Easing, SlideDuration};
use crate::geometry::Orientation;
use crate::state::PanelState;

/// Platform drag-recognition threshold in pixels (Android `TOUCH_SLOP`).
pub const DEFAULT_TOUCH_SLOP: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// State the panel starts in. Must be settled.
    pub initial_state: PanelState,
    /// Axis the sliding pane travels along.
    pub orientation: Orientation,
    /// Duration of programmatic and gesture-completion slides.
    pub slide_duration: SlideDuration,
    /// Easing curve of the settle animation.
    pub easing: Easing,
    /// Platform drag-recognition threshold in pixels. The gesture resolver
    /// starts sliding after a quarter of this distance.
    pub touch_slop: f32,
    /// Whether a tap on the drag region toggles the panel.
    pub toggle_on_tap: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            initial_state: PanelState::Collapsed,
            orientation: Orientation::Vertical,
            slide_duration: SlideDuration::Short,
            easing: Easing::default(),
            touch_slop: DEFAULT_TOUCH_SLOP,
            toggle_on_tap: true,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_state(mut self, state: PanelState) -> Self {
        self.initial_state = state;
        self
    }

    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn slide_duration(mut self, duration: SlideDuration) -> Self {
        self.slide_duration = duration;
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn touch_slop(mut self, slop: f32) -> Self {
        self.touch_slop = slop;
        self
    }

    #[must_use]
    pub fn toggle_on_tap(mut self, enabled: bool) -> Self {
        self.toggle_on_tap = enabled;
        self
    }

    /// Check all parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.initial_state == PanelState::Sliding {
            errors.push("initial_state must be collapsed or expanded, got sliding".into());
        }

        if !self.touch_slop.is_finite() || self.touch_slop < 0.0 {
            errors.push(format!(
                "touch_slop must be a non-negative number, got {}",
                self.touch_slop
            ));
        }

        errors.extend(self.slide_duration.invalid_reason());
        errors.extend(self.easing.invalid_reason());

        errors
    }

    /// Validate and wrap the result.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Serialize to pretty JSON.
    #[cfg(feature = "config")]
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid panel config: {}", .0.join("; "))]
    Validation(Vec<String>),
}
