#![forbid(unsafe_code)]

//! Contract violations reported by the slide engine.
//!
//! Every variant is a deterministic precondition failure on the caller's
//! side. Nothing here is transient, so nothing here is retried.

use thiserror::Error;

use crate::state::PanelState;

pub type Result<T> = std::result::Result<T, SlideError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlideError {
    /// A slide value outside `[0, 1]`, or NaN.
    #[error("invalid slide value {value}: must be within [0.0, 1.0]")]
    InvalidValue { value: f32 },

    /// `Sliding` is derived from the value and cannot be requested.
    #[error("cannot slide to {target:?}: only Collapsed or Expanded are valid targets")]
    InvalidTransition { target: PanelState },

    /// A drag update arrived before the layout host reported a measured extent.
    #[error("drag extent has not been measured yet")]
    MissingExtent,

    /// The layout host reported bounds that cannot describe a travel range.
    #[error("invalid drag extent [{min}, {max}]")]
    InvalidExtent { min: f32, max: f32 },

    /// Panel configuration that would break the gesture gate or the settle
    /// animation (NaN slop, non-positive decelerate factor, unbounded duration).
    #[error("invalid panel config: {reason}")]
    InvalidConfig { reason: String },
}

impl SlideError {
    #[must_use]
    pub fn invalid_value(value: f32) -> Self {
        Self::InvalidValue { value }
    }

    /// Whether this error was caused by a value the caller computed.
    #[must_use]
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_value() {
        let err = SlideError::invalid_value(1.5);
        assert_eq!(
            err.to_string(),
            "invalid slide value 1.5: must be within [0.0, 1.0]"
        );
        assert!(err.is_value_error());
    }

    #[test]
    fn transition_error_names_target() {
        let err = SlideError::InvalidTransition {
            target: PanelState::Sliding,
        };
        assert!(err.to_string().contains("Sliding"));
        assert!(!err.is_value_error());
    }

    #[test]
    fn config_error_carries_reason() {
        let err = SlideError::InvalidConfig {
            reason: "touch_slop must be a non-negative number, got NaN".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid panel config: touch_slop must be a non-negative number, got NaN"
        );
        assert!(!err.is_value_error());
    }

    #[test]
    fn missing_extent_message() {
        assert_eq!(
            SlideError::MissingExtent.to_string(),
            "drag extent has not been measured yet"
        );
    }
}
