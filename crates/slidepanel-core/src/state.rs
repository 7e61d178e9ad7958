#![forbid(unsafe_code)]

//! Slide value and the panel state derived from it.
//!
//! # Invariants
//!
//! 1. A [`SlideValue`] is never NaN and never outside `[0.0, 1.0]`.
//! 2. [`PanelState`] is a pure projection of the value:
//!    `0.0 → Collapsed`, `1.0 → Expanded`, anything in between `→ Sliding`.
//!
//! There is no way to hold a state that disagrees with its value, because the
//! state is never stored separately from the value that produced it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlideError};

/// Discrete classification of a slide value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelState {
    /// Value is exactly 0.0.
    #[default]
    Collapsed,
    /// Value is exactly 1.0.
    Expanded,
    /// Value is strictly between 0.0 and 1.0.
    Sliding,
}

impl PanelState {
    /// Project a slide value onto its state.
    #[inline]
    #[must_use]
    pub fn from_value(value: SlideValue) -> Self {
        let v = value.get();
        if v == 0.0 {
            Self::Collapsed
        } else if v == 1.0 {
            Self::Expanded
        } else {
            Self::Sliding
        }
    }

    /// The value a settled state rests at. `None` for `Sliding`.
    #[inline]
    #[must_use]
    pub fn resting_value(self) -> Option<SlideValue> {
        match self {
            Self::Collapsed => Some(SlideValue::COLLAPSED),
            Self::Expanded => Some(SlideValue::EXPANDED),
            Self::Sliding => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Sliding)
    }
}

/// Normalized slide position in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SlideValue(f32);

impl SlideValue {
    pub const COLLAPSED: Self = Self(0.0);
    pub const EXPANDED: Self = Self(1.0);

    /// Validate a raw float. Out-of-range and NaN inputs are rejected, never clamped.
    pub fn new(value: f32) -> Result<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(SlideError::invalid_value(value));
        }
        Ok(Self(value))
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn state(self) -> PanelState {
        PanelState::from_value(self)
    }
}

impl TryFrom<f32> for SlideValue {
    type Error = SlideError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SlideValue> for f32 {
    fn from(value: SlideValue) -> Self {
        value.0
    }
}
