#![forbid(unsafe_code)]

//! Geometric primitives for sliding panels.
//!
//! Coordinates are host pixels along the panel's primary axis. The coordinate
//! space is inverted relative to the slide value: a coordinate equal to the
//! extent's `max` is fully collapsed (0.0), a coordinate of 0 is fully
//! expanded (1.0). [`normalize`] and [`denormalize`] are the only places that
//! know about this inversion.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlideError};

/// Map a raw coordinate onto the slide value range.
///
/// `max` must be nonzero. The result is only meaningful for coordinates in
/// `[0, max]`; callers clamp first.
#[inline]
#[must_use]
pub fn normalize(coordinate: f32, max: f32) -> f32 {
    (coordinate - max).abs() / max
}

/// Inverse of [`normalize`]: the raw coordinate of a slide value.
#[inline]
#[must_use]
pub fn denormalize(value: f32, max: f32) -> f32 {
    (value * max - max).abs()
}

/// Restrict `value` to `[min, max]`.
///
/// `min <= max` is a caller invariant. NaN is returned unchanged so that the
/// value guard downstream can reject it.
#[inline]
#[must_use]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Axis along which the sliding pane travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Pane slides up and down (bottom sheet).
    #[default]
    Vertical,
    /// Pane slides left and right (drawer).
    Horizontal,
}

impl Orientation {
    /// Component of `point` on this orientation's axis.
    #[inline]
    #[must_use]
    pub fn primary(self, point: Point) -> f32 {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

/// A planar pointer position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel-space travel bounds of the sliding pane.
///
/// Supplied by the layout host after each measurement of the fixed pane.
/// An extent whose `max` is zero has not been measured yet.
///
/// Normalization is measured from `max` and scaled by `max` alone, so `min`
/// only clamps. With `min > 0` the top of travel normalizes to
/// `(max - min) / max < 1.0`: a pane resting at `min` reports `Sliding`, and
/// a release toward `min` settles there instead of in `Expanded`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DragExtent {
    min: f32,
    max: f32,
}

impl DragExtent {
    /// An extent that has not been measured.
    pub const UNMEASURED: Self = Self { min: 0.0, max: 0.0 };

    /// Build an extent. Rejects non-finite bounds and `min > max`.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SlideError::InvalidExtent { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Whether the layout host has reported a usable size.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.max != 0.0
    }

    #[inline]
    #[must_use]
    pub fn clamp(&self, coordinate: f32) -> f32 {
        clamp(coordinate, self.min, self.max)
    }

    /// Clamp a raw coordinate into the extent and normalize it.
    pub fn normalize(&self, coordinate: f32) -> Result<f32> {
        if !self.is_measured() {
            return Err(SlideError::MissingExtent);
        }
        Ok(normalize(self.clamp(coordinate), self.max))
    }

    /// Raw coordinate of a slide value within this extent.
    pub fn denormalize(&self, value: f32) -> Result<f32> {
        if !self.is_measured() {
            return Err(SlideError::MissingExtent);
        }
        Ok(denormalize(value, self.max))
    }
}
