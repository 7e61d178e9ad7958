#![forbid(unsafe_code)]

//! Pointer velocity over a trailing time window.
//!
//! Samples older than [`VELOCITY_HORIZON`] relative to the newest sample are
//! dropped. Velocity is the displacement between the oldest and newest
//! retained samples divided by their time difference, expressed per
//! `units` milliseconds (1000 gives pixels per second).

use std::collections::VecDeque;
use std::time::Duration;

use crate::geometry::Point;

/// Samples older than this, relative to the newest one, do not contribute.
pub const VELOCITY_HORIZON: Duration = Duration::from_millis(100);

/// Velocity units used by gesture resolution: pixels per second.
pub const VELOCITY_UNITS_MS: u32 = 1000;

/// Upper bound on retained samples; a burst of events inside the horizon
/// should not grow the buffer without limit.
const MAX_SAMPLES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    position: Point,
    time: Duration,
}

/// Planar velocity in pixels per velocity unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Trailing-window velocity estimator for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Record a pointer position. Timestamps are host-relative.
    pub fn add(&mut self, position: Point, time: Duration) {
        // A timestamp going backwards means the host restarted its clock.
        if self.samples.back().is_some_and(|last| time < last.time) {
            self.samples.clear();
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { position, time });

        while let Some(front) = self.samples.front() {
            if time.saturating_sub(front.time) > VELOCITY_HORIZON {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity expressed per `units` milliseconds.
    ///
    /// Zero when fewer than two samples are retained or they share a timestamp.
    #[must_use]
    pub fn velocity(&self, units: u32) -> Velocity {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return Velocity::default();
        };
        let dt = last.time.saturating_sub(first.time);
        if dt.is_zero() {
            return Velocity::default();
        }
        let scale = units as f32 / (dt.as_secs_f32() * 1000.0);
        Velocity {
            x: (last.position.x - first.position.x) * scale,
            y: (last.position.y - first.position.y) * scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
