#![forbid(unsafe_code)]

//! Timed, eased interpolation between two slide values.
//!
//! The engine does not own a scheduler. The host's frame clock drives a
//! [`SlideAnimation`] either with an explicit progress ([`SlideAnimation::seek`])
//! or with elapsed time ([`SlideAnimation::advance`]); each call returns the
//! interpolated value for that frame.
//!
//! # Invariants
//!
//! - Progress is always in `[0.0, 1.0]`.
//! - Interpolated values never leave the segment between `from` and `to`.
//! - At progress 1.0 the value is exactly `to`, so a settled target projects
//!   onto a settled state.
//!
//! # Failure Modes
//!
//! - Zero duration: the first `advance` completes the animation.
//! - Custom durations above [`SlideDuration::MAX`] are rejected by
//!   configuration; `seek` saturates instead of overflowing if one slips
//!   through.
//! - NaN progress is treated as 0.0.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default decelerate factor of the settle animation.
pub const DEFAULT_DECELERATE_FACTOR: f32 = 1.5;

/// Easing curve applied to animation progress.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// `1 - (1 - t)^(2 * factor)`: starts fast, slows into the target.
    Decelerate(f32),
    /// Cubic ease-out.
    EaseOut,
    /// Cubic S-curve.
    EaseInOut,
}

impl Default for Easing {
    fn default() -> Self {
        Self::Decelerate(DEFAULT_DECELERATE_FACTOR)
    }
}

impl Easing {
    /// Apply the curve to a progress value. Input is clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Decelerate(factor) => {
                if factor == 1.0 {
                    let inv = 1.0 - t;
                    1.0 - inv * inv
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }

    /// Why this curve cannot drive a settle animation, if it cannot.
    #[must_use]
    pub fn invalid_reason(self) -> Option<String> {
        match self {
            Self::Decelerate(factor) if !factor.is_finite() || factor <= 0.0 => {
                Some(format!("easing.decelerate must be > 0, got {factor}"))
            }
            _ => None,
        }
    }
}

/// How long a programmatic slide takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlideDuration {
    /// 300 ms.
    #[default]
    Short,
    /// 600 ms.
    Long,
    /// Host-chosen duration.
    Custom(Duration),
}

impl SlideDuration {
    pub const SHORT: Duration = Duration::from_millis(300);
    pub const LONG: Duration = Duration::from_millis(600);
    /// Longest accepted custom duration.
    pub const MAX: Duration = Duration::from_secs(60);

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        match self {
            Self::Short => Self::SHORT,
            Self::Long => Self::LONG,
            Self::Custom(d) => d,
        }
    }

    /// Why this duration cannot drive a settle animation, if it cannot.
    #[must_use]
    pub fn invalid_reason(self) -> Option<String> {
        let duration = self.as_duration();
        (duration > Self::MAX).then(|| {
            format!(
                "slide_duration must be at most {}s, got {:?}",
                Self::MAX.as_secs(),
                duration
            )
        })
    }
}

/// One in-flight slide from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideAnimation {
    from: f32,
    to: f32,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    progress: f32,
}

impl SlideAnimation {
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            elapsed: Duration::ZERO,
            progress: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn from(&self) -> f32 {
        self.from
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> f32 {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Jump to an explicit progress and return the value there.
    pub fn seek(&mut self, progress: f32) -> f32 {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.elapsed =
            Duration::try_from_secs_f64(self.duration.as_secs_f64() * f64::from(self.progress))
                .unwrap_or(self.duration);
        self.value_at(self.progress)
    }

    /// Advance by `delta` of wall time and return the value reached.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.progress = if self.duration.is_zero() {
            1.0
        } else {
            let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
            (t as f32).min(1.0)
        };
        self.value_at(self.progress)
    }

    /// Value at `progress` without changing the animation.
    #[must_use]
    pub fn value_at(&self, progress: f32) -> f32 {
        if progress >= 1.0 {
            return self.to;
        }
        let eased = self.easing.apply(progress);
        let v = self.from + (self.to - self.from) * eased;
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        v.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn easings_hit_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Decelerate(1.0),
            Easing::Decelerate(1.5),
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn easings_are_monotonic() {
        for easing in [
            Easing::Linear,
            Easing::default(),
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-4, "{easing:?} not monotonic at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn decelerate_front_loads_motion() {
        let e = Easing::default();
        assert!(e.apply(0.5) > 0.5);
        assert!(e.apply(0.25) > Easing::Linear.apply(0.25));
    }

    #[test]
    fn durations() {
        assert_eq!(SlideDuration::Short.as_duration(), Duration::from_millis(300));
        assert_eq!(SlideDuration::Long.as_duration(), Duration::from_millis(600));
        assert_eq!(SlideDuration::Custom(MS_100).as_duration(), MS_100);
    }

    #[test]
    fn advance_reaches_target_exactly() {
        let mut anim = SlideAnimation::new(0.3, 1.0, SlideDuration::SHORT, Easing::default());
        let mut last = 0.3;
        for _ in 0..3 {
            last = anim.advance(MS_100);
        }
        assert!(anim.is_complete());
        assert_eq!(last, 1.0);
    }

    #[test]
    fn values_stay_between_endpoints() {
        let anim = SlideAnimation::new(0.8, 0.0, MS_100, Easing::EaseInOut);
        for i in 0..=50 {
            let v = anim.value_at(i as f32 / 50.0);
            assert!((0.0..=0.8).contains(&v), "value {v} escaped at step {i}");
        }
    }

    #[test]
    fn zero_duration_completes_on_first_advance() {
        let mut anim = SlideAnimation::new(0.0, 1.0, Duration::ZERO, Easing::Linear);
        assert_eq!(anim.advance(Duration::ZERO), 1.0);
        assert!(anim.is_complete());
    }

    #[test]
    fn seek_clamps_and_tracks_elapsed() {
        let mut anim = SlideAnimation::new(1.0, 0.0, MS_100, Easing::Linear);
        assert_eq!(anim.seek(-1.0), 1.0);
        assert_eq!(anim.seek(f32::NAN), 1.0);
        assert_eq!(anim.seek(0.5), 0.5);
        assert_eq!(anim.advance(Duration::from_millis(50)), 0.0);
        assert!(anim.is_complete());
    }

    #[test]
    fn seek_on_huge_duration_saturates() {
        let mut anim = SlideAnimation::new(0.0, 1.0, Duration::MAX, Easing::default());
        assert_eq!(anim.seek(0.5), Easing::default().apply(0.5));
        assert_eq!(anim.seek(1.0), 1.0);
        assert!(anim.is_complete());
    }

    #[test]
    fn invalid_reasons() {
        assert_eq!(Easing::default().invalid_reason(), None);
        assert_eq!(Easing::Linear.invalid_reason(), None);
        assert!(Easing::Decelerate(f32::NAN).invalid_reason().is_some());
        assert!(Easing::Decelerate(0.0).invalid_reason().is_some());

        assert_eq!(SlideDuration::Long.invalid_reason(), None);
        assert_eq!(SlideDuration::Custom(SlideDuration::MAX).invalid_reason(), None);
        let reason = SlideDuration::Custom(Duration::MAX).invalid_reason().unwrap();
        assert!(reason.contains("slide_duration"));
    }
}
