#![forbid(unsafe_code)]

//! Slide controller: the authoritative slide value and its derived state.
//!
//! [`SlideController`] owns the normalized slide value, the in-flight settle
//! animation (at most one) and the listener registry. Every change of value,
//! whether it comes from a drag, an animation tick, or a direct set, funnels
//! through one private path that validates, projects the state, and notifies.
//!
//! # Notification rules
//!
//! - While the projected state is `Sliding`, every value-setting call
//!   notifies, even when the number did not change.
//! - `Collapsed` and `Expanded` notify only when they differ from the last
//!   state that was notified (edge-triggered).
//!
//! # Invariants
//!
//! 1. `state()` always equals `PanelState::from_value(value())`.
//! 2. A rejected value leaves value, state and animation untouched.
//! 3. Any new drag update, direct set, or slide command supersedes the
//!    previous animation; animations never queue.
//!
//! # Failure Modes
//!
//! - `InvalidValue`: value outside `[0, 1]` or NaN.
//! - `InvalidTransition`: `slide_to(Sliding)` or a `Sliding` initial state.
//! - `MissingExtent`: drag update before the layout host measured the panel.
//! - `InvalidConfig`: a config, easing or duration that fails validation.
//!   The animation driver also reports `InvalidValue` instead of dropping a
//!   frame silently.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::animation::{Easing, SlideAnimation, SlideDuration};
use crate::config::PanelConfig;
use crate::error::{Result, SlideError};
use crate::geometry::DragExtent;
use crate::listener::{ListenerId, ListenerRegistry, SlideListener};
use crate::state::{PanelState, SlideValue};

/// Result of driving the animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStatus {
    /// No animation was in flight.
    Idle,
    /// The animation moved to `value` and continues.
    Running { value: f32 },
    /// The animation reached its target `value` and was dropped.
    Finished { value: f32 },
}

impl AnimationStatus {
    #[inline]
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

#[derive(Debug)]
pub struct SlideController {
    value: SlideValue,
    extent: DragExtent,
    last_notified: Option<PanelState>,
    animation: Option<SlideAnimation>,
    slide_duration: SlideDuration,
    easing: Easing,
    listeners: ListenerRegistry,
}

impl Default for SlideController {
    fn default() -> Self {
        Self {
            value: SlideValue::COLLAPSED,
            extent: DragExtent::UNMEASURED,
            last_notified: None,
            animation: None,
            slide_duration: SlideDuration::default(),
            easing: Easing::default(),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl SlideController {
    /// Create a controller resting in `initial`.
    ///
    /// Nothing is notified until the first value change or [`resync`](Self::resync).
    pub fn new(initial: PanelState) -> Result<Self> {
        let value = initial
            .resting_value()
            .ok_or(SlideError::InvalidTransition { target: initial })?;
        Ok(Self {
            value,
            ..Self::default()
        })
    }

    /// Create a controller from host configuration.
    ///
    /// The configuration is validated first; every violation is reported in
    /// one `InvalidConfig` error.
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        let mut controller = Self::new(config.initial_state)?;
        let errors = config.validate();
        if !errors.is_empty() {
            let reason = errors.join("; ");
            warn!(%reason, "rejected panel config");
            return Err(SlideError::InvalidConfig { reason });
        }
        controller.slide_duration = config.slide_duration;
        controller.easing = config.easing;
        Ok(controller)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value.get()
    }

    #[inline]
    #[must_use]
    pub fn slide_value(&self) -> SlideValue {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.value.state()
    }

    #[inline]
    #[must_use]
    pub fn extent(&self) -> DragExtent {
        self.extent
    }

    /// Pixel coordinate of the sliding pane for the current value.
    pub fn raw_position(&self) -> Result<f32> {
        self.extent.denormalize(self.value.get())
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn animation(&self) -> Option<&SlideAnimation> {
        self.animation.as_ref()
    }

    #[must_use]
    pub fn slide_duration(&self) -> SlideDuration {
        self.slide_duration
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Replace the travel bounds. The slide value is not touched.
    pub fn set_drag_extent(&mut self, extent: DragExtent) {
        if extent != self.extent {
            debug!(min = extent.min(), max = extent.max(), "drag extent updated");
        }
        self.extent = extent;
    }

    /// Applies to animations started after this call.
    pub fn set_slide_duration(&mut self, duration: SlideDuration) -> Result<()> {
        if let Some(reason) = duration.invalid_reason() {
            return Err(SlideError::InvalidConfig { reason });
        }
        self.slide_duration = duration;
        Ok(())
    }

    /// Applies to animations started after this call.
    pub fn set_easing(&mut self, easing: Easing) -> Result<()> {
        if let Some(reason) = easing.invalid_reason() {
            return Err(SlideError::InvalidConfig { reason });
        }
        self.easing = easing;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Shared handle to the registry. Clones may be moved into callbacks.
    #[must_use]
    pub fn listeners(&self) -> ListenerRegistry {
        self.listeners.clone()
    }

    pub fn add_listener(&self, listener: SlideListener) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn subscribe(&self, f: impl Fn(f32, PanelState) + 'static) -> ListenerId {
        self.listeners.subscribe(f)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // -----------------------------------------------------------------------
    // Value-setting commands
    // -----------------------------------------------------------------------

    /// Set the slide value directly, cancelling any animation.
    pub fn set_value(&mut self, value: f32) -> Result<()> {
        let value = Self::checked(value)?;
        self.cancel_animation();
        self.apply(value);
        Ok(())
    }

    /// Apply a raw drag coordinate: clamp into the extent, normalize, set.
    pub fn update_from_drag(&mut self, raw_coordinate: f32) -> Result<()> {
        let normalized = self.extent.normalize(raw_coordinate).inspect_err(|_| {
            warn!(raw_coordinate, "drag update before extent was measured");
        })?;
        let value = Self::checked(normalized)?;
        self.cancel_animation();
        trace!(raw_coordinate, value = value.get(), "drag update");
        self.apply(value);
        Ok(())
    }

    /// Animate to a settled state.
    ///
    /// Returns `Ok(false)` without animating or notifying when the panel is
    /// already in `target`; an in-flight animation is still cancelled so the
    /// panel stays where the caller asked.
    pub fn slide_to(&mut self, target: PanelState) -> Result<bool> {
        let Some(resting) = target.resting_value() else {
            warn!("rejected slide to Sliding");
            return Err(SlideError::InvalidTransition { target });
        };
        if target == self.state() {
            self.cancel_animation();
            return Ok(false);
        }
        self.start_animation(resting);
        Ok(true)
    }

    /// Animate to an arbitrary normalized value.
    pub fn animate_to(&mut self, target: f32) -> Result<()> {
        let target = Self::checked(target)?;
        if target == self.value {
            self.cancel_animation();
            return Ok(());
        }
        self.start_animation(target);
        Ok(())
    }

    /// `Expanded` collapses; every other state, including `Sliding`, expands.
    pub fn toggle(&mut self) -> Result<bool> {
        let target = if self.state() == PanelState::Expanded {
            PanelState::Collapsed
        } else {
            PanelState::Expanded
        };
        self.slide_to(target)
    }

    /// Re-apply the settled state after a layout pass.
    ///
    /// A settled panel re-asserts its resting value, which notifies the host
    /// the first time (nothing was notified before). A sliding panel is left
    /// where it is.
    pub fn resync(&mut self) {
        if let Some(resting) = self.state().resting_value() {
            self.apply(resting);
        }
    }

    // -----------------------------------------------------------------------
    // Animation driving
    // -----------------------------------------------------------------------

    /// Drive the animation to an explicit progress in `[0, 1]`.
    ///
    /// An interpolated value outside `[0, 1]` drops the animation and is
    /// returned as `InvalidValue`; the slide value is left untouched.
    pub fn tick(&mut self, progress: f32) -> Result<AnimationStatus> {
        self.drive(|anim| anim.seek(progress))
    }

    /// Drive the animation by elapsed wall time. Fails like [`tick`](Self::tick).
    pub fn advance(&mut self, delta: Duration) -> Result<AnimationStatus> {
        self.drive(|anim| anim.advance(delta))
    }

    /// Drop the in-flight animation, leaving the value where it is.
    pub fn cancel_animation(&mut self) {
        if let Some(anim) = self.animation.take() {
            debug!(
                to = anim.to(),
                progress = anim.progress(),
                "slide animation superseded"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn checked(value: f32) -> Result<SlideValue> {
        SlideValue::new(value).inspect_err(|_| {
            warn!(value, "rejected slide value outside [0, 1]");
        })
    }

    fn start_animation(&mut self, target: SlideValue) {
        self.cancel_animation();
        let duration = self.slide_duration.as_duration();
        debug!(
            from = self.value.get(),
            to = target.get(),
            duration_ms = duration.as_millis() as u64,
            "slide animation started"
        );
        self.animation = Some(SlideAnimation::new(
            self.value.get(),
            target.get(),
            duration,
            self.easing,
        ));
    }

    fn drive(
        &mut self,
        step: impl FnOnce(&mut SlideAnimation) -> f32,
    ) -> Result<AnimationStatus> {
        let Some(anim) = self.animation.as_mut() else {
            return Ok(AnimationStatus::Idle);
        };
        let next = step(anim);
        let finished = anim.is_complete();
        if finished {
            self.animation = None;
        }
        let value = match Self::checked(next) {
            Ok(value) => value,
            Err(err) => {
                self.animation = None;
                return Err(err);
            }
        };
        self.apply(value);
        Ok(if finished {
            debug!(value = value.get(), state = ?self.state(), "slide animation finished");
            AnimationStatus::Finished { value: value.get() }
        } else {
            AnimationStatus::Running { value: value.get() }
        })
    }

    /// The single path that mutates the value.
    fn apply(&mut self, value: SlideValue) {
        let previous = self.state();
        self.value = value;
        let state = value.state();
        if state != previous {
            debug!(from = ?previous, to = ?state, value = value.get(), "panel state changed");
        }
        if state == PanelState::Sliding || self.last_notified != Some(state) {
            self.last_notified = Some(state);
            self.listeners.notify(value.get(), state);
        }
    }
}
