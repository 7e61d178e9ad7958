#![forbid(unsafe_code)]

//! Host facade tying the controller and gesture resolver together.
//!
//! A layout host owns one [`SlidingPanel`] per panel view. It reports the
//! measured drag extent through [`SlidingPanel::apply_layout`], forwards raw
//! pointer events, and drives settle animations from its frame clock.
//!
//! ```
//! use std::time::Duration;
//! use slidepanel_core::{DragExtent, PanelConfig, PanelState, PointerEvent, SlidingPanel};
//!
//! let mut panel = SlidingPanel::new(PanelConfig::default()).unwrap();
//! panel.apply_layout(DragExtent::new(0.0, 100.0).unwrap());
//!
//! panel.handle_pointer(&PointerEvent::down(0.0, 100.0, Duration::ZERO)).unwrap();
//! panel.handle_pointer(&PointerEvent::moved(0.0, 40.0, Duration::from_millis(16))).unwrap();
//! assert_eq!(panel.state(), PanelState::Sliding);
//! ```

use std::time::Duration;

use tracing::debug;

use crate::animation::SlideDuration;
use crate::config::PanelConfig;
use crate::controller::{AnimationStatus, SlideController};
use crate::error::Result;
use crate::geometry::{DragExtent, Orientation};
use crate::gesture::{GestureOutcome, GestureResolver, PointerEvent};
use crate::listener::{ListenerId, ListenerRegistry, SlideListener};
use crate::state::PanelState;

#[derive(Debug)]
pub struct SlidingPanel {
    config: PanelConfig,
    controller: SlideController,
    resolver: GestureResolver,
}

impl SlidingPanel {
    /// Build a panel from configuration.
    ///
    /// A config that fails [`PanelConfig::validate`] is rejected with
    /// `InvalidConfig`, so the slop gate and the settle curve always work
    /// with finite numbers.
    pub fn new(config: PanelConfig) -> Result<Self> {
        let controller = SlideController::from_config(&config)?;
        let resolver = GestureResolver::new(config.orientation, config.touch_slop);
        Ok(Self {
            config,
            controller,
            resolver,
        })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &SlideController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &GestureResolver {
        &self.resolver
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.controller.value()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.controller.state()
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Pixel coordinate of the sliding pane.
    pub fn raw_position(&self) -> Result<f32> {
        self.controller.raw_position()
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Record a layout pass: new extent, then re-apply the settled state.
    pub fn apply_layout(&mut self, extent: DragExtent) {
        self.controller.set_drag_extent(extent);
        self.controller.resync();
    }

    /// Switch the sliding axis. Takes effect from the next gesture.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.resolver.set_orientation(orientation);
        self.resolver.reset();
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed one pointer event. A tap toggles the panel when enabled.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Result<GestureOutcome> {
        let outcome = self.resolver.handle(event, &mut self.controller)?;
        if outcome == GestureOutcome::Tap && self.config.toggle_on_tap {
            debug!(state = ?self.controller.state(), "tap toggles panel");
            self.controller.toggle()?;
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn slide_to(&mut self, target: PanelState) -> Result<bool> {
        self.controller.slide_to(target)
    }

    pub fn toggle(&mut self) -> Result<bool> {
        self.controller.toggle()
    }

    pub fn set_value(&mut self, value: f32) -> Result<()> {
        self.controller.set_value(value)
    }

    pub fn set_slide_duration(&mut self, duration: SlideDuration) -> Result<()> {
        self.controller.set_slide_duration(duration)?;
        self.config.slide_duration = duration;
        Ok(())
    }

    pub fn tick(&mut self, progress: f32) -> Result<AnimationStatus> {
        self.controller.tick(progress)
    }

    pub fn advance(&mut self, delta: Duration) -> Result<AnimationStatus> {
        self.controller.advance(delta)
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn listeners(&self) -> ListenerRegistry {
        self.controller.listeners()
    }

    pub fn add_listener(&self, listener: SlideListener) -> ListenerId {
        self.controller.add_listener(listener)
    }

    pub fn subscribe(&self, f: impl Fn(f32, PanelState) + 'static) -> ListenerId {
        self.controller.subscribe(f)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.controller.remove_listener(id)
    }
}
