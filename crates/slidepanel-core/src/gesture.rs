#![forbid(unsafe_code)]

//! Gesture resolution: turns one pointer stream into slide updates and a
//! completion decision.
//!
//! [`GestureResolver`] follows a single pointer from `Down` to `Up`, `Cancel`
//! or `Outside`. While the pointer moves it feeds clamped raw coordinates to
//! [`SlideController::update_from_drag`]; when the gesture ends with the panel
//! mid-slide it picks a resting extent from the last movement direction and
//! hands the normalized target to [`SlideController::animate_to`].
//!
//! # State Machine
//!
//! ```text
//! Idle --Down--> Pressed --Move (< slop)--> Pressed
//!                Pressed --Move (> slop)--> Sliding --Move--> Sliding
//!                Pressed --Up--> Idle (Tap)
//!                Pressed --Outside--> Idle (ends gesture, ignores rest)
//!                Sliding --Outside--> Sliding (drag continues)
//!      Pressed|Sliding --Up|Cancel--> Idle (resolve if panel is Sliding)
//! ```
//!
//! # Invariants
//!
//! 1. Movements within a quarter of the touch slop never reach the controller,
//!    so a tap is never read as a drag.
//! 2. Once sliding is recognized it stays recognized until the gesture ends.
//! 3. A gesture that never recorded a direction resolves to nothing.
//! 4. After an `Outside` that ended the gesture, samples are ignored until the
//!    next `Down`.
//!
//! # Failure Modes
//!
//! - `MissingExtent` from `Down`, drag updates, or resolution when the layout
//!   host has not measured the panel. The resolver returns to idle.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::controller::SlideController;
use crate::error::Result;
use crate::geometry::{DragExtent, Orientation, Point};
use crate::state::PanelState;
use crate::velocity::{VELOCITY_UNITS_MS, Velocity, VelocityTracker};

/// The resolver starts sliding after `touch_slop / TOUCH_SLOP_DIVISOR` pixels.
pub const TOUCH_SLOP_DIVISOR: f32 = 4.0;

/// Below this value a `TowardMin` release snaps back to the max extent.
pub const SNAP_BACK_THRESHOLD: f32 = 0.1;

/// Above this value a `TowardMax` release snaps to the min extent.
pub const OVERSHOOT_THRESHOLD: f32 = 0.9;

// ---------------------------------------------------------------------------
// Pointer events
// ---------------------------------------------------------------------------

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    /// The pointer left the drag-sensitive region mid-gesture.
    Outside,
}

/// One pointer sample as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Host-relative timestamp.
    pub timestamp: Duration,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, position: Point, timestamp: Duration) -> Self {
        Self {
            kind,
            position,
            timestamp,
        }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerKind::Down, Point::new(x, y), timestamp)
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerKind::Move, Point::new(x, y), timestamp)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerKind::Up, Point::new(x, y), timestamp)
    }

    #[must_use]
    pub const fn cancel(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerKind::Cancel, Point::new(x, y), timestamp)
    }

    #[must_use]
    pub const fn outside(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerKind::Outside, Point::new(x, y), timestamp)
    }
}

// ---------------------------------------------------------------------------
// Direction and resolution
// ---------------------------------------------------------------------------

/// Movement direction along the dominant planar axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Up or left: coordinates decreasing. The expanding direction.
    TowardMin,
    /// Down or right: coordinates increasing. The collapsing direction.
    TowardMax,
}

impl Direction {
    /// Direction of the axis with the larger absolute velocity.
    #[must_use]
    pub fn from_velocity(velocity: Velocity) -> Self {
        let dominant = if velocity.x.abs() > velocity.y.abs() {
            velocity.x
        } else {
            velocity.y
        };
        if dominant > 0.0 {
            Self::TowardMax
        } else {
            Self::TowardMin
        }
    }
}

/// Where a released gesture settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub direction: Direction,
    /// Raw coordinate of the chosen extent bound.
    pub coordinate: f32,
    /// `coordinate` normalized against the extent.
    pub target: f32,
}

/// Pick the resting extent for a release at `value` moving in `direction`.
///
/// `TowardMin` settles on `min` unless the panel barely left the collapsed
/// edge (`value < 0.1`), which snaps back to `max`. `TowardMax` settles on
/// `max` unless the panel is nearly expanded (`value > 0.9`), which snaps to
/// `min`.
///
/// The target is the chosen bound normalized against `extent`; with
/// `min > 0` that is below 1.0 (see [`DragExtent`]).
pub fn resolve(direction: Direction, value: f32, extent: &DragExtent) -> Result<Resolution> {
    let coordinate = match direction {
        Direction::TowardMin if value < SNAP_BACK_THRESHOLD => extent.max(),
        Direction::TowardMin => extent.min(),
        Direction::TowardMax if value > OVERSHOOT_THRESHOLD => extent.min(),
        Direction::TowardMax => extent.max(),
    };
    let target = extent.normalize(coordinate)?;
    Ok(Resolution {
        direction,
        coordinate,
        target,
    })
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What one pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Not part of an active gesture.
    Ignored,
    /// A gesture began.
    Started,
    /// Pointer moved, but not beyond the slop.
    Pending,
    /// The panel followed the pointer to `value`.
    Dragged { value: f32 },
    /// The gesture ended and the panel is animating to `resolution.target`.
    Settling { resolution: Resolution },
    /// The gesture ended without moving the panel to a new rest.
    Released,
    /// Pointer went down and up without crossing the slop.
    Tap,
}

impl GestureOutcome {
    /// Whether the host should treat this event as consumed by the panel.
    #[inline]
    #[must_use]
    pub fn is_intercepted(self) -> bool {
        matches!(self, Self::Dragged { .. } | Self::Settling { .. })
    }
}

// ---------------------------------------------------------------------------
// GestureResolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    start_touch: f32,
    start_panel: f32,
    sliding: bool,
}

#[derive(Debug, Clone)]
pub struct GestureResolver {
    orientation: Orientation,
    slop: f32,
    tracker: VelocityTracker,
    active: Option<ActiveGesture>,
    last_direction: Option<Direction>,
    gone_outside: bool,
}

impl GestureResolver {
    /// `touch_slop` is the platform drag-recognition threshold; sliding
    /// starts after a quarter of it.
    #[must_use]
    pub fn new(orientation: Orientation, touch_slop: f32) -> Self {
        Self {
            orientation,
            slop: touch_slop / TOUCH_SLOP_DIVISOR,
            tracker: VelocityTracker::new(),
            active: None,
            last_direction: None,
            gone_outside: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Orientation is supplied by the layout host and may change between gestures.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Effective slop in pixels.
    #[inline]
    #[must_use]
    pub fn slop(&self) -> f32 {
        self.slop
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the current gesture has crossed the slop.
    #[inline]
    #[must_use]
    pub fn is_sliding(&self) -> bool {
        self.active.is_some_and(|g| g.sliding)
    }

    #[inline]
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Forget the current gesture without resolving it.
    pub fn reset(&mut self) {
        self.active = None;
        self.last_direction = None;
        self.gone_outside = false;
        self.tracker.clear();
    }

    /// Process one pointer event against `controller`.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        controller: &mut SlideController,
    ) -> Result<GestureOutcome> {
        match event.kind {
            PointerKind::Down => self.on_down(event, controller),
            PointerKind::Move => self.on_move(event, controller),
            PointerKind::Up => self.on_end(true, controller),
            PointerKind::Cancel => self.on_end(false, controller),
            PointerKind::Outside => self.on_outside(controller),
        }
    }
}

impl GestureResolver {
    fn on_down(
        &mut self,
        event: &PointerEvent,
        controller: &mut SlideController,
    ) -> Result<GestureOutcome> {
        self.reset();
        let start_panel = controller.raw_position()?;
        let start_touch = self.orientation.primary(event.position);
        self.tracker.add(event.position, event.timestamp);
        self.active = Some(ActiveGesture {
            start_touch,
            start_panel,
            sliding: false,
        });
        trace!(start_touch, start_panel, "gesture started");
        Ok(GestureOutcome::Started)
    }

    fn on_move(
        &mut self,
        event: &PointerEvent,
        controller: &mut SlideController,
    ) -> Result<GestureOutcome> {
        if self.gone_outside {
            return Ok(GestureOutcome::Ignored);
        }
        let Some(gesture) = self.active.as_mut() else {
            return Ok(GestureOutcome::Ignored);
        };

        self.tracker.add(event.position, event.timestamp);
        self.last_direction = Some(Direction::from_velocity(
            self.tracker.velocity(VELOCITY_UNITS_MS),
        ));

        let current = self.orientation.primary(event.position);
        if !gesture.sliding {
            if (current - gesture.start_touch).abs() <= self.slop {
                return Ok(GestureOutcome::Pending);
            }
            gesture.sliding = true;
            debug!(
                start_touch = gesture.start_touch,
                current,
                slop = self.slop,
                "drag recognized"
            );
        }

        let raw = gesture.start_panel - (gesture.start_touch - current);
        if let Err(err) = controller.update_from_drag(raw) {
            self.reset();
            return Err(err);
        }
        Ok(GestureOutcome::Dragged {
            value: controller.value(),
        })
    }

    fn on_end(&mut self, released: bool, controller: &mut SlideController) -> Result<GestureOutcome> {
        if self.gone_outside {
            self.reset();
            return Ok(GestureOutcome::Ignored);
        }
        let Some(gesture) = self.active.take() else {
            return Ok(GestureOutcome::Ignored);
        };
        self.tracker.clear();

        if released && !gesture.sliding {
            self.last_direction = None;
            return Ok(GestureOutcome::Tap);
        }
        self.complete(controller)
    }

    fn on_outside(&mut self, controller: &mut SlideController) -> Result<GestureOutcome> {
        if self.gone_outside {
            return Ok(GestureOutcome::Ignored);
        }
        match self.active {
            None => Ok(GestureOutcome::Ignored),
            Some(gesture) if gesture.sliding => Ok(GestureOutcome::Ignored),
            Some(_) => {
                debug!("pointer left drag region before sliding; ending gesture");
                self.active = None;
                self.tracker.clear();
                self.gone_outside = true;
                self.complete(controller)
            }
        }
    }

    fn complete(&mut self, controller: &mut SlideController) -> Result<GestureOutcome> {
        let direction = self.last_direction.take();
        if controller.state() != PanelState::Sliding {
            return Ok(GestureOutcome::Released);
        }
        let Some(direction) = direction else {
            return Ok(GestureOutcome::Released);
        };
        let resolution = resolve(direction, controller.value(), &controller.extent())?;
        debug!(
            ?direction,
            value = controller.value(),
            target = resolution.target,
            "gesture resolved"
        );
        controller.animate_to(resolution.target)?;
        Ok(GestureOutcome::Settling { resolution })
    }
}
