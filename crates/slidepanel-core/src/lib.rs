#![cfg_attr(not(test), forbid(unsafe_code))]

//! Core: slide-position state machine and gesture resolution for sliding panels.
//!
//! # Role in slidepanel
//! `slidepanel-core` is the engine behind a two-pane, bottom-sheet style
//! layout. It knows nothing about views or rendering. A layout host reports
//! the measured drag extent, forwards pointer events, and drives animation
//! frames; the engine keeps the normalized slide value and tells listeners
//! where the sliding pane should be.
//!
//! # Primary responsibilities
//! - **SlideController**: authoritative slide value, derived state, settle
//!   animations and edge-triggered notifications.
//! - **GestureResolver**: slop gating, drag tracking, direction from a
//!   trailing velocity window, and the release resolution rules.
//! - **SlidingPanel**: host facade combining both with [`PanelConfig`].
//! - **Geometry**: conversion between raw pixel coordinates and slide values.
//!
//! # Coordinates
//! Value `0.0` is collapsed and sits at the max extent; value `1.0` is
//! expanded and sits at the min extent. Moving the pointer toward smaller
//! coordinates expands the panel.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod listener;
pub mod panel;
pub mod state;
pub mod velocity;

#[cfg(feature = "event-trace")]
pub mod trace;

pub use animation::{Easing, SlideAnimation, SlideDuration};
pub use config::{ConfigError, PanelConfig};
pub use controller::{AnimationStatus, SlideController};
pub use error::{Result, SlideError};
pub use geometry::{DragExtent, Orientation, Point};
pub use gesture::{Direction, GestureOutcome, GestureResolver, PointerEvent, PointerKind, Resolution};
pub use listener::{ListenerId, ListenerRegistry, SlideListener};
pub use panel::SlidingPanel;
pub use state::{PanelState, SlideValue};
