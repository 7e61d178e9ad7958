//! Scenario files: a panel configuration, a drag extent and a scripted list
//! of host actions.
//!
//! Pointer samples carry microsecond timestamps, the resolution of recorded
//! traces, so samples inside one millisecond keep their spacing and the
//! release velocity matches the live gesture.
//!
//! ```json
//! {
//!   "name": "flick-up",
//!   "extent": [0.0, 100.0],
//!   "steps": [
//!     { "op": "pointer", "t_us": 0,     "kind": "down", "x": 0.0, "y": 100.0 },
//!     { "op": "pointer", "t_us": 16000, "kind": "move", "x": 0.0, "y": 60.0 },
//!     { "op": "pointer", "t_us": 24000, "kind": "up",   "x": 0.0, "y": 60.0 }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use slidepanel_core::trace::PointerTrace;
use slidepanel_core::{DragExtent, PanelConfig, PanelState, PointerEvent, PointerKind};

use crate::error::{ReplayError, Result};

/// Frame interval used when a scenario does not specify one.
pub const DEFAULT_FRAME_MS: u64 = 16;

fn default_frame_ms() -> u64 {
    DEFAULT_FRAME_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: PanelConfig,
    /// `[min, max]` reported by the first layout pass.
    pub extent: (f32, f32),
    /// Animation frame interval of the host clock.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Pointer sample delivered at `t_us` microseconds on the host clock.
    Pointer {
        t_us: u64,
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    /// A new layout pass with a re-measured extent.
    Layout { min: f32, max: f32 },
    SlideTo { state: PanelState },
    Toggle,
    SetValue { value: f32 },
    /// Let `ms` of host time pass.
    Advance { ms: u64 },
    /// Run frames until no animation is in flight.
    Settle,
}

impl Step {
    #[must_use]
    pub fn from_event(event: &PointerEvent) -> Self {
        Self::Pointer {
            t_us: u64::try_from(event.timestamp.as_micros()).unwrap_or(u64::MAX),
            kind: event.kind,
            x: event.position.x,
            y: event.position.y,
        }
    }
}

impl Scenario {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Build a scenario that replays a recorded pointer trace.
    ///
    /// `extent` overrides the extent recorded in the trace header.
    pub fn from_trace(
        name: impl Into<String>,
        trace: &PointerTrace,
        extent: DragExtent,
        config: PanelConfig,
        frame_ms: u64,
    ) -> Result<Self> {
        let scenario = Self {
            name: name.into(),
            config,
            extent: (extent.min(), extent.max()),
            frame_ms,
            steps: trace.events().iter().map(Step::from_event).collect(),
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// The extent of the first layout pass.
    pub fn drag_extent(&self) -> Result<DragExtent> {
        Ok(DragExtent::new(self.extent.0, self.extent.1)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(ReplayError::invalid("frame_ms must be > 0"));
        }
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(ReplayError::invalid(errors.join("; ")));
        }
        self.drag_extent()
            .map_err(|e| ReplayError::invalid(e.to_string()))?;

        let mut last_t = 0;
        for (index, step) in self.steps.iter().enumerate() {
            let Step::Pointer { t_us, .. } = *step else {
                continue;
            };
            if t_us < last_t {
                return Err(ReplayError::invalid(format!(
                    "step {index}: pointer time {t_us} us goes backwards (previous {last_t} us)"
                )));
            }
            last_t = t_us;
        }
        Ok(())
    }
}
