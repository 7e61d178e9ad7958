//! Deterministic scenario driver.
//!
//! [`Replayer`] plays a [`Scenario`] against a fresh [`SlidingPanel`] on a
//! simulated host clock. The clock counts microseconds, like recorded pointer
//! timestamps. Animation frames are advanced in fixed `frame_ms` steps between
//! pointer samples, so the same scenario always yields the same notification
//! sequence regardless of wall time.

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use slidepanel_core::{
    DragExtent, GestureOutcome, PanelState, Point, PointerEvent, SlideError, SlidingPanel,
};
use tracing::{debug, info};

use crate::error::{ReplayError, Result};
use crate::scenario::{Scenario, Step};

/// One listener callback as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Notification {
    pub seq: usize,
    /// Host clock in whole milliseconds.
    pub t_ms: u64,
    pub value: f32,
    pub state: PanelState,
}

/// Per-outcome counts of handled pointer events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GestureSummary {
    pub started: usize,
    pub pending: usize,
    pub dragged: usize,
    pub settling: usize,
    pub released: usize,
    pub taps: usize,
    pub ignored: usize,
}

impl GestureSummary {
    fn record(&mut self, outcome: GestureOutcome) {
        let slot = match outcome {
            GestureOutcome::Started => &mut self.started,
            GestureOutcome::Pending => &mut self.pending,
            GestureOutcome::Dragged { .. } => &mut self.dragged,
            GestureOutcome::Settling { .. } => &mut self.settling,
            GestureOutcome::Released => &mut self.released,
            GestureOutcome::Tap => &mut self.taps,
            GestureOutcome::Ignored => &mut self.ignored,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub name: String,
    pub frames: u64,
    pub duration_ms: u64,
    pub gestures: GestureSummary,
    pub notifications: Vec<Notification>,
    pub final_value: f32,
    pub final_state: PanelState,
}

impl ReplayReport {
    /// One JSON line per notification followed by a summary line.
    pub fn write_jsonl(&self, out: &mut impl Write) -> Result<()> {
        for notification in &self.notifications {
            serde_json::to_writer(&mut *out, notification)?;
            out.write_all(b"\n")?;
        }
        let summary = serde_json::json!({
            "summary": self.name,
            "frames": self.frames,
            "duration_ms": self.duration_ms,
            "gestures": self.gestures,
            "notifications": self.notifications.len(),
            "final_value": self.final_value,
            "final_state": self.final_state,
        });
        serde_json::to_writer(&mut *out, &summary)?;
        out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_pretty(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

pub struct Replayer {
    name: String,
    panel: SlidingPanel,
    frame_us: u64,
    clock_us: Rc<Cell<u64>>,
    frames: u64,
    gestures: GestureSummary,
    log: Rc<RefCell<Vec<Notification>>>,
}

impl Replayer {
    /// Build the panel, subscribe the recorder and run the first layout pass.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        scenario.validate()?;
        let mut panel = SlidingPanel::new(scenario.config.clone())?;

        let clock_us = Rc::new(Cell::new(0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let (clock, sink) = (Rc::clone(&clock_us), Rc::clone(&log));
        panel.subscribe(move |value, state| {
            let mut log = sink.borrow_mut();
            let seq = log.len();
            log.push(Notification {
                seq,
                t_ms: clock.get() / 1000,
                value,
                state,
            });
        });
        panel.apply_layout(scenario.drag_extent()?);

        Ok(Self {
            name: scenario.name.clone(),
            panel,
            frame_us: scenario.frame_ms.saturating_mul(1000),
            clock_us,
            frames: 0,
            gestures: GestureSummary::default(),
            log,
        })
    }

    /// Play every step, settle any trailing animation, and report.
    pub fn run(scenario: &Scenario) -> Result<ReplayReport> {
        let mut replayer = Self::new(scenario)?;
        info!(
            name = %scenario.name,
            steps = scenario.steps.len(),
            frame_ms = scenario.frame_ms,
            "replaying scenario"
        );
        for (index, step) in scenario.steps.iter().enumerate() {
            replayer
                .step(step)
                .map_err(|source| ReplayError::Step { step: index, source })?;
        }
        replayer.settle()?;
        Ok(replayer.finish())
    }

    #[must_use]
    pub fn panel(&self) -> &SlidingPanel {
        &self.panel
    }

    /// Host clock in microseconds.
    #[must_use]
    pub fn now_us(&self) -> u64 {
        self.clock_us.get()
    }

    pub fn step(&mut self, step: &Step) -> std::result::Result<(), SlideError> {
        match *step {
            Step::Pointer { t_us, kind, x, y } => {
                self.advance_to(t_us)?;
                let event = PointerEvent::new(kind, Point::new(x, y), Duration::from_micros(t_us));
                let outcome = self.panel.handle_pointer(&event)?;
                debug!(t_us, ?kind, ?outcome, "pointer replayed");
                self.gestures.record(outcome);
            }
            Step::Layout { min, max } => {
                self.panel.apply_layout(DragExtent::new(min, max)?);
            }
            Step::SlideTo { state } => {
                self.panel.slide_to(state)?;
            }
            Step::Toggle => {
                self.panel.toggle()?;
            }
            Step::SetValue { value } => {
                self.panel.set_value(value)?;
            }
            Step::Advance { ms } => {
                self.advance_to(self.now_us().saturating_add(ms.saturating_mul(1000)))?;
            }
            Step::Settle => self.settle()?,
        }
        Ok(())
    }

    /// Run frames until no animation is in flight.
    pub fn settle(&mut self) -> std::result::Result<(), SlideError> {
        while self.panel.is_animating() {
            self.frame()?;
        }
        Ok(())
    }

    /// Let host time pass up to `t_us`, running whole frames while animating.
    fn advance_to(&mut self, t_us: u64) -> std::result::Result<(), SlideError> {
        while self.panel.is_animating() && self.now_us() + self.frame_us <= t_us {
            self.frame()?;
        }
        if t_us > self.now_us() {
            self.clock_us.set(t_us);
        }
        Ok(())
    }

    fn frame(&mut self) -> std::result::Result<(), SlideError> {
        self.clock_us.set(self.now_us() + self.frame_us);
        self.frames += 1;
        self.panel.advance(Duration::from_micros(self.frame_us))?;
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> ReplayReport {
        let notifications = self.log.borrow().clone();
        ReplayReport {
            name: self.name,
            frames: self.frames,
            duration_ms: self.clock_us.get() / 1000,
            gestures: self.gestures,
            notifications,
            final_value: self.panel.value(),
            final_state: self.panel.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use slidepanel_core::{PanelConfig, PointerKind};

    use super::*;

    fn scenario(steps: Vec<Step>) -> Scenario {
        Scenario {
            name: "test".into(),
            config: PanelConfig::default(),
            extent: (0.0, 100.0),
            frame_ms: 16,
            steps,
        }
    }

    fn pointer(t_ms: u64, kind: PointerKind, y: f32) -> Step {
        Step::Pointer {
            t_us: t_ms * 1000,
            kind,
            x: 0.0,
            y,
        }
    }

    #[test]
    fn layout_notifies_initial_state() {
        let report = Replayer::run(&scenario(Vec::new())).unwrap();
        assert_eq!(report.notifications.len(), 1);
        assert_eq!(report.notifications[0].state, PanelState::Collapsed);
        assert_eq!(report.frames, 0);
    }

    #[test]
    fn trailing_animation_is_settled() {
        let report = Replayer::run(&scenario(vec![Step::SlideTo {
            state: PanelState::Expanded,
        }]))
        .unwrap();
        assert_eq!(report.final_state, PanelState::Expanded);
        assert_eq!(report.frames, 19);
        assert_eq!(report.duration_ms, 19 * 16);
        let last = report.notifications.last().unwrap();
        assert_eq!((last.value, last.state), (1.0, PanelState::Expanded));
    }

    #[test]
    fn frames_run_between_pointer_samples() {
        let report = Replayer::run(&scenario(vec![
            Step::SlideTo {
                state: PanelState::Expanded,
            },
            pointer(100, PointerKind::Down, 50.0),
        ]))
        .unwrap();
        // Six frames (96 ms) elapse before the pointer goes down at 100 ms.
        let before_down: Vec<_> = report
            .notifications
            .iter()
            .filter(|n| n.t_ms > 0 && n.t_ms <= 100)
            .collect();
        assert_eq!(before_down.len(), 6);
        assert_eq!(report.gestures.started, 1);
    }

    #[test]
    fn gestures_are_counted() {
        let report = Replayer::run(&scenario(vec![
            pointer(0, PointerKind::Down, 100.0),
            pointer(16, PointerKind::Move, 99.0),
            pointer(32, PointerKind::Move, 60.0),
            pointer(40, PointerKind::Up, 60.0),
            pointer(50, PointerKind::Move, 10.0),
        ]))
        .unwrap();
        assert_eq!(
            report.gestures,
            GestureSummary {
                started: 1,
                pending: 1,
                dragged: 1,
                settling: 1,
                ignored: 1,
                ..GestureSummary::default()
            }
        );
        assert_eq!(report.final_state, PanelState::Expanded);
    }

    #[test]
    fn rejected_step_reports_its_index() {
        let err = Replayer::run(&scenario(vec![
            Step::Toggle,
            Step::SetValue { value: 2.0 },
        ]))
        .unwrap_err();
        assert!(matches!(err, ReplayError::Step { step: 1, .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn jsonl_ends_with_summary() {
        let report = Replayer::run(&scenario(vec![Step::Toggle])).unwrap();
        let mut out = Vec::new();
        report.write_jsonl(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), report.notifications.len() + 1);
        let summary: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert_eq!(summary["summary"], "test");
        assert_eq!(summary["final_state"], "expanded");
    }
}
