//! Structured log output of the controller and gesture resolver.
//!
//! Captures events through a `tracing_subscriber` registry layer and checks
//! that state transitions, animation lifecycle, gesture resolution and
//! rejected inputs are reported with their fields.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slidepanel_core::{
    DragExtent, PanelConfig, PanelState, PointerEvent, SlideController, SlidingPanel,
};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(EventCapture {
            events: Arc::clone(&events),
        });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.message == message).collect()
}

fn laid_out() -> SlidingPanel {
    let mut panel = SlidingPanel::new(PanelConfig::default()).unwrap();
    panel.apply_layout(DragExtent::new(0.0, 100.0).unwrap());
    panel
}

#[test]
fn animation_lifecycle_is_logged() {
    let events = with_captured_events(|| {
        let mut panel = laid_out();
        panel.slide_to(PanelState::Expanded).unwrap();
        while panel.advance(Duration::from_millis(16)).unwrap().is_running() {}
    });

    let started = find(&events, "slide animation started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].level, tracing::Level::DEBUG);
    assert_eq!(started[0].fields.get("duration_ms").map(String::as_str), Some("300"));

    let finished = find(&events, "slide animation finished");
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].fields.get("state").map(String::as_str), Some("Expanded"));
}

#[test]
fn gesture_resolution_is_logged() {
    let events = with_captured_events(|| {
        let mut panel = laid_out();
        let ms = Duration::from_millis;
        panel.handle_pointer(&PointerEvent::down(0.0, 100.0, ms(0))).unwrap();
        panel.handle_pointer(&PointerEvent::moved(0.0, 70.0, ms(16))).unwrap();
        panel.handle_pointer(&PointerEvent::up(0.0, 70.0, ms(30))).unwrap();
    });

    assert_eq!(find(&events, "drag recognized").len(), 1);
    let resolved = find(&events, "gesture resolved");
    assert_eq!(resolved.len(), 1);
    assert_eq!(
        resolved[0].fields.get("direction").map(String::as_str),
        Some("TowardMin")
    );
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::TRACE && e.message == "drag update")
    );
}

#[test]
fn rejected_value_is_warned() {
    let events = with_captured_events(|| {
        let mut panel = laid_out();
        assert!(panel.set_value(1.5).is_err());
    });
    let warned: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warned.len(), 1);
    assert!(warned[0].message.contains("rejected slide value"));
}

#[test]
fn drag_before_layout_is_warned() {
    let events = with_captured_events(|| {
        let mut controller = SlideController::default();
        assert!(controller.update_from_drag(10.0).is_err());
    });
    let warned = find(&events, "drag update before extent was measured");
    assert_eq!(warned.len(), 1);
    assert_eq!(warned[0].level, tracing::Level::WARN);
}
