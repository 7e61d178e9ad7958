//! Replay harness end to end: bundled scenarios, recorded traces and the CLI
//! dispatch with captured output.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use slidepanel_core::trace::{PointerTrace, PointerTraceWriter};
use slidepanel_core::{
    DragExtent, Orientation, PanelConfig, PanelState, PointerEvent, SlidingPanel,
};
use slidepanel_replay::cli::{Cli, Commands, ConfigArgs, RunArgs, TraceArgs, load_config};
use slidepanel_replay::replay::GestureSummary;
use slidepanel_replay::{ReplayError, Replayer, Scenario, run_with_output};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn cli(command: Commands) -> Cli {
    Cli {
        log: None,
        json_errors: false,
        command,
    }
}

fn output_lines(command: Commands) -> Vec<serde_json::Value> {
    let mut out = Vec::new();
    run_with_output(cli(command), &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn flick_up_scenario_expands() {
    let scenario = Scenario::from_path(scenario_path("flick_up.json")).unwrap();
    let report = Replayer::run(&scenario).unwrap();

    assert_eq!(
        report.gestures,
        GestureSummary {
            started: 1,
            pending: 1,
            dragged: 3,
            settling: 1,
            ..GestureSummary::default()
        }
    );
    assert_eq!(report.final_state, PanelState::Expanded);
    assert_eq!(report.final_value, 1.0);

    let states: Vec<PanelState> = report.notifications.iter().map(|n| n.state).collect();
    assert_eq!(states.first(), Some(&PanelState::Collapsed));
    assert_eq!(states.last(), Some(&PanelState::Expanded));
    assert!(
        states[1..states.len() - 1]
            .iter()
            .all(|s| *s == PanelState::Sliding)
    );
}

#[test]
fn snap_back_scenario_collapses_then_tap_toggles() {
    let scenario = Scenario::from_path(scenario_path("snap_back.json")).unwrap();
    let report = Replayer::run(&scenario).unwrap();

    let collapsed_at: Vec<u64> = report
        .notifications
        .iter()
        .filter(|n| n.state == PanelState::Collapsed)
        .map(|n| n.t_ms)
        .collect();
    // Initial layout, then the snap-back finishing after a 600 ms settle.
    assert_eq!(collapsed_at.len(), 2);
    assert!(collapsed_at[1] >= 40 + 600);

    assert_eq!(report.gestures.taps, 1);
    assert_eq!(report.final_state, PanelState::Expanded);
}

#[test]
fn replay_is_deterministic() {
    let scenario = Scenario::from_path(scenario_path("snap_back.json")).unwrap();
    let first = Replayer::run(&scenario).unwrap();
    let second = Replayer::run(&scenario).unwrap();
    assert_eq!(first, second);
}

#[test]
fn run_command_prints_jsonl() {
    let lines = output_lines(Commands::Run(RunArgs {
        scenario: scenario_path("flick_up.json"),
        frame_ms: None,
        pretty: false,
    }));
    let summary = lines.last().unwrap();
    assert_eq!(summary["summary"], "flick-up");
    assert_eq!(summary["final_state"], "expanded");
    assert_eq!(summary["notifications"], lines.len() - 1);
    assert_eq!(lines[0]["state"], "collapsed");
    assert_eq!(lines[0]["seq"], 0);
}

#[test]
fn frame_override_changes_frame_count() {
    let coarse = output_lines(Commands::Run(RunArgs {
        scenario: scenario_path("flick_up.json"),
        frame_ms: Some(50),
        pretty: false,
    }));
    let fine = output_lines(Commands::Run(RunArgs {
        scenario: scenario_path("flick_up.json"),
        frame_ms: None,
        pretty: false,
    }));
    let frames = |lines: &[serde_json::Value]| lines.last().unwrap()["frames"].as_u64().unwrap();
    assert!(frames(&coarse) < frames(&fine));
}

#[test]
fn recorded_trace_replays_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gesture.jsonl");
    let extent = DragExtent::new(0.0, 100.0).unwrap();
    let ms = Duration::from_millis;

    let mut writer = PointerTraceWriter::create(&path, "recorded-drag", extent).unwrap();
    for event in [
        PointerEvent::down(0.0, 100.0, ms(0)),
        PointerEvent::moved(0.0, 80.0, ms(16)),
        PointerEvent::moved(0.0, 55.0, ms(32)),
        PointerEvent::up(0.0, 55.0, ms(40)),
    ] {
        writer.record(&event).unwrap();
    }
    writer.finish().unwrap();

    let lines = output_lines(Commands::Trace(TraceArgs {
        trace: path,
        config: None,
        extent: None,
        frame_ms: 16,
        pretty: false,
    }));
    let summary = lines.last().unwrap();
    assert_eq!(summary["summary"], "recorded-drag");
    assert_eq!(summary["gestures"]["settling"], 1);
    assert_eq!(summary["final_state"], "expanded");
}

#[test]
fn sub_millisecond_trace_resolves_like_the_live_gesture() {
    let extent = DragExtent::new(0.0, 100.0).unwrap();
    let config = PanelConfig::new().initial_state(PanelState::Expanded);
    let us = Duration::from_micros;
    let events = [
        PointerEvent::down(0.0, 0.0, us(0)),
        PointerEvent::moved(0.0, 50.0, us(400)),
        PointerEvent::up(0.0, 50.0, us(800)),
    ];

    let mut live = SlidingPanel::new(config.clone()).unwrap();
    live.apply_layout(extent);
    for event in &events {
        live.handle_pointer(event).unwrap();
    }
    while live.advance(Duration::from_millis(16)).unwrap().is_running() {}
    assert_eq!(live.state(), PanelState::Collapsed);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fast.jsonl");
    let mut writer = PointerTraceWriter::create(&path, "fast-drag", extent).unwrap();
    for event in &events {
        writer.record(event).unwrap();
    }
    writer.finish().unwrap();

    let trace = PointerTrace::open(&path).unwrap();
    let scenario = Scenario::from_trace("fast-drag", &trace, extent, config, 16).unwrap();
    let report = Replayer::run(&scenario).unwrap();
    assert_eq!(report.final_state, live.state());
    assert_eq!(report.final_value, live.value());
}

#[test]
fn trace_without_header_needs_extent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.jsonl");
    std::fs::write(
        &path,
        "{\"event\":\"pointer\",\"ts_us\":0,\"kind\":\"down\",\"x\":0.0,\"y\":10.0}\n",
    )
    .unwrap();

    let mut out = Vec::new();
    let err = run_with_output(
        cli(Commands::Trace(TraceArgs {
            trace: path.clone(),
            config: None,
            extent: None,
            frame_ms: 16,
            pretty: false,
        })),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, ReplayError::MissingExtent { .. }));
    assert_eq!(err.exit_code(), 2);

    let lines = output_lines(Commands::Trace(TraceArgs {
        trace: path,
        config: None,
        extent: Some(DragExtent::new(0.0, 10.0).unwrap()),
        frame_ms: 16,
        pretty: false,
    }));
    assert_eq!(lines.last().unwrap()["gestures"]["started"], 1);
}

#[test]
fn toml_config_is_loaded_and_printed() {
    let config = load_config(&scenario_path("panel.toml")).unwrap();
    assert_eq!(config.initial_state, PanelState::Expanded);
    assert_eq!(config.orientation, Orientation::Horizontal);
    assert!(!config.toggle_on_tap);

    let mut out = Vec::new();
    run_with_output(
        cli(Commands::Config(ConfigArgs {
            path: scenario_path("panel.toml"),
        })),
        &mut out,
    )
    .unwrap();
    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["initial_state"], "expanded");
    assert_eq!(printed["touch_slop"], 16.0);
}

#[test]
fn invalid_json_config_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"touch_slop": -4.0}"#).unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ReplayError::Config(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_scenario_is_io_error() {
    let mut out = Vec::new();
    let err = run_with_output(
        cli(Commands::Run(RunArgs {
            scenario: scenario_path("does_not_exist.json"),
            frame_ms: None,
            pretty: false,
        })),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, ReplayError::Io(_)));
    assert_eq!(err.exit_code(), 1);
}
