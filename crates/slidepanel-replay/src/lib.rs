#![forbid(unsafe_code)]

//! Replay harness for `slidepanel-core`.
//!
//! Plays scripted scenarios and recorded pointer traces against a
//! [`SlidingPanel`](slidepanel_core::SlidingPanel) on a simulated frame clock
//! and prints every listener notification, so gesture regressions can be
//! captured as files and diffed.

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;
pub mod scenario;

pub use cli::{run, run_from_env, run_with_output};
pub use error::{ReplayError, Result};
pub use replay::{ReplayReport, Replayer};
pub use scenario::{Scenario, Step};
