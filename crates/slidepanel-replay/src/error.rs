use std::path::PathBuf;

use slidepanel_core::{ConfigError, SlideError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("panel rejected step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: SlideError,
    },

    #[error("panel error: {0}")]
    Slide(#[from] SlideError),

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },

    #[error("trace has no drag extent; pass --extent: {path}")]
    MissingExtent { path: PathBuf },
}

impl ReplayError {
    /// 2 for bad input files, 3 when the panel rejected a step, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidScenario { .. } | Self::MissingExtent { .. } => 2,
            Self::Step { .. } | Self::Slide(_) => 3,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }
}
