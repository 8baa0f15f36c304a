use std::path::PathBuf;

use thiserror::Error;

/// Failures while composing one verse video
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("No background clip found in {0:?}")]
    NoBackgroundClip(PathBuf),

    #[error("Narration audio not found: {0:?}")]
    MissingNarration(PathBuf),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Encoder failed: {0}")]
    EncoderFailed(String),

    #[error("Could not determine media duration: {0}")]
    Probe(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
