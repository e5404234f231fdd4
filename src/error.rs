use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Central error type for the yt-stems crate.
#[derive(Debug, Error)]
pub enum StemsError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // External tools
    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Expected output file was not produced: {}", .0.display())]
    MissingOutput(PathBuf),

    // Libraries
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StemsError>;
