//! Error types shared across the tracking and analysis pipeline.

use thiserror::Error;

use crate::analysis::AnalysisMode;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by an external adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// External call boundary an [`Error::Adapter`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterStage {
    Seek,
    Detect,
    Classify,
}

impl std::fmt::Display for AdapterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Seek => "frame source seek",
            Self::Detect => "detector",
            Self::Classify => "secondary classifier",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    #[error("Invalid session format: {0}")]
    Format(String),

    #[error("{stage} failed: {source}")]
    Adapter {
        stage: AdapterStage,
        #[source]
        source: BoxError,
    },

    #[error("Cannot {operation} while analysis is {mode}")]
    InvalidState {
        operation: &'static str,
        mode: AnalysisMode,
    },

    #[error("Invalid analysis range: {0}")]
    InvalidRange(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn invalid_detection<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDetection(msg.into())
    }

    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    pub fn adapter<E>(stage: AdapterStage, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Adapter {
            stage,
            source: Box::new(source),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
