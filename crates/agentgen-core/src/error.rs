//! Error types for agentgen

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {path}: turtle: {primary}; rdf/xml: {secondary}")]
    Parse {
        path: PathBuf,
        primary: String,
        secondary: String,
    },

    #[error("resolution error: {kind} - {message}")]
    Resolution { kind: String, message: String },

    #[error("emission error: {message}")]
    Emission { message: String },

    #[error("query error: {message}")]
    Query { message: String },

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(
        path: impl Into<PathBuf>,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn resolution(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn emission(message: impl Into<String>) -> Self {
        Self::Emission {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Short kind label used in batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Resolution { .. } => "resolution",
            Self::Emission { .. } => "emission",
            Self::Query { .. } => "query",
            Self::ConfigError(_) => "config",
            Self::IoError(_) => "io",
        }
    }
}
