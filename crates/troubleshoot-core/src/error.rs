//! Error types for the troubleshooting scenarios
//!
//! Covers:
//! - Invocation failures reported back to the dispatching trigger
//! - Configuration loading and validation
//!
//! The CRASH fault is deliberately absent: it never becomes a value,
//! see [`crate::fault::Crash`].

use std::path::PathBuf;

/// Failure of a single invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// The message carried no usable payload
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HandlerError {
    /// Error raised when an invocation arrives without a body
    #[inline]
    #[must_use]
    pub fn missing_body() -> Self {
        Self::InvalidInput("Body is null".to_string())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::AppConfig`]
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Environment override could not be parsed
    #[error("invalid value for {key}: '{value}'")]
    Env { key: String, value: String },

    /// `TROUBLESHOOT_*` variable that names no setting
    #[error("unknown environment override {key}")]
    UnknownEnv { key: String },

    /// Value parsed but out of range
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

/// Top-level error for wiring and running the scenarios
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be resolved
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An invocation failed
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    /// Listener or signal setup failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the trigger may keep firing after this error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Handler(_) => true,
            AppError::Config(_) => false,
            AppError::Io(_) => false,
        }
    }
}
