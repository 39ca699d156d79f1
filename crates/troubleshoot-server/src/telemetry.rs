//! Tracing subscriber setup

use std::io::IsTerminal;

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use troubleshoot_core::LogConfig;

/// `RUST_LOG` if set, else the configured level, else `info`
#[must_use]
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber; fails if one is already installed
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config);
    if config.json {
        fmt().json().with_env_filter(filter).finish().try_init()
    } else {
        fmt()
            .compact()
            .with_ansi(std::io::stdout().is_terminal())
            .with_env_filter(filter)
            .finish()
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        let config = LogConfig {
            level: "not a [valid directive".to_string(),
            json: false,
        };
        // builds without panicking whatever RUST_LOG holds
        let _ = env_filter(&config);
    }

    #[test]
    fn second_init_fails() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
