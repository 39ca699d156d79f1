//! Application configuration
//!
//! Resolved once at startup, in increasing precedence:
//! 1. built-in defaults
//! 2. a TOML file
//! 3. `TROUBLESHOOT_*` environment variables
//! 4. command line flags (applied by the binary)
//!
//! Routes are only built from a fully resolved [`AppConfig`].

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::FaultPolicy;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "TROUBLESHOOT_";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AppConfig {
    /// Text prepended to responses; `None` reproduces the "Body is null" failure
    pub message: Option<String>,
    /// Enables the CRASH fault
    pub crash: bool,
    /// Enables the LEAK fault
    pub mem_leak: bool,
    pub http: HttpConfig,
    pub timer: TimerConfig,
    pub log: LogConfig,
}

/// HTTP trigger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind: SocketAddr,
    pub path: String,
}

/// Timer trigger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TimerConfig {
    pub period_ms: u64,
    pub delay_ms: u64,
    /// Number of ticks before stopping; 0 fires forever
    pub repeat_count: u64,
    /// Body of each tick; falls back to [`AppConfig::message`]
    pub body: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            message: None,
            crash: true,
            mem_leak: false,
            http: HttpConfig::default(),
            timer: TimerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            path: "/hello".to_string(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            delay_ms: 1000,
            repeat_count: 0,
            body: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TimerConfig {
    /// Interval between ticks
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Wait before the first tick
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl AppConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With greeting message
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// With crash enablement
    #[inline]
    #[must_use]
    pub fn with_crash(mut self, enabled: bool) -> Self {
        self.crash = enabled;
        self
    }

    /// With leak enablement
    #[inline]
    #[must_use]
    pub fn with_mem_leak(mut self, enabled: bool) -> Self {
        self.mem_leak = enabled;
        self
    }

    /// Parse TOML text; `origin` names the source in errors
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Apply `TROUBLESHOOT_*` overrides from the process environment
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn apply_process_env(self) -> Result<Self, ConfigError> {
        self.apply_env(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Apply `TROUBLESHOOT_*` overrides from `vars`
    ///
    /// Keys without the prefix are ignored. Unrecognised prefixed keys are
    /// rejected, like unknown keys in the file.
    pub fn apply_env<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "MESSAGE" => self.message = Some(value.to_string()),
                "CRASH" => self.crash = parse_bool(key, value)?,
                "MEM_LEAK" => self.mem_leak = parse_bool(key, value)?,
                "HTTP_BIND" => self.http.bind = parse_value(key, value)?,
                "HTTP_PATH" => self.http.path = value.to_string(),
                "TIMER_PERIOD_MS" => self.timer.period_ms = parse_value(key, value)?,
                "TIMER_DELAY_MS" => self.timer.delay_ms = parse_value(key, value)?,
                "TIMER_REPEAT_COUNT" => self.timer.repeat_count = parse_value(key, value)?,
                "TIMER_BODY" => self.timer.body = Some(value.to_string()),
                "LOG_LEVEL" => self.log.level = value.to_string(),
                "LOG_JSON" => self.log.json = parse_bool(key, value)?,
                _ => {
                    return Err(ConfigError::UnknownEnv {
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(self)
    }

    /// Reject values no trigger can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.period_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "timer.period-ms must be greater than zero".to_string(),
            ));
        }
        if !self.http.path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "http.path must start with '/', got '{}'",
                self.http.path
            )));
        }
        Ok(())
    }

    /// Fault policy for counter-driven beans
    #[must_use]
    pub fn fault_policy(&self) -> FaultPolicy {
        FaultPolicy::new()
            .with_crash(self.crash)
            .with_memory_leak(self.mem_leak)
    }

    /// Body stamped on each timer tick
    #[must_use]
    pub fn timer_body(&self) -> Option<&str> {
        self.timer.body.as_deref().or(self.message.as_deref())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(env_error(key, value)),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| env_error(key, value))
}

fn env_error(key: &str, value: &str) -> ConfigError {
    ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
    }
}
