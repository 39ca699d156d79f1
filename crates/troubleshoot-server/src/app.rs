//! Wiring: configuration → routes → triggers

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use troubleshoot_core::{AppConfig, AppError, HelloRoute, TimerRoute};

use crate::http;
use crate::timer::TimerTrigger;

/// Command line overrides, applied after file and environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub message: Option<String>,
    pub no_crash: bool,
    pub mem_leak: bool,
    pub log_json: bool,
}

/// Defaults → optional file → environment → command line, then validate
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig, AppError> {
    let base = match path {
        Some(p) => AppConfig::from_file(p)?,
        None => AppConfig::default(),
    };
    let mut config = base.apply_process_env()?;
    apply_overrides(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, overrides: &Overrides) {
    if let Some(message) = &overrides.message {
        config.message = Some(message.clone());
    }
    if overrides.no_crash {
        config.crash = false;
    }
    if overrides.mem_leak {
        config.mem_leak = true;
    }
    if overrides.log_json {
        config.log.json = true;
    }
}

/// Serve the hello route until `shutdown` resolves
pub async fn run_http<F>(config: &AppConfig, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let route = Arc::new(HelloRoute::from_config(config));
    let listener = http::bind(&config.http).await?;
    info!(path = %config.http.path, "hello route started");
    http::serve(listener, http::router(route, &config.http.path), shutdown).await
}

/// Fire the timer route until its repeat count or `shutdown`
pub async fn run_timer(config: &AppConfig, shutdown: watch::Receiver<bool>) -> u64 {
    let route = Arc::new(TimerRoute::from_config(config));
    let trigger = TimerTrigger::from_config(&config.timer);
    info!(
        period_ms = config.timer.period_ms,
        crash = config.crash,
        mem_leak = config.mem_leak,
        "timer route started"
    );
    trigger.run(route, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_config() {
        let mut config = AppConfig::new().with_message("file");
        apply_overrides(
            &mut config,
            &Overrides {
                message: Some("cli".to_string()),
                no_crash: true,
                mem_leak: true,
                log_json: false,
            },
        );
        assert_eq!(config.message.as_deref(), Some("cli"));
        assert!(!config.crash);
        assert!(config.mem_leak);
        assert!(!config.log.json);
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let mut config = AppConfig::new().with_message("file");
        apply_overrides(&mut config, &Overrides::default());
        assert_eq!(config, AppConfig::new().with_message("file"));
    }
}
