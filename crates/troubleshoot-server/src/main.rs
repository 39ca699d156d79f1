use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use tokio::sync::watch;
use troubleshoot_core::AppConfig;
use troubleshoot_server::telemetry::init_tracing;
use troubleshoot_server::{resolve_config, run_http, run_timer, Overrides};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("troubleshoot")
        .version(troubleshoot_core::VERSION)
        .about("Routes that reproduce crashes, leaks and configuration bugs on demand")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .global(true)
                .help("Text prepended to every response"),
        )
        .arg(
            Arg::new("no-crash")
                .long("no-crash")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Disable the crash past the counter threshold"),
        )
        .arg(
            Arg::new("mem-leak")
                .long("mem-leak")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Retain one million timestamps on the first tick"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("http").about("Serve the hello route over HTTP"))
        .subcommand(Command::new("timer").about("Fire the counter route on a timer"))
        .subcommand(
            Command::new("config")
                .about("Print the resolved configuration")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    let matches = cli.get_matches();

    let overrides = Overrides {
        message: matches.get_one::<String>("message").cloned(),
        no_crash: matches.get_flag("no-crash"),
        mem_leak: matches.get_flag("mem-leak"),
        log_json: matches.get_flag("log-json"),
    };
    let config_path = matches.get_one::<PathBuf>("config").cloned();
    let config = resolve_config(config_path.as_deref(), &overrides)
        .context("failed to resolve configuration")?;

    match matches.subcommand() {
        Some(("http", _)) => {
            init_tracing(&config.log).context("failed to install tracing subscriber")?;
            log_resolved(config_path.as_deref(), &config);
            run_http(&config, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        }
        Some(("timer", _)) => {
            init_tracing(&config.log).context("failed to install tracing subscriber")?;
            log_resolved(config_path.as_deref(), &config);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(true);
                }
            });
            run_timer(&config, shutdown_rx).await;
        }
        Some(("config", args)) => {
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Logged once the subscriber is installed
fn log_resolved(path: Option<&Path>, config: &AppConfig) {
    tracing::debug!(
        path = ?path.map(Path::display),
        message = ?config.message,
        crash = config.crash,
        mem_leak = config.mem_leak,
        period_ms = config.timer.period_ms,
        "configuration resolved"
    );
}
