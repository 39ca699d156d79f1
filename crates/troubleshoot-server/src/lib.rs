//! Troubleshooting Server
//!
//! Triggers for the troubleshooting routes:
//! - **http**: `GET /hello` → greeting bean
//! - **timer**: periodic tick → counter bean with fault injection

#![allow(missing_docs)]

pub mod app;
pub mod http;
pub mod telemetry;
pub mod timer;

pub use app::{resolve_config, run_http, run_timer, Overrides};
pub use timer::TimerTrigger;
