//! Troubleshooting Core
//!
//! Beans and routes that reproduce failure modes on demand:
//! - A greeting bean that fails when the configured message is missing
//! - A counter-driven bean that aborts the process past a threshold
//! - The same bean retaining memory that is never freed
//!
//! # Example
//!
//! ```rust,ignore
//! use troubleshoot_core::prelude::*;
//!
//! let config = AppConfig::new().with_message("BasicMessage");
//! let hello = HelloRoute::from_config(&config);
//! assert_eq!(hello.fire()?, "BasicMessage :: MyBean");
//! ```

#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod events;
pub mod fault;
pub mod handler;
pub mod leak;
pub mod policy;
pub mod route;
pub mod types;

pub use config::{AppConfig, HttpConfig, LogConfig, TimerConfig};
pub use error::{AppError, ConfigError, HandlerError};
pub use events::{DoItEvent, EventLog, EventSink, TracingEventSink};
pub use fault::{AbortProcess, Crash};
pub use handler::{Bean, CounterBean, GreetingBean};
pub use leak::LeakedObjectSet;
pub use policy::{FaultPolicy, FaultState};
pub use route::{HelloRoute, Route, TimerRoute};
pub use types::{Invocation, InvocationCounter, InvocationId};

/// Common imports
pub mod prelude {
    pub use crate::{
        AppConfig, AppError, Bean, CounterBean, FaultPolicy, FaultState, GreetingBean,
        HandlerError, HelloRoute, Invocation, TimerRoute,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
