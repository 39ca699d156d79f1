//! Testing utilities for the troubleshooting workspace
//!
//! Shared doubles and fixtures.

#![allow(missing_docs)]

use std::sync::Arc;

use troubleshoot_core::{
    AppConfig, Crash, CounterBean, EventLog, FaultPolicy, LeakedObjectSet, TimerRoute,
};

/// Prefix of the panic message raised by [`PanicOnCrash`]
pub const CRASH_PANIC: &str = "crash requested at counter";

/// Crash double: panics instead of aborting
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicOnCrash;

impl Crash for PanicOnCrash {
    fn crash(&self, counter: u64) -> ! {
        panic!("{CRASH_PANIC} {counter}");
    }
}

/// Leak target private to one test, never freed
pub fn fresh_leak_target() -> &'static LeakedObjectSet {
    Box::leak(Box::new(LeakedObjectSet::new()))
}

/// Counter bean with every side effect observable
pub struct ObservedBean {
    pub bean: CounterBean,
    pub events: Arc<EventLog>,
    pub leaked: &'static LeakedObjectSet,
}

pub fn observed_bean(policy: FaultPolicy) -> ObservedBean {
    let events = Arc::new(EventLog::new());
    let leaked = fresh_leak_target();
    let bean = CounterBean::new(policy)
        .with_crash(Arc::new(PanicOnCrash))
        .with_leak_target(leaked)
        .with_events(events.clone());
    ObservedBean {
        bean,
        events,
        leaked,
    }
}

/// Timer route around an [`observed_bean`] built from `config`
pub fn observed_timer_route(config: &AppConfig) -> (TimerRoute, Arc<EventLog>, &'static LeakedObjectSet) {
    let ObservedBean {
        bean,
        events,
        leaked,
    } = observed_bean(config.fault_policy());
    (TimerRoute::with_bean(config, bean), events, leaked)
}

pub fn basic_config() -> AppConfig {
    AppConfig::new().with_message("BasicMessage")
}
