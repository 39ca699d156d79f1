//! Beans: the per-invocation handlers routes deliver to
//!
//! - [`GreetingBean`]: appends a fixed suffix to the body
//! - [`CounterBean`]: appends the invocation counter and applies the
//!   [`FaultPolicy`] (crash above the threshold, leak on the first call)

use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::{DoItEvent, EventSink, TracingEventSink};
use crate::fault::{AbortProcess, Crash};
use crate::leak::{LeakedObjectSet, LEAK_BATCH};
use crate::policy::{FaultPolicy, FaultState};
use crate::types::Invocation;

/// Suffix appended by every bean
pub const BEAN_SUFFIX: &str = " :: MyBean";

/// Handles one invocation synchronously
pub trait Bean: Send + Sync {
    /// Bean name used in logs
    fn name(&self) -> &'static str;

    /// Produce the new body, or report why the invocation failed
    fn handle(&self, invocation: &Invocation) -> Result<String, HandlerError>;
}

/// `body + " :: MyBean"`
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingBean;

impl Bean for GreetingBean {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn handle(&self, invocation: &Invocation) -> Result<String, HandlerError> {
        let body = invocation
            .body
            .as_deref()
            .ok_or_else(HandlerError::missing_body)?;
        Ok(format!("{body}{BEAN_SUFFIX}"))
    }
}

/// `body + " :: MyBean counter " + counter`, under a fault policy
pub struct CounterBean {
    policy: FaultPolicy,
    leaked: &'static LeakedObjectSet,
    crash: Arc<dyn Crash>,
    events: Arc<dyn EventSink>,
}

impl CounterBean {
    /// Bean wired to the process-wide leak set, a real abort and tracing events
    #[must_use]
    pub fn new(policy: FaultPolicy) -> Self {
        Self {
            policy,
            leaked: LeakedObjectSet::global(),
            crash: Arc::new(AbortProcess),
            events: Arc::new(TracingEventSink),
        }
    }

    /// With a different leak target
    #[must_use]
    pub fn with_leak_target(mut self, leaked: &'static LeakedObjectSet) -> Self {
        self.leaked = leaked;
        self
    }

    /// With a different crash implementation
    #[must_use]
    pub fn with_crash(mut self, crash: Arc<dyn Crash>) -> Self {
        self.crash = crash;
        self
    }

    /// With a different event sink
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The policy fixed at construction
    #[must_use]
    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }
}

impl std::fmt::Debug for CounterBean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterBean")
            .field("policy", &self.policy)
            .field("leaked", &self.leaked.len())
            .finish_non_exhaustive()
    }
}

impl Bean for CounterBean {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn handle(&self, invocation: &Invocation) -> Result<String, HandlerError> {
        self.events
            .emit(&DoItEvent::new(invocation.id, invocation.counter));

        let counter = invocation.counter;
        let body = invocation
            .body
            .as_deref()
            .ok_or_else(HandlerError::missing_body)?;

        match self.policy.evaluate(counter) {
            FaultState::Normal => {}
            FaultState::Crash => self.crash.crash(counter),
            FaultState::Leak => {
                let retained = self.leaked.retain_timestamps(LEAK_BATCH);
                tracing::warn!(counter, retained, "retaining timestamps that are never freed");
            }
        }

        Ok(format!("{body}{BEAN_SUFFIX} counter {counter}"))
    }
}
