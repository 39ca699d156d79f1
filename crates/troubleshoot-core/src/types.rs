//! Invocation types shared by beans and routes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique id of one trigger firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    /// Generate a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One firing of a trigger, handed synchronously to a bean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Id for correlating log lines
    pub id: InvocationId,
    /// Text payload, absent when the trigger supplied none
    pub body: Option<String>,
    /// Value of the route's invocation counter for this firing
    pub counter: u64,
}

impl Invocation {
    /// Create an invocation
    #[must_use]
    pub fn new(body: Option<String>, counter: u64) -> Self {
        Self {
            id: InvocationId::new(),
            body,
            counter,
        }
    }

    /// Invocation carrying a body
    #[must_use]
    pub fn with_body(body: impl Into<String>, counter: u64) -> Self {
        Self::new(Some(body.into()), counter)
    }

    /// Invocation with no body
    #[must_use]
    pub fn empty(counter: u64) -> Self {
        Self::new(None, counter)
    }
}

/// Monotonic per-route firing counter
///
/// The first call to [`InvocationCounter::next`] returns 1. Counts restart
/// only when the process does.
#[derive(Debug, Default)]
pub struct InvocationCounter {
    fired: AtomicU64,
}

impl InvocationCounter {
    /// Counter that has not fired yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: AtomicU64::new(0),
        }
    }

    /// Record a firing and return its number
    pub fn next(&self) -> u64 {
        self.fired.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of firings so far
    #[must_use]
    pub fn current(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }
}
