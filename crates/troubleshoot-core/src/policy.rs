//! Fault policy: which abnormal behaviour an invocation counter triggers

use serde::{Deserialize, Serialize};

/// Counter above which the CRASH state is entered
pub const CRASH_THRESHOLD: u64 = 5;

/// Counter value on which the LEAK state is entered
pub const LEAK_COUNTER: u64 = 1;

/// Fault state selected for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultState {
    /// No side effect
    Normal,
    /// Abort the process
    Crash,
    /// Retain memory that is never freed, then return normally
    Leak,
}

/// Process-wide fault configuration, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPolicy {
    /// Enables [`FaultState::Crash`]
    pub crash_enabled: bool,
    /// Enables [`FaultState::Leak`]
    pub memory_leak_enabled: bool,
    /// Counters strictly greater than this crash
    pub crash_threshold: u64,
}

impl FaultPolicy {
    /// Default policy: crash on, leak off
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With crash enablement
    #[inline]
    #[must_use]
    pub fn with_crash(mut self, enabled: bool) -> Self {
        self.crash_enabled = enabled;
        self
    }

    /// With leak enablement
    #[inline]
    #[must_use]
    pub fn with_memory_leak(mut self, enabled: bool) -> Self {
        self.memory_leak_enabled = enabled;
        self
    }

    /// Policy that never injects a fault
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::new().with_crash(false).with_memory_leak(false)
    }

    /// Select the fault state for `counter`
    ///
    /// Depends on nothing but `counter` and `self`.
    #[must_use]
    pub fn evaluate(&self, counter: u64) -> FaultState {
        if self.crash_enabled && counter > self.crash_threshold {
            FaultState::Crash
        } else if self.memory_leak_enabled && counter == LEAK_COUNTER {
            FaultState::Leak
        } else {
            FaultState::Normal
        }
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self {
            crash_enabled: true,
            memory_leak_enabled: false,
            crash_threshold: CRASH_THRESHOLD,
        }
    }
}
