//! The CRASH fault
//!
//! Crashing is a seam so the threshold logic can be exercised without
//! taking the test process down.

/// Terminates the process; never returns
pub trait Crash: Send + Sync {
    /// Crash while handling the invocation numbered `counter`
    fn crash(&self, counter: u64) -> !;
}

/// Production crash: abnormal termination through `SIGABRT`
///
/// No destructors run and no response is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortProcess;

impl Crash for AbortProcess {
    fn crash(&self, counter: u64) -> ! {
        tracing::error!(counter, "crash threshold exceeded, aborting process");
        std::process::abort()
    }
}
