//! Timer trigger: fires the timer route at a fixed period

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use troubleshoot_core::{TimerConfig, TimerRoute};

/// Periodic trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTrigger {
    pub delay: Duration,
    pub period: Duration,
    /// 0 fires until shutdown
    pub repeat_count: u64,
}

impl TimerTrigger {
    /// Trigger from configuration
    #[must_use]
    pub fn from_config(config: &TimerConfig) -> Self {
        Self {
            delay: config.delay(),
            period: config.period(),
            repeat_count: config.repeat_count,
        }
    }

    /// Fire `route` until the repeat count is reached or `shutdown` flips to true.
    ///
    /// Each tick runs on the blocking pool. Failed invocations are already
    /// logged by the route and do not stop the timer. Returns the number of
    /// ticks fired.
    pub async fn run(self, route: Arc<TimerRoute>, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticker = interval_at(Instant::now() + self.delay, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;
        let mut listening = true;

        loop {
            if *shutdown.borrow() {
                break;
            }
            if self.repeat_count > 0 && ticks >= self.repeat_count {
                info!(ticks, "timer repeat count reached");
                break;
            }

            tokio::select! {
                changed = shutdown.changed(), if listening => {
                    // sender gone: only the repeat count can stop us now
                    listening = changed.is_ok();
                    continue;
                }
                _ = ticker.tick() => {}
            }

            ticks += 1;
            // a leak batch stamps a million entries; keep it off the runtime workers
            let route = Arc::clone(&route);
            if let Err(e) = tokio::task::spawn_blocking(move || route.fire()).await {
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
                error!("timer invocation cancelled: {e}");
                break;
            }
        }

        info!(ticks, "timer shutting down");
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::{self, ThreadId};

    use parking_lot::Mutex;
    use troubleshoot_core::{AppConfig, DoItEvent, EventSink};

    /// Records the thread each invocation ran on
    #[derive(Default)]
    struct ThreadLog(Mutex<Vec<ThreadId>>);

    impl EventSink for ThreadLog {
        fn emit(&self, _event: &DoItEvent) {
            self.0.lock().push(thread::current().id());
        }
    }

    fn route(config: &AppConfig) -> Arc<TimerRoute> {
        Arc::new(TimerRoute::from_config(config))
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_repeat_count() {
        let mut config = AppConfig::new().with_message("tick").with_crash(false);
        config.timer.repeat_count = 3;
        let route = route(&config);
        let (_tx, rx) = watch::channel(false);

        let ticks = TimerTrigger::from_config(&config.timer)
            .run(Arc::clone(&route), rx)
            .await;

        assert_eq!(ticks, 3);
        assert_eq!(route.fired(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_ticks_keep_the_timer_running() {
        let mut config = AppConfig::new().with_crash(false);
        config.timer.repeat_count = 4;
        let route = route(&config);
        let (_tx, rx) = watch::channel(false);

        let ticks = TimerTrigger::from_config(&config.timer)
            .run(Arc::clone(&route), rx)
            .await;

        assert_eq!(ticks, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_an_endless_timer() {
        let config = AppConfig::new().with_message("tick").with_crash(false);
        let route = route(&config);
        let (tx, rx) = watch::channel(false);

        let trigger = TimerTrigger::from_config(&config.timer);
        let handle = tokio::spawn(trigger.run(Arc::clone(&route), rx));

        // delay 1s + two more periods
        tokio::time::sleep(Duration::from_millis(3500)).await;
        tx.send(true).unwrap();
        let ticks = handle.await.unwrap();

        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_run_off_the_runtime_thread() {
        let mut config = AppConfig::new().with_message("tick").with_crash(false);
        config.timer.repeat_count = 2;
        let threads = Arc::new(ThreadLog::default());
        let route = Arc::new(TimerRoute::with_events(&config, threads.clone()));
        let (_tx, rx) = watch::channel(false);

        let ticks = TimerTrigger::from_config(&config.timer).run(route, rx).await;

        assert_eq!(ticks, 2);
        let recorded = threads.0.lock().clone();
        assert_eq!(recorded.len(), 2);
        let runtime_thread = thread::current().id();
        assert!(recorded.iter().all(|id| *id != runtime_thread));
    }
}
