//! Routes: trigger → set body → bean → log
//!
//! A route owns its invocation counter and the body it stamps on each
//! firing. Triggers (HTTP, timer) only call [`Route::fire`].

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::HandlerError;
use crate::events::EventSink;
use crate::handler::{Bean, CounterBean, GreetingBean};
use crate::types::{Invocation, InvocationCounter};

/// Route answering the HTTP hello path
pub type HelloRoute = Route<GreetingBean>;

/// Route fired by the timer
pub type TimerRoute = Route<CounterBean>;

/// One wired route
#[derive(Debug)]
pub struct Route<B: Bean> {
    id: &'static str,
    body: Option<String>,
    bean: B,
    counter: InvocationCounter,
}

impl<B: Bean> Route<B> {
    /// Route `id` delivering `body` to `bean` on each firing
    #[must_use]
    pub fn new(id: &'static str, body: Option<String>, bean: B) -> Self {
        Self {
            id,
            body,
            bean,
            counter: InvocationCounter::new(),
        }
    }

    /// Route id used in logs
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Number of firings so far
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.counter.current()
    }

    /// Fire once: build the invocation, run the bean, log the resulting body
    pub fn fire(&self) -> Result<String, HandlerError> {
        let invocation = Invocation::new(self.body.clone(), self.counter.next());
        let route = self.id;
        tracing::debug!(
            route,
            bean = self.bean.name(),
            invocation_id = %invocation.id,
            counter = invocation.counter,
            "dispatching invocation"
        );

        match self.bean.handle(&invocation) {
            Ok(body) => {
                tracing::info!(route, "{body}");
                Ok(body)
            }
            Err(e) => {
                tracing::error!(route, counter = invocation.counter, "invocation failed: {e}");
                Err(e)
            }
        }
    }
}

impl HelloRoute {
    /// `GET <path>` → body = configured message → [`GreetingBean`] → log
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Route::new("hello", config.message.clone(), GreetingBean)
    }
}

impl TimerRoute {
    /// timer tick → body = timer body → [`CounterBean`] → log
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_bean(config, CounterBean::new(config.fault_policy()))
    }

    /// Timer route around a pre-wired bean
    #[must_use]
    pub fn with_bean(config: &AppConfig, bean: CounterBean) -> Self {
        Route::new("timer", config.timer_body().map(str::to_string), bean)
    }

    /// Timer route whose events go to `events`
    #[must_use]
    pub fn with_events(config: &AppConfig, events: Arc<dyn EventSink>) -> Self {
        Self::with_bean(
            config,
            CounterBean::new(config.fault_policy()).with_events(events),
        )
    }
}
