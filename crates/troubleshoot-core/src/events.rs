//! Monitoring events emitted once per bean invocation

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::InvocationId;

/// Label carried by every [`DoItEvent`]
pub const DO_IT_LABEL: &str = "Do It";

/// Description of the [`DoItEvent`] type, used as the log line
pub const DO_IT_DESCRIPTION: &str = "Signal do it has been called";

/// Tracing target used by [`TracingEventSink`]
pub const EVENT_TARGET: &str = "troubleshoot::events";

/// Signals that a bean has been called
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoItEvent {
    pub invocation_id: InvocationId,
    pub label: String,
    /// Per-event detail; unset by the beans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub counter: u64,
    pub timestamp_ms: i64,
}

impl DoItEvent {
    /// Event for one invocation, stamped now
    #[must_use]
    pub fn new(invocation_id: InvocationId, counter: u64) -> Self {
        Self {
            invocation_id,
            label: DO_IT_LABEL.to_string(),
            message: None,
            counter,
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }
}

/// Destination for [`DoItEvent`]s
pub trait EventSink: Send + Sync {
    /// Record one event; must not fail the invocation
    fn emit(&self, event: &DoItEvent);
}

/// Emits events as structured `tracing` records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DoItEvent) {
        tracing::info!(
            target: EVENT_TARGET,
            invocation_id = %event.invocation_id,
            label = %event.label,
            message = event.message.as_deref(),
            counter = event.counter,
            timestamp_ms = event.timestamp_ms,
            "{DO_IT_DESCRIPTION}"
        );
    }
}

/// In-memory event sink
#[derive(Debug, Default)]
pub struct EventLog {
    inner: Mutex<Vec<DoItEvent>>,
}

impl EventLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    #[must_use]
    pub fn events(&self) -> Vec<DoItEvent> {
        self.inner.lock().clone()
    }

    /// Number of recorded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no event has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: &DoItEvent) {
        self.inner.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_constant_label() {
        let event = DoItEvent::new(InvocationId::new(), 3);
        assert_eq!(event.label, "Do It");
        assert_eq!(event.message, None);
        assert_eq!(event.counter, 3);
    }

    #[test]
    fn event_log_records_in_order() {
        let log = EventLog::new();
        assert!(log.is_empty());
        log.emit(&DoItEvent::new(InvocationId::new(), 1));
        log.emit(&DoItEvent::new(InvocationId::new(), 2));

        let counters: Vec<u64> = log.events().iter().map(|e| e.counter).collect();
        assert_eq!(counters, vec![1, 2]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn event_serializes_to_json() {
        let event = DoItEvent::new(InvocationId::new(), 7);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["label"], "Do It");
        assert_eq!(json["counter"], 7);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn message_is_independent_of_description() {
        let mut event = DoItEvent::new(InvocationId::new(), 1);
        event.message = Some("manual".to_string());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["message"], "manual");
        assert_ne!(json["message"], DO_IT_DESCRIPTION);
    }
}
