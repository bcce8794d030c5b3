//! Event sink that keeps every event for test assertions.

use std::sync::{Mutex, PoisonError};

use crate::events::{EventSink, SaleEvent, SaleEventEnvelope};

/// Records every event it receives, in order.
///
/// # Example
///
/// ```rust,ignore
/// use ticketing_core::testing::RecordingSink;
///
/// let sink = RecordingSink::new();
/// sink.record(SaleEvent::StartGateOpened);
/// assert_eq!(sink.event_types(), vec!["start_gate_opened"]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SaleEventEnvelope>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded envelopes, oldest first.
    pub fn envelopes(&self) -> Vec<SaleEventEnvelope> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<SaleEvent> {
        self.envelopes().into_iter().map(|e| e.event).collect()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.envelopes()
            .iter()
            .map(|e| e.event.event_type())
            .collect()
    }

    /// Number of recorded events of the given type.
    pub fn count(&self, event_type: &str) -> usize {
        self.envelopes()
            .iter()
            .filter(|e| e.event.event_type() == event_type)
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: SaleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SaleEventEnvelope::new(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let sink = RecordingSink::new();
        sink.record(SaleEvent::VendorStarted { total_tickets: 2 });
        sink.record(SaleEvent::StartGateOpened);

        assert_eq!(sink.event_types(), vec!["vendor_started", "start_gate_opened"]);
        assert_eq!(sink.count("start_gate_opened"), 1);
        assert_eq!(sink.count("customer_started"), 0);

        let envelopes = sink.envelopes();
        assert!(envelopes[0].timestamp <= envelopes[1].timestamp);
    }

    #[test]
    fn test_clear() {
        let sink = RecordingSink::new();
        sink.record(SaleEvent::CustomerStarted);
        sink.clear();
        assert!(sink.events().is_empty());
    }
}
