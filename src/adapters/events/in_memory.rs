//! In-memory event bus implementation for testing.
//!
//! Captures published envelopes for assertions. Delivery is synchronous
//! and deterministic.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus for testing.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("breeding_cycle.transitioned.v1"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    fail_publishes: AtomicBool,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Test Helpers ===

    /// Make subsequent publishes fail with `EventPublishFailed`.
    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.events().clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events.
    pub fn clear(&self) {
        self.events().clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.events().iter().any(|e| e.event_type == event_type)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::EventPublishFailed,
                format!("Bus unavailable for {}", event.event_type),
            ));
        }
        self.events().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};
    use serde_json::json;

    fn envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            schema_version: 1,
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: "BreedingCycle".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: EventMetadata::default(),
        }
    }

    #[tokio::test]
    async fn publish_captures_events() {
        let bus = InMemoryEventBus::new();

        bus.publish(envelope("breeding_cycle.created.v1", "BC-1")).await.unwrap();
        bus.publish(envelope("breeding_cycle.transitioned.v1", "BC-1")).await.unwrap();
        bus.publish(envelope("breeding_cycle.created.v1", "BC-2")).await.unwrap();

        assert_eq!(bus.event_count(), 3);
        assert!(bus.has_event("breeding_cycle.transitioned.v1"));
        assert_eq!(bus.events_of_type("breeding_cycle.created.v1").len(), 2);
        assert_eq!(bus.events_for_aggregate("BC-1").len(), 2);
    }

    #[tokio::test]
    async fn publish_all_keeps_order() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![envelope("a.v1", "BC-1"), envelope("b.v1", "BC-1")])
            .await
            .unwrap();

        let types: Vec<_> = bus.published_events().into_iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec!["a.v1", "b.v1"]);
    }

    #[tokio::test]
    async fn failing_bus_rejects_and_records_nothing() {
        let bus = InMemoryEventBus::new();
        bus.fail_publishes(true);

        let err = bus.publish(envelope("a.v1", "BC-1")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EventPublishFailed);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn clear_removes_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("a.v1", "BC-1")).await.unwrap();
        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }
}
