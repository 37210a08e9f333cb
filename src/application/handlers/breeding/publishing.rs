//! Best-effort event publication after a commit.

use tracing::{debug, warn};

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Publishes `event` with the command's correlation context.
///
/// The record is already saved, so failures are logged and swallowed.
pub(crate) async fn publish_committed<E>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) where
    E: SerializableDomainEvent + Sync,
{
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(event_type = event.event_type(), error = %e, "Failed to serialise event");
            return;
        }
    };

    let mut envelope = envelope
        .with_correlation_id(metadata.correlation_id())
        .with_user_id(metadata.user_id.as_str());
    if let Some(source) = metadata.source() {
        envelope = envelope.with_source(source);
    }

    let event_id = envelope.event_id.clone();
    match publisher.publish(envelope).await {
        Ok(()) => debug!(event_type = event.event_type(), %event_id, "Published event"),
        Err(e) => warn!(
            event_type = event.event_type(),
            %event_id,
            error = %e,
            "Failed to publish event; record already committed"
        ),
    }
}
