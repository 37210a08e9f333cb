//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event/command
//! infrastructure that form the vocabulary of the breeding domain.

mod command;
mod errors;
mod events;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{AnimalId, BreedingSeasonId, CycleCode, UserId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
