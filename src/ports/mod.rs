//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `BreedingCycleRepository` - Load and save breeding cycle records
//! - `EventPublisher` - Publish domain events after a commit
//! - `Clock` - Current time for time-dependent derivations

mod breeding_cycle_repository;
mod clock;
mod event_publisher;

pub use breeding_cycle_repository::BreedingCycleRepository;
pub use clock::Clock;
pub use event_publisher::EventPublisher;
