//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event bus implementations
//! - `storage` - Breeding cycle repositories
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod events;
pub mod storage;

pub use clock::{FixedClock, SystemClock};
pub use events::InMemoryEventBus;
pub use storage::InMemoryBreedingCycleRepository;
