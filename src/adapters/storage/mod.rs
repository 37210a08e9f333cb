//! Storage Adapters
//!
//! Implementations of the `BreedingCycleRepository` port.
//!
//! - **InMemoryBreedingCycleRepository** - Stores cycles in memory (testing/development)
//!
//! ```ignore
//! use adapters::storage::InMemoryBreedingCycleRepository;
//!
//! let repo = InMemoryBreedingCycleRepository::new()
//!     .with_save_delay(Duration::from_millis(50));
//! ```

mod in_memory_breeding_repository;

pub use in_memory_breeding_repository::InMemoryBreedingCycleRepository;
