//! Breeding cycle repository port.
//!
//! Defines the contract for loading and storing `BreedingCycle` records.
//! The orchestrator bounds every call with a timeout, so implementations
//! need not enforce their own.

use crate::domain::breeding::BreedingCycle;
use crate::domain::foundation::{CycleCode, DomainError};
use async_trait::async_trait;

/// Repository port for breeding cycle persistence.
///
/// Implementations must ensure:
/// - `save` replaces the whole record keyed by its cycle code
/// - a failed `save` leaves the previously stored record untouched
#[async_trait]
pub trait BreedingCycleRepository: Send + Sync {
    /// Find a cycle by its code.
    ///
    /// Returns `None` if not found. Soft-deleted records are returned as
    /// stored; callers decide how to treat them.
    async fn load(&self, code: &CycleCode) -> Result<Option<BreedingCycle>, DomainError>;

    /// Insert or replace a cycle.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, cycle: &BreedingCycle) -> Result<(), DomainError>;
}
