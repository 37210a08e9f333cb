//! In-Memory Breeding Cycle Repository
//!
//! Stores breeding cycles in memory. Useful for testing and development.
//!
//! # Features
//!
//! - Simulated load and save latency for timeout and contention testing
//! - Save failure injection
//! - Save counting for verification

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::domain::breeding::BreedingCycle;
use crate::domain::foundation::{CycleCode, DomainError, ErrorCode};
use crate::ports::BreedingCycleRepository;

/// In-memory storage for breeding cycles keyed by cycle code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBreedingCycleRepository {
    cycles: Arc<RwLock<HashMap<CycleCode, BreedingCycle>>>,
    load_delay: Duration,
    save_delay: Duration,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryBreedingCycleRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `load` by `delay`.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Delay every `save` by `delay`.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    /// Make subsequent saves fail with `DatabaseError`.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Store a record directly, bypassing latency and failure injection.
    pub async fn insert(&self, cycle: BreedingCycle) {
        self.cycles.write().await.insert(cycle.cycle_code.clone(), cycle);
    }

    /// Read a record directly, bypassing latency.
    pub async fn get(&self, code: &CycleCode) -> Option<BreedingCycle> {
        self.cycles.read().await.get(code).cloned()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BreedingCycleRepository for InMemoryBreedingCycleRepository {
    async fn load(&self, code: &CycleCode) -> Result<Option<BreedingCycle>, DomainError> {
        if !self.load_delay.is_zero() {
            sleep(self.load_delay).await;
        }
        Ok(self.cycles.read().await.get(code).cloned())
    }

    async fn save(&self, cycle: &BreedingCycle) -> Result<(), DomainError> {
        if !self.save_delay.is_zero() {
            sleep(self.save_delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "In-memory store rejected the write",
            )
            .with_detail("cycle_code", cycle.cycle_code.as_str()));
        }

        self.cycles
            .write()
            .await
            .insert(cycle.cycle_code.clone(), cycle.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breeding::SireProfile;
    use crate::domain::foundation::{AnimalId, Timestamp, UserId};

    fn cycle(code: &str) -> BreedingCycle {
        BreedingCycle::planned(
            CycleCode::new(code).unwrap(),
            AnimalId::new(),
            2024,
            SireProfile::new("Big Red", "Angus"),
            UserId::new("rancher").unwrap(),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn save_then_load_returns_the_record() {
        let repo = InMemoryBreedingCycleRepository::new();
        let cycle = cycle("BC-1");

        repo.save(&cycle).await.unwrap();
        let loaded = repo.load(&cycle.cycle_code).await.unwrap();

        assert_eq!(loaded, Some(cycle));
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn missing_record_loads_as_none() {
        let repo = InMemoryBreedingCycleRepository::new();
        let loaded = repo.load(&CycleCode::new("BC-404").unwrap()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_record() {
        let repo = InMemoryBreedingCycleRepository::new();
        let original = cycle("BC-2");
        repo.insert(original.clone()).await;

        let mut changed = original.clone();
        changed.season_year = 2025;
        repo.fail_saves(true);
        let err = repo.save(&changed).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(repo.get(&original.cycle_code).await, Some(original));
        assert_eq!(repo.save_count(), 0);
    }
}
