//! CreateCycleHandler - Command handler for opening new breeding cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::domain::analysis::derive_metrics;
use crate::domain::breeding::{
    check_completeness, propose_transition, traceability_code, validate_record, BreedingCycle,
    BreedingCycleCreated, HeatInfo, ServiceStatus, SireProfile, SubrecordPayload,
};
use crate::domain::foundation::{
    AnimalId, BreedingSeasonId, CommandMetadata, CycleCode,
};
use crate::ports::{BreedingCycleRepository, Clock, EventPublisher};

use super::cycle_locks::CycleLocks;
use super::errors::CreateCycleError;
use super::publishing::publish_committed;

/// Command to open a breeding cycle for a dam.
///
/// With `heat` set the cycle starts IN_HEAT, otherwise PLANNED.
#[derive(Debug, Clone)]
pub struct CreateCycleCommand {
    /// Generated from the season year when absent.
    pub cycle_code: Option<CycleCode>,
    pub dam_id: AnimalId,
    pub season_id: Option<BreedingSeasonId>,
    pub season_year: i32,
    pub sire: SireProfile,
    pub heat: Option<HeatInfo>,
    /// Overrides the configured persistence timeout.
    pub timeout: Option<Duration>,
}

impl CreateCycleCommand {
    pub fn new(dam_id: AnimalId, season_year: i32, sire: SireProfile) -> Self {
        Self {
            cycle_code: None,
            dam_id,
            season_id: None,
            season_year,
            sire,
            heat: None,
            timeout: None,
        }
    }

    pub fn with_code(mut self, code: CycleCode) -> Self {
        self.cycle_code = Some(code);
        self
    }

    pub fn with_heat(mut self, heat: HeatInfo) -> Self {
        self.heat = Some(heat);
        self
    }
}

/// Result of successful cycle creation.
#[derive(Debug, Clone)]
pub struct CreateCycleResult {
    pub cycle: BreedingCycle,
    pub event: BreedingCycleCreated,
}

/// Handler for creating breeding cycles.
///
/// Shares its `CycleLocks` with the `CycleOrchestrator` writing the same
/// repository, so a create never races another write for the same code.
pub struct CreateCycleHandler {
    repository: Arc<dyn BreedingCycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<CycleLocks>,
    config: EngineConfig,
}

impl CreateCycleHandler {
    pub fn new(
        repository: Arc<dyn BreedingCycleRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            clock,
            locks: Arc::new(CycleLocks::new()),
            config,
        }
    }

    /// Uses `locks` for per-code exclusion instead of a private set.
    pub fn with_locks(mut self, locks: Arc<CycleLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCycleResult, CreateCycleError> {
        let limit = cmd.timeout.unwrap_or_else(|| self.config.persistence_timeout());
        let now = self.clock.now();
        let code = cmd
            .cycle_code
            .unwrap_or_else(|| CycleCode::generate(cmd.season_year));
        let _guard = self
            .locks
            .try_acquire(&code)
            .ok_or_else(|| CreateCycleError::ConcurrentModification(code.clone()))?;

        // 1. Reject duplicates
        let existing = timeout(limit, self.repository.load(&code))
            .await
            .map_err(|_| CreateCycleError::PersistenceTimeout(limit))??;
        if existing.is_some() {
            return Err(CreateCycleError::AlreadyExists(code));
        }

        // 2. Build and validate the record
        let mut cycle = BreedingCycle::planned(
            code,
            cmd.dam_id,
            cmd.season_year,
            cmd.sire,
            metadata.user_id.clone(),
            now,
        );
        cycle.season_id = cmd.season_id;

        let cycle = match cmd.heat {
            Some(heat) => propose_transition(
                &cycle,
                ServiceStatus::InHeat,
                SubrecordPayload::Heat(heat),
                &metadata.user_id,
                now,
            )
            .map_err(CreateCycleError::Rejected)?,
            None => {
                let mut errors = check_completeness(&cycle, ServiceStatus::Planned);
                errors.extend(validate_record(&cycle));
                if !errors.is_empty() {
                    return Err(CreateCycleError::Rejected(errors));
                }
                cycle.traceability_code = Some(traceability_code(&cycle));
                cycle.derived = Some(derive_metrics(&cycle, now));
                cycle
            }
        };

        // 3. Persist
        match timeout(limit, self.repository.save(&cycle)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(cycle_code = %cycle.cycle_code, "Create timed out before save completed");
                return Err(CreateCycleError::PersistenceTimeout(limit));
            }
        }

        info!(
            cycle_code = %cycle.cycle_code,
            dam_id = %cycle.dam_id,
            status = %cycle.status,
            "Breeding cycle created"
        );

        // 4. Publish
        let event = BreedingCycleCreated::from_cycle(&cycle);
        if self.config.publish_events {
            publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;
        }

        Ok(CreateCycleResult { cycle, event })
    }
}
