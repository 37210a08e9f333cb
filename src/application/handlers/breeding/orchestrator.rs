//! CycleOrchestrator - runs a proposed transition end to end.
//!
//! Load, validate, derive, save, publish. The domain functions it calls are
//! pure; only the orchestrator and `CreateCycleHandler` write cycles.
//!
//! # Guarantees
//!
//! - At most one write per cycle code is in flight among handlers sharing a
//!   `CycleLocks` set; a concurrent request fails with
//!   `ConcurrentModification` without waiting.
//! - Every repository call is bounded by a timeout. On expiry nothing is
//!   retained and `PersistenceTimeout` is returned.
//! - Cancellation is checked before validation, before each derivation
//!   step and before saving. Once the save has started it runs to completion.
//! - Events are published only after a successful save; publish failures
//!   are logged and never undo the commit.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::analysis::{
    Alert, AlertGenerator, DerivedMetrics, EconomicSummarizer, EconomicSummary, EfficiencyScore,
    EfficiencyScorer, ReproductionAnalyzer,
};
use crate::domain::breeding::{
    prepare_candidate, validate_transition, BreedingCycle, BreedingCycleTransitioned,
    ServiceStatus, SubrecordPayload,
};
use crate::domain::foundation::{CommandMetadata, CycleCode};
use crate::ports::{BreedingCycleRepository, Clock, EventPublisher};

use super::cycle_locks::CycleLocks;
use super::errors::TransitionError;
use super::publishing::publish_committed;

/// Request to move a cycle to `target`, justified by `payload`.
#[derive(Debug, Clone)]
pub struct ProposeTransitionCommand {
    pub cycle_code: CycleCode,
    pub target: ServiceStatus,
    pub payload: SubrecordPayload,
    /// Overrides the configured persistence timeout.
    pub timeout: Option<Duration>,
}

impl ProposeTransitionCommand {
    pub fn new(cycle_code: CycleCode, target: ServiceStatus, payload: SubrecordPayload) -> Self {
        Self {
            cycle_code,
            target,
            payload,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A committed transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The record as saved, derived metrics included.
    pub cycle: BreedingCycle,
    pub from: ServiceStatus,
    pub event: BreedingCycleTransitioned,
}

pub struct CycleOrchestrator {
    repository: Arc<dyn BreedingCycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<CycleLocks>,
    config: EngineConfig,
}

impl CycleOrchestrator {
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

    /// Uses `locks` for per-code exclusion. Every writer of one repository
    /// must share the same set.
    pub fn with_locks(mut self, locks: Arc<CycleLocks>) -> Self {
        self.locks = locks;
        self
    }

    /// The lock set guarding this orchestrator's writes.
    pub fn locks(&self) -> Arc<CycleLocks> {
        Arc::clone(&self.locks)
    }

    /// Validates and commits a transition, or reports why it did not commit.
    pub async fn propose_transition(
        &self,
        cmd: ProposeTransitionCommand,
        metadata: CommandMetadata,
        cancel: &CancellationToken,
    ) -> Result<TransitionOutcome, TransitionError> {
        let code = cmd.cycle_code;
        let _guard = self.locks.try_acquire(&code).ok_or_else(|| {
            debug!(cycle_code = %code, "Transition already in flight");
            TransitionError::ConcurrentModification(code.clone())
        })?;
        let limit = cmd.timeout.unwrap_or_else(|| self.config.persistence_timeout());

        // 1. Load
        let record = match timeout(limit, self.repository.load(&code)).await {
            Ok(loaded) => loaded?,
            Err(_) => {
                warn!(cycle_code = %code, timeout_ms = limit.as_millis() as u64, "Load timed out");
                return Err(TransitionError::PersistenceTimeout(limit));
            }
        };
        let record = match record {
            Some(record) if !record.is_deleted() => record,
            _ => return Err(TransitionError::CycleNotFound(code)),
        };
        let from = record.status;

        // 2. Validate
        ensure_active(cancel)?;
        let now = self.clock.now();
        let mut candidate = prepare_candidate(&record, cmd.target, cmd.payload, &metadata.user_id, now);
        let errors = validate_transition(from, &candidate);
        if !errors.is_empty() {
            warn!(
                cycle_code = %code,
                %from,
                to = %cmd.target,
                violations = errors.len(),
                "Transition rejected"
            );
            return Err(TransitionError::Rejected(errors));
        }

        // 3. Derive
        ensure_active(cancel)?;
        let efficiency = EfficiencyScorer::score(&candidate);
        ensure_active(cancel)?;
        let reproduction = ReproductionAnalyzer::summarize(&candidate);
        ensure_active(cancel)?;
        let economics = EconomicSummarizer::summarize(&candidate, now);
        ensure_active(cancel)?;
        let alerts = AlertGenerator::generate(&candidate, now);
        candidate.derived = Some(DerivedMetrics {
            needs_attention: AlertGenerator::needs_attention(&alerts),
            efficiency,
            reproduction,
            economics,
            alerts,
            computed_at: now,
        });

        // 4. Save
        ensure_active(cancel)?;
        match timeout(limit, self.repository.save(&candidate)).await {
            Ok(saved) => saved?,
            Err(_) => {
                warn!(cycle_code = %code, timeout_ms = limit.as_millis() as u64, "Save timed out");
                return Err(TransitionError::PersistenceTimeout(limit));
            }
        }

        info!(
            cycle_code = %code,
            %from,
            to = %candidate.status,
            actor = %metadata.user_id,
            "Breeding cycle transitioned"
        );

        // 5. Publish
        let event = BreedingCycleTransitioned::from_commit(from, &candidate);
        if self.config.publish_events {
            publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;
        }

        Ok(TransitionOutcome {
            cycle: candidate,
            from,
            event,
        })
    }

    /// Current efficiency score of a record.
    pub fn score(&self, cycle: &BreedingCycle) -> EfficiencyScore {
        EfficiencyScorer::score(cycle)
    }

    /// Alerts for a record as of the clock's current time.
    pub fn alerts(&self, cycle: &BreedingCycle) -> Vec<Alert> {
        AlertGenerator::generate(cycle, self.clock.now())
    }

    pub fn needs_attention(&self, cycle: &BreedingCycle) -> bool {
        AlertGenerator::needs_attention(&self.alerts(cycle))
    }

    /// Economic summary of a record as of the clock's current time.
    pub fn economics(&self, cycle: &BreedingCycle) -> EconomicSummary {
        EconomicSummarizer::summarize(cycle, self.clock.now())
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), TransitionError> {
    if cancel.is_cancelled() {
        return Err(TransitionError::Cancelled);
    }
    Ok(())
}
