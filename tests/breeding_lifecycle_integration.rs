//! Integration tests for the breeding cycle lifecycle.
//!
//! These tests drive the public handlers end to end:
//! 1. `CreateCycleHandler` registers a cycle
//! 2. `CycleOrchestrator` moves it through the status machine
//! 3. The repository holds the committed record and the bus holds the events
//!
//! Uses the in-memory adapters with a fixed clock.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ranch_breeding::adapters::{FixedClock, InMemoryBreedingCycleRepository, InMemoryEventBus};
use ranch_breeding::application::{
    CreateCycleCommand, CreateCycleError, CreateCycleHandler, CycleLocks, CycleOrchestrator,
    ProposeTransitionCommand, TransitionError,
};
use ranch_breeding::config::EngineConfig;
use ranch_breeding::domain::breeding::{
    BreedingCycle, CalfInfo, CalfSex, CalfViability, CalvingDifficulty, CalvingInfo,
    DiagnosisMethod, DiagnosisResult, HeatDetectionMethod, HeatInfo, HeatIntensity,
    PregnancyDiagnosis, PregnancyInfo, ServiceInfo, ServiceMethod, ServiceStatus, SireProfile,
    SubrecordPayload, WeaningInfo, WeaningMethod,
};
use ranch_breeding::domain::foundation::{
    AnimalId, CommandMetadata, CycleCode, Timestamp, UserId, ValidationError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn day(n: i64) -> Timestamp {
    Timestamp::from_ymd(2024, 4, 1).unwrap().add_days(n)
}

fn code() -> CycleCode {
    CycleCode::new("BC-2024-0007").unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("rancher").unwrap()).with_correlation_id("it-1")
}

struct Ranch {
    repo: Arc<InMemoryBreedingCycleRepository>,
    bus: Arc<InMemoryEventBus>,
    clock: Arc<FixedClock>,
    creator: CreateCycleHandler,
    orchestrator: Arc<CycleOrchestrator>,
}

impl Ranch {
    fn with_repo(repo: InMemoryBreedingCycleRepository) -> Self {
        let repo = Arc::new(repo);
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(FixedClock::new(day(0)));
        let locks = Arc::new(CycleLocks::new());
        let creator = CreateCycleHandler::new(
            repo.clone(),
            bus.clone(),
            clock.clone(),
            EngineConfig::default(),
        )
        .with_locks(locks.clone());
        let orchestrator = Arc::new(
            CycleOrchestrator::new(repo.clone(), bus.clone(), clock.clone(), EngineConfig::default())
                .with_locks(locks),
        );
        Self {
            repo,
            bus,
            clock,
            creator,
            orchestrator,
        }
    }

    fn new() -> Self {
        Self::with_repo(InMemoryBreedingCycleRepository::new())
    }

    async fn create_in_heat(&self) -> BreedingCycle {
        let cmd = CreateCycleCommand::new(AnimalId::new(), 2024, SireProfile::new("Big Red", "Angus"))
            .with_code(code())
            .with_heat(HeatInfo::new(day(0), HeatDetectionMethod::Visual, HeatIntensity::Strong));
        self.creator.handle(cmd, metadata()).await.unwrap().cycle
    }

    async fn step(
        &self,
        at: i64,
        target: ServiceStatus,
        payload: SubrecordPayload,
    ) -> Result<BreedingCycle, TransitionError> {
        self.clock.set(day(at));
        self.orchestrator
            .propose_transition(
                ProposeTransitionCommand::new(code(), target, payload),
                metadata(),
                &CancellationToken::new(),
            )
            .await
            .map(|outcome| outcome.cycle)
    }
}

fn service(at: i64) -> SubrecordPayload {
    SubrecordPayload::Service {
        service: ServiceInfo::new(day(at), 1, ServiceMethod::NaturalService),
        germplasm: None,
    }
}

fn positive(at: i64) -> SubrecordPayload {
    SubrecordPayload::Diagnosis(PregnancyInfo::new(PregnancyDiagnosis::new(
        DiagnosisMethod::Ultrasound,
        day(at),
        DiagnosisResult::Positive,
    )))
}

fn calving(at: i64) -> SubrecordPayload {
    SubrecordPayload::Calving {
        calving: CalvingInfo::new(day(at), CalvingDifficulty::Easy),
        calf: Some(CalfInfo::new(CalfSex::Male, CalfViability::AliveNormal).with_birth_weight(38.0)),
    }
}

fn weaning(at: i64) -> SubrecordPayload {
    SubrecordPayload::Weaning(WeaningInfo::new(day(at), 243.0, WeaningMethod::Fenceline))
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn cycle_runs_from_heat_to_weaning() {
    let ranch = Ranch::new();
    ranch.create_in_heat().await;

    ranch.step(0, ServiceStatus::Serviced, service(0)).await.unwrap();
    let pregnant = ranch
        .step(35, ServiceStatus::ConfirmedPregnant, positive(35))
        .await
        .unwrap();
    assert_eq!(
        pregnant.pregnancy_info.as_ref().unwrap().expected_calving_date,
        Some(day(280))
    );

    let calved = ranch.step(282, ServiceStatus::Calved, calving(282)).await.unwrap();
    assert_eq!(calved.derived.as_ref().unwrap().efficiency.value.value(), 100);

    let weaned = ranch.step(487, ServiceStatus::Weaned, weaning(487)).await.unwrap();
    let weaning = weaned.weaning_info.as_ref().unwrap();
    assert_eq!(weaning.age_days, Some(205));
    assert_eq!(weaning.average_daily_gain_kg, Some(1.0));
    assert!(weaned.derived.as_ref().unwrap().reproduction.is_successful);

    assert_eq!(ranch.repo.get(&code()).await, Some(weaned));
    assert_eq!(ranch.repo.save_count(), 5);
    assert_eq!(ranch.bus.events_of_type("breeding_cycle.created.v1").len(), 1);
    assert_eq!(ranch.bus.events_of_type("breeding_cycle.transitioned.v1").len(), 4);
    assert_eq!(ranch.bus.events_for_aggregate(code().as_str()).len(), 5);
}

#[tokio::test]
async fn weaned_cycle_cannot_reenter_heat() {
    let ranch = Ranch::new();
    ranch.create_in_heat().await;
    ranch.step(0, ServiceStatus::Serviced, service(0)).await.unwrap();
    ranch.step(35, ServiceStatus::ConfirmedPregnant, positive(35)).await.unwrap();
    ranch.step(282, ServiceStatus::Calved, calving(282)).await.unwrap();
    let weaned = ranch.step(487, ServiceStatus::Weaned, weaning(487)).await.unwrap();

    let heat = HeatInfo::new(day(500), HeatDetectionMethod::Visual, HeatIntensity::Strong);
    let err = ranch
        .step(500, ServiceStatus::InHeat, SubrecordPayload::Heat(heat))
        .await
        .unwrap_err();

    assert!(err
        .violations()
        .contains(&ValidationError::invalid_transition("weaned", "in_heat")));
    assert_eq!(ranch.repo.get(&code()).await, Some(weaned));
}

#[tokio::test]
async fn soft_deleted_cycle_is_not_found() {
    let ranch = Ranch::new();
    let mut cycle = ranch.create_in_heat().await;
    cycle.audit.deleted_at = Some(day(1));
    ranch.repo.insert(cycle).await;

    let err = ranch.step(2, ServiceStatus::Serviced, service(2)).await.unwrap_err();

    assert!(matches!(err, TransitionError::CycleNotFound(_)));
}

// =============================================================================
// Concurrency, timeouts, cancellation
// =============================================================================

#[tokio::test]
async fn concurrent_transitions_commit_exactly_once() {
    let ranch = Ranch::with_repo(
        InMemoryBreedingCycleRepository::new().with_load_delay(Duration::from_millis(50)),
    );
    ranch.create_in_heat().await;
    let saves_before = ranch.repo.save_count();

    let first_token = CancellationToken::new();
    let second_token = CancellationToken::new();
    let first = ranch.orchestrator.propose_transition(
        ProposeTransitionCommand::new(code(), ServiceStatus::Serviced, service(0)),
        metadata(),
        &first_token,
    );
    let second = ranch.orchestrator.propose_transition(
        ProposeTransitionCommand::new(code(), ServiceStatus::Serviced, service(0)),
        metadata(),
        &second_token,
    );
    let (first, second) = tokio::join!(first, second);

    let results = [first, second];
    let committed = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(TransitionError::ConcurrentModification(_))))
        .count();
    assert_eq!(committed, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(ranch.repo.save_count(), saves_before + 1);
}

#[tokio::test]
async fn create_and_transition_share_one_lock_set() {
    let ranch = Ranch::with_repo(
        InMemoryBreedingCycleRepository::new().with_load_delay(Duration::from_millis(50)),
    );
    let create = ranch.creator.handle(
        CreateCycleCommand::new(AnimalId::new(), 2024, SireProfile::new("Big Red", "Angus"))
            .with_code(code()),
        metadata(),
    );
    let token = CancellationToken::new();
    let transition = ranch.orchestrator.propose_transition(
        ProposeTransitionCommand::new(code(), ServiceStatus::Serviced, service(0)),
        metadata(),
        &token,
    );

    let (created, transitioned) = tokio::join!(create, transition);

    assert!(created.is_ok());
    assert!(matches!(
        transitioned,
        Err(TransitionError::ConcurrentModification(_))
    ));
    assert_eq!(ranch.repo.save_count(), 1);
}

#[tokio::test]
async fn duplicate_create_is_rejected_after_commit() {
    let ranch = Ranch::new();
    ranch.create_in_heat().await;

    let err = ranch
        .creator
        .handle(
            CreateCycleCommand::new(AnimalId::new(), 2024, SireProfile::new("Big Red", "Angus"))
                .with_code(code()),
            metadata(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CreateCycleError::AlreadyExists(_)));
}

#[tokio::test]
async fn slow_storage_times_out_and_retains_nothing() {
    let ranch = Ranch::with_repo(
        InMemoryBreedingCycleRepository::new().with_save_delay(Duration::from_millis(200)),
    );
    let mut cycle = BreedingCycle::planned(
        code(),
        AnimalId::new(),
        2024,
        SireProfile::new("Big Red", "Angus"),
        UserId::new("rancher").unwrap(),
        day(0),
    );
    cycle.status = ServiceStatus::Serviced;
    cycle.service_info = Some(ServiceInfo::new(day(0), 1, ServiceMethod::NaturalService));
    ranch.repo.insert(cycle.clone()).await;
    ranch.clock.set(day(35));

    let err = ranch
        .orchestrator
        .propose_transition(
            ProposeTransitionCommand::new(code(), ServiceStatus::ConfirmedPregnant, positive(35))
                .with_timeout(Duration::from_millis(20)),
            metadata(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TransitionError::PersistenceTimeout(_)));
    assert_eq!(ranch.repo.get(&code()).await, Some(cycle));
    assert_eq!(ranch.bus.event_count(), 0);
}

#[tokio::test]
async fn cancelled_request_leaves_cycle_untouched() {
    let ranch = Ranch::new();
    let created = ranch.create_in_heat().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = ranch
        .orchestrator
        .propose_transition(
            ProposeTransitionCommand::new(code(), ServiceStatus::Serviced, service(0)),
            metadata(),
            &cancel,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TransitionError::Cancelled));
    assert!(!err.is_retryable());
    assert_eq!(ranch.repo.get(&code()).await, Some(created));
}

#[tokio::test]
async fn publish_failure_keeps_the_commit() {
    let ranch = Ranch::new();
    ranch.create_in_heat().await;
    ranch.bus.fail_publishes(true);

    let serviced = ranch.step(0, ServiceStatus::Serviced, service(0)).await.unwrap();

    assert_eq!(ranch.repo.get(&code()).await, Some(serviced));
    assert_eq!(ranch.bus.events_of_type("breeding_cycle.transitioned.v1").len(), 0);
}
