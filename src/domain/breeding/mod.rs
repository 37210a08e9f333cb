//! Breeding module - the breeding cycle aggregate and its lifecycle.
//!
//! A `BreedingCycle` tracks one dam from breeding plan to weaning or culling.
//! Its status moves through the `ServiceStatus` state machine; every move is
//! justified by a stage sub-record carried in a `SubrecordPayload`.
//!
//! # Key Types
//!
//! - `BreedingCycle` - The aggregate record
//! - `ServiceStatus` - Lifecycle state machine
//! - `SubrecordPayload` - Stage data merged on transition
//! - `BreedingCycleCreated` / `BreedingCycleTransitioned` - Published events

mod calving;
mod events;
pub mod lifecycle;
mod payload;
mod pregnancy;
mod record;
mod service;
mod sire;
mod status;
pub mod validation;
mod weaning;

pub use calving::{
    BirthVitals, CalfInfo, CalfSex, CalfViability, CalvingAssistance, CalvingDifficulty,
    CalvingInfo, ColostrumInfo, ColostrumSource, DamCondition, IdentificationKind,
    IdentificationMilestone, PlacentaExpulsion,
};
pub use events::{BreedingCycleCreated, BreedingCycleTransitioned};
pub use lifecycle::{prepare_candidate, propose_transition, traceability_code};
pub use payload::SubrecordPayload;
pub use pregnancy::{
    DiagnosisMethod, DiagnosisResult, GestationEntry, PregnancyDiagnosis, PregnancyInfo,
    PregnancyLoss,
};
pub use record::{AuditInfo, BreedingAttempt, BreedingCycle};
pub use service::{
    HeatDetectionMethod, HeatInfo, HeatIntensity, ServiceConditions, ServiceInfo, ServiceMethod,
};
pub use sire::{
    GeneticPredictions, GermplasmInfo, GermplasmQuality, GermplasmType, SireProfile,
    SireServiceHistory,
};
pub use status::ServiceStatus;
pub use validation::{
    check_chronology, check_completeness, check_ranges, validate_record, validate_transition,
};
pub use weaning::{CullInfo, PostWeaningCondition, WeaningInfo, WeaningMethod};
