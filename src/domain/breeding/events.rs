//! Breeding cycle domain events.
//!
//! Events published after a record is committed:
//! - `BreedingCycleCreated` - New cycle opened for a dam
//! - `BreedingCycleTransitioned` - Cycle moved between service statuses

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, AnimalId, CycleCode, EventId, Timestamp, UserId,
};

use super::{BreedingCycle, ServiceStatus};

// ════════════════════════════════════════════════════════════════════════════
// BreedingCycleCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new breeding cycle is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingCycleCreated {
    pub event_id: EventId,
    pub cycle_code: CycleCode,
    pub dam_id: AnimalId,
    pub season_year: i32,
    pub sire_name: String,
    /// PLANNED or IN_HEAT.
    pub status: ServiceStatus,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    BreedingCycleCreated,
    event_type = "breeding_cycle.created.v1",
    schema_version = 1,
    aggregate_id = cycle_code,
    aggregate_type = "BreedingCycle",
    occurred_at = created_at,
    event_id = event_id
);

impl BreedingCycleCreated {
    pub fn from_cycle(cycle: &BreedingCycle) -> Self {
        Self {
            event_id: EventId::new(),
            cycle_code: cycle.cycle_code.clone(),
            dam_id: cycle.dam_id,
            season_year: cycle.season_year,
            sire_name: cycle.sire.name.clone(),
            status: cycle.status,
            created_by: cycle.audit.created_by.clone(),
            created_at: cycle.audit.created_at,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// BreedingCycleTransitioned
// ════════════════════════════════════════════════════════════════════════════

/// Published when a transition has been validated and saved.
///
/// Carries the derived attention flag so downstream consumers can route
/// alerts without reloading the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingCycleTransitioned {
    pub event_id: EventId,
    pub cycle_code: CycleCode,
    pub dam_id: AnimalId,
    pub from: ServiceStatus,
    pub to: ServiceStatus,
    /// Service number of the current attempt, if serviced.
    pub service_number: Option<u32>,
    pub efficiency_score: Option<u8>,
    pub needs_attention: bool,
    pub transitioned_by: UserId,
    pub transitioned_at: Timestamp,
}

domain_event!(
    BreedingCycleTransitioned,
    event_type = "breeding_cycle.transitioned.v1",
    schema_version = 1,
    aggregate_id = cycle_code,
    aggregate_type = "BreedingCycle",
    occurred_at = transitioned_at,
    event_id = event_id
);

impl BreedingCycleTransitioned {
    /// Builds the event from the committed record and the status it left.
    pub fn from_commit(from: ServiceStatus, cycle: &BreedingCycle) -> Self {
        let derived = cycle.derived.as_ref();
        Self {
            event_id: EventId::new(),
            cycle_code: cycle.cycle_code.clone(),
            dam_id: cycle.dam_id,
            from,
            to: cycle.status,
            service_number: cycle.service_info.as_ref().map(|s| s.service_number),
            efficiency_score: derived
                .filter(|d| d.efficiency.has_data())
                .map(|d| d.efficiency.value.value()),
            needs_attention: derived.map(|d| d.needs_attention).unwrap_or(false),
            transitioned_by: cycle.audit.updated_by.clone(),
            transitioned_at: cycle.audit.updated_at,
        }
    }
}
