//! BreedingCycle - one breeding attempt for one dam.
//!
//! The record is plain data. Every lifecycle rule lives in `validation` and
//! `lifecycle`; every derived figure is computed by `domain::analysis` and
//! cached in `derived`.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::DerivedMetrics;
use crate::domain::foundation::{AnimalId, BreedingSeasonId, CycleCode, Timestamp, UserId};

use super::{
    CalfInfo, CalvingInfo, CullInfo, GermplasmInfo, HeatInfo, PregnancyInfo, ServiceInfo,
    ServiceStatus, SireProfile, WeaningInfo,
};

/// Who touched the record and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Soft-delete marker. Deleted records are invisible to the orchestrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl AuditInfo {
    pub fn created(by: UserId, at: Timestamp) -> Self {
        Self {
            created_by: by.clone(),
            updated_by: by,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    /// Records an update by `by` at `at`.
    pub fn touch(&mut self, by: UserId, at: Timestamp) {
        self.updated_by = by;
        self.updated_at = at;
    }
}

/// An earlier service within the same cycle code, archived when a new attempt starts.
///
/// The log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingAttempt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_info: Option<HeatInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub germplasm_info: Option<GermplasmInfo>,
    pub service_info: ServiceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pregnancy_info: Option<PregnancyInfo>,
    pub archived_at: Timestamp,
}

/// The breeding cycle aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingCycle {
    pub cycle_code: CycleCode,
    pub dam_id: AnimalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_id: Option<BreedingSeasonId>,
    pub season_year: i32,
    /// Assigned by the pre-commit step on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceability_code: Option<String>,
    pub status: ServiceStatus,
    pub sire: SireProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub germplasm_info: Option<GermplasmInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_info: Option<HeatInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_info: Option<ServiceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pregnancy_info: Option<PregnancyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calving_info: Option<CalvingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calf_info: Option<CalfInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaning_info: Option<WeaningInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cull_info: Option<CullInfo>,
    #[serde(default)]
    pub previous_attempts: Vec<BreedingAttempt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedMetrics>,
    pub audit: AuditInfo,
}

impl BreedingCycle {
    /// Creates a cycle in the `Planned` state with no sub-records.
    pub fn planned(
        cycle_code: CycleCode,
        dam_id: AnimalId,
        season_year: i32,
        sire: SireProfile,
        created_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            cycle_code,
            dam_id,
            season_id: None,
            season_year,
            traceability_code: None,
            status: ServiceStatus::Planned,
            sire,
            germplasm_info: None,
            heat_info: None,
            service_info: None,
            pregnancy_info: None,
            calving_info: None,
            calf_info: None,
            weaning_info: None,
            cull_info: None,
            previous_attempts: Vec::new(),
            derived: None,
            audit: AuditInfo::created(created_by, now),
        }
    }

    /// Returns true if the record carries a soft-delete marker.
    pub fn is_deleted(&self) -> bool {
        self.audit.deleted_at.is_some()
    }

    /// Number of services recorded for the cycle, including the current one.
    pub fn services_recorded(&self) -> u32 {
        let current = self.service_info.as_ref().map(|s| s.service_number).unwrap_or(0);
        let archived = self
            .previous_attempts
            .iter()
            .map(|a| a.service_info.service_number)
            .max()
            .unwrap_or(0);
        current.max(archived)
    }

    /// Date of the earliest service in the cycle, archived attempts included.
    pub fn first_service_date(&self) -> Option<Timestamp> {
        self.previous_attempts
            .iter()
            .map(|a| a.service_info.service_date)
            .chain(self.service_info.as_ref().map(|s| s.service_date))
            .min()
    }
}
