//! Reproductive performance summary of a cycle.

use serde::{Deserialize, Serialize};

use crate::domain::breeding::{BreedingCycle, DiagnosisResult, ServiceStatus};
use crate::domain::foundation::{Percentage, StateMachine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproductiveSummary {
    /// Services needed for the conception. Absent until conception is known.
    pub services_per_conception: Option<u32>,
    /// Days from the first service of the cycle to the conceiving service.
    pub days_to_conception: Option<i64>,
    pub gestation_length_days: Option<i64>,
    pub conception_rate: Option<Percentage>,
    /// Share of the sub-records expected at the reached status that are present.
    pub quality_score: Percentage,
    pub is_completed: bool,
    pub is_successful: bool,
}

pub struct ReproductionAnalyzer;

impl ReproductionAnalyzer {
    pub fn summarize(cycle: &BreedingCycle) -> ReproductiveSummary {
        let conceived = cycle
            .pregnancy_info
            .as_ref()
            .map(|p| p.diagnosis.result == DiagnosisResult::Positive)
            .unwrap_or(false)
            || cycle.calving_info.is_some();

        let conceiving_service = cycle.service_info.as_ref().filter(|_| conceived);
        let services_per_conception = conceiving_service.map(|s| s.service_number.max(1));
        let days_to_conception = conceiving_service.and_then(|s| {
            cycle
                .first_service_date()
                .map(|first| s.service_date.days_since(&first))
        });
        let conception_rate = services_per_conception.map(|n| Percentage::from_ratio(1, n));

        let gestation_length_days = cycle.calving_info.as_ref().and_then(|c| {
            c.gestation_length_days.or_else(|| {
                cycle
                    .service_info
                    .as_ref()
                    .map(|s| c.calving_date.days_since(&s.service_date))
            })
        });

        ReproductiveSummary {
            services_per_conception,
            days_to_conception,
            gestation_length_days,
            conception_rate,
            quality_score: Self::quality_score(cycle),
            is_completed: cycle.status.is_terminal(),
            is_successful: Self::is_successful(cycle),
        }
    }

    /// Calved or weaned with a live calf.
    pub fn is_successful(cycle: &BreedingCycle) -> bool {
        cycle.status.has_calved()
            && cycle
                .calf_info
                .as_ref()
                .map(|c| c.viability.is_alive())
                .unwrap_or(false)
    }

    /// Percentage of expected sub-records present for the cycle's status.
    ///
    /// A cycle with nothing expected yet scores 100.
    pub fn quality_score(cycle: &BreedingCycle) -> Percentage {
        let status = cycle.status;
        let serviced = !matches!(status, ServiceStatus::Planned | ServiceStatus::InHeat);
        let diagnosed = matches!(
            status,
            ServiceStatus::ConfirmedPregnant
                | ServiceStatus::Open
                | ServiceStatus::RepeatBreeding
                | ServiceStatus::Aborted
                | ServiceStatus::Calved
                | ServiceStatus::Weaned
        );
        let calved = status.has_calved() || (status == ServiceStatus::Culled && cycle.calving_info.is_some());
        let uses_germplasm = cycle
            .service_info
            .as_ref()
            .map(|s| s.method.requires_germplasm())
            .unwrap_or(false);

        let checks = [
            (status == ServiceStatus::InHeat || serviced, cycle.heat_info.is_some()),
            (serviced, cycle.service_info.is_some()),
            (serviced && uses_germplasm, cycle.germplasm_info.is_some()),
            (diagnosed, cycle.pregnancy_info.is_some()),
            (calved, cycle.calving_info.is_some()),
            (calved, cycle.calf_info.is_some()),
            (
                calved,
                cycle.calf_info.as_ref().and_then(|c| c.birth_weight_kg).is_some(),
            ),
            (status == ServiceStatus::Weaned, cycle.weaning_info.is_some()),
            (status == ServiceStatus::Culled, cycle.cull_info.is_some()),
        ];

        let expected = checks.iter().filter(|(expected, _)| *expected).count() as u32;
        if expected == 0 {
            return Percentage::HUNDRED;
        }
        let present = checks
            .iter()
            .filter(|(expected, present)| *expected && *present)
            .count() as u32;
        Percentage::from_ratio(present, expected)
    }
}
