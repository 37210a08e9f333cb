//! Reproductive efficiency scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::breeding::{BreedingCycle, CalfViability, CalvingDifficulty, DiagnosisResult};
use crate::domain::foundation::Percentage;

/// Observable outcome that contributes to the efficiency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyFactor {
    ServiceEfficiency,
    GestationNormalcy,
    CalvingEase,
    CalfViability,
    BirthWeightNormalcy,
}

impl EfficiencyFactor {
    pub const ALL: [EfficiencyFactor; 5] = [
        EfficiencyFactor::ServiceEfficiency,
        EfficiencyFactor::GestationNormalcy,
        EfficiencyFactor::CalvingEase,
        EfficiencyFactor::CalfViability,
        EfficiencyFactor::BirthWeightNormalcy,
    ];

    /// Weight of the factor in the 100-point scale.
    pub fn max_points(&self) -> u32 {
        match self {
            EfficiencyFactor::ServiceEfficiency => 30,
            EfficiencyFactor::GestationNormalcy => 20,
            EfficiencyFactor::CalvingEase => 15,
            EfficiencyFactor::CalfViability => 20,
            EfficiencyFactor::BirthWeightNormalcy => 15,
        }
    }
}

impl fmt::Display for EfficiencyFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EfficiencyFactor::ServiceEfficiency => "service efficiency",
            EfficiencyFactor::GestationNormalcy => "gestation normalcy",
            EfficiencyFactor::CalvingEase => "calving ease",
            EfficiencyFactor::CalfViability => "calf viability",
            EfficiencyFactor::BirthWeightNormalcy => "birth weight normalcy",
        };
        write!(f, "{}", s)
    }
}

/// Result of scoring a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyScore {
    /// Earned points over applicable points, 0-100.
    pub value: Percentage,
    /// Earned points per factor whose data was present.
    pub breakdown: BTreeMap<EfficiencyFactor, u32>,
    /// Sum of the maximum points of the factors in `breakdown`.
    pub applicable_max: u32,
}

impl EfficiencyScore {
    /// Total points earned across applicable factors.
    pub fn earned(&self) -> u32 {
        self.breakdown.values().sum()
    }

    /// Returns true if at least one factor could be evaluated.
    pub fn has_data(&self) -> bool {
        self.applicable_max > 0
    }
}

/// Scores a cycle from whatever outcomes have been observed so far.
///
/// Factors without data are left out of both numerator and denominator, so a
/// cycle that has only reached diagnosis is scored on service efficiency alone.
pub struct EfficiencyScorer;

impl EfficiencyScorer {
    /// Computes the efficiency score of a cycle in any state.
    pub fn score(cycle: &BreedingCycle) -> EfficiencyScore {
        let mut breakdown = BTreeMap::new();
        for factor in EfficiencyFactor::ALL {
            if let Some(points) = Self::factor_points(cycle, factor) {
                breakdown.insert(factor, points);
            }
        }

        let applicable_max: u32 = breakdown.keys().map(|f| f.max_points()).sum();
        let earned: u32 = breakdown.values().sum();

        EfficiencyScore {
            value: Percentage::from_ratio(earned, applicable_max),
            breakdown,
            applicable_max,
        }
    }

    /// Points earned for a single factor, or `None` when its data is absent.
    pub fn factor_points(cycle: &BreedingCycle, factor: EfficiencyFactor) -> Option<u32> {
        match factor {
            EfficiencyFactor::ServiceEfficiency => Self::service_points(cycle),
            EfficiencyFactor::GestationNormalcy => Self::gestation_points(cycle),
            EfficiencyFactor::CalvingEase => cycle.calving_info.as_ref().map(|c| match c.difficulty {
                CalvingDifficulty::Easy => 15,
                CalvingDifficulty::SlightAssistance => 10,
                _ => 2,
            }),
            EfficiencyFactor::CalfViability => cycle.calf_info.as_ref().map(|c| match c.viability {
                CalfViability::AliveNormal => 20,
                CalfViability::AliveWeak => 10,
                CalfViability::Stillborn | CalfViability::DiedAfterBirth => 0,
            }),
            EfficiencyFactor::BirthWeightNormalcy => cycle
                .calf_info
                .as_ref()
                .and_then(|c| c.birth_weight_kg)
                .map(|kg| {
                    if (30.0..=45.0).contains(&kg) {
                        15
                    } else if (25.0..=50.0).contains(&kg) {
                        10
                    } else {
                        2
                    }
                }),
        }
    }

    fn service_points(cycle: &BreedingCycle) -> Option<u32> {
        let service = cycle.service_info.as_ref()?;
        let diagnosis = cycle.pregnancy_info.as_ref().map(|p| p.diagnosis.result);
        let conceived = diagnosis == Some(DiagnosisResult::Positive) || cycle.calving_info.is_some();

        if conceived {
            Some(match service.service_number {
                0 | 1 => 30,
                2 => 20,
                _ => 10,
            })
        } else if diagnosis == Some(DiagnosisResult::Negative) {
            Some(0)
        } else {
            None
        }
    }

    fn gestation_points(cycle: &BreedingCycle) -> Option<u32> {
        let calving = cycle.calving_info.as_ref()?;
        let days = match calving.gestation_length_days {
            Some(days) => days,
            None => calving
                .calving_date
                .days_since(&cycle.service_info.as_ref()?.service_date),
        };
        Some(if (275..=285).contains(&days) {
            20
        } else if (270..=290).contains(&days) {
            15
        } else {
            5
        })
    }
}
