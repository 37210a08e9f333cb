//! Analysis Module - Pure domain services over breeding cycles.
//!
//! # Components
//!
//! - `EfficiencyScorer` - 0-100 reproductive efficiency score over observed outcomes
//! - `AlertGenerator` - Calving, gestation, service and calf-health alerts
//! - `EconomicSummarizer` - Cost breakdown, net return, ROI and cost per day
//! - `ReproductionAnalyzer` - Services per conception, data quality, success flags
//!
//! All functions are pure. They take a record and, where time matters, an
//! explicit `now`, and return computed results. No ports or adapters needed.

mod alerts;
mod economics;
mod efficiency;
mod reproduction;

use serde::{Deserialize, Serialize};

use crate::domain::breeding::BreedingCycle;
use crate::domain::foundation::Timestamp;

pub use alerts::{
    Alert, AlertCategory, AlertGenerator, AlertSeverity, DEFAULT_GESTATION_DAYS,
    LOW_EFFICIENCY_THRESHOLD,
};
pub use economics::{CostBreakdown, EconomicSummarizer, EconomicSummary};
pub use efficiency::{EfficiencyFactor, EfficiencyScore, EfficiencyScorer};
pub use reproduction::{ReproductionAnalyzer, ReproductiveSummary};

/// Derived figures cached on a record at its last transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub efficiency: EfficiencyScore,
    pub reproduction: ReproductiveSummary,
    pub economics: EconomicSummary,
    pub alerts: Vec<Alert>,
    pub needs_attention: bool,
    pub computed_at: Timestamp,
}

/// Computes every derived figure for `cycle` as of `now`.
pub fn derive_metrics(cycle: &BreedingCycle, now: Timestamp) -> DerivedMetrics {
    let alerts = AlertGenerator::generate(cycle, now);
    DerivedMetrics {
        efficiency: EfficiencyScorer::score(cycle),
        reproduction: ReproductionAnalyzer::summarize(cycle),
        economics: EconomicSummarizer::summarize(cycle, now),
        needs_attention: AlertGenerator::needs_attention(&alerts),
        alerts,
        computed_at: now,
    }
}
