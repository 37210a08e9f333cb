//! Cost and return accounting for a breeding cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::breeding::BreedingCycle;
use crate::domain::foundation::Timestamp;

/// Costs grouped by the stage that incurred them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub service: Decimal,
    pub pregnancy: Decimal,
    pub calving: Decimal,
    pub weaning: Decimal,
    /// Service and pregnancy costs of archived attempts.
    pub previous_attempts: Decimal,
}

impl CostBreakdown {
    /// Sum of every stage. Saturates instead of overflowing.
    pub fn total(&self) -> Decimal {
        [self.pregnancy, self.calving, self.weaning, self.previous_attempts]
            .into_iter()
            .fold(self.service, Decimal::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicSummary {
    pub costs: CostBreakdown,
    pub total_costs: Decimal,
    pub calf_value: Decimal,
    pub net_return: Decimal,
    /// Net return as a percentage of total costs. Absent when nothing was spent
    /// or the ratio does not fit in a `Decimal`.
    pub roi_percent: Option<Decimal>,
    pub cost_per_day: Decimal,
    /// Days from the first service to the end of the cycle, or to now while it is open.
    pub days_since_service: Option<i64>,
}

pub struct EconomicSummarizer;

impl EconomicSummarizer {
    pub fn summarize(cycle: &BreedingCycle, now: Timestamp) -> EconomicSummary {
        let costs = Self::costs(cycle);
        let total_costs = costs.total();
        let calf_value = cycle
            .calf_info
            .as_ref()
            .and_then(|c| c.estimated_value)
            .unwrap_or(Decimal::ZERO);
        let net_return = calf_value.saturating_sub(total_costs);

        let roi_percent = if total_costs.is_zero() {
            None
        } else {
            net_return
                .checked_div(total_costs)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|roi| roi.round_dp(2))
        };

        let days_since_service = cycle
            .first_service_date()
            .map(|first| Self::closing_date(cycle).unwrap_or(now).days_since(&first));
        let divisor = days_since_service.unwrap_or(0).max(1);
        let cost_per_day = total_costs
            .checked_div(Decimal::from(divisor))
            .unwrap_or(total_costs)
            .round_dp(2);

        EconomicSummary {
            costs,
            total_costs,
            calf_value,
            net_return,
            roi_percent,
            cost_per_day,
            days_since_service,
        }
    }

    fn costs(cycle: &BreedingCycle) -> CostBreakdown {
        let previous_attempts = cycle
            .previous_attempts
            .iter()
            .map(|a| {
                a.service_info.cost.saturating_add(
                    a.pregnancy_info
                        .as_ref()
                        .map(|p| p.total_cost())
                        .unwrap_or(Decimal::ZERO),
                )
            })
            .fold(Decimal::ZERO, Decimal::saturating_add);

        CostBreakdown {
            service: cycle.service_info.as_ref().map(|s| s.cost).unwrap_or_default(),
            pregnancy: cycle
                .pregnancy_info
                .as_ref()
                .map(|p| p.total_cost())
                .unwrap_or_default(),
            calving: cycle.calving_info.as_ref().map(|c| c.cost).unwrap_or_default(),
            weaning: cycle.weaning_info.as_ref().map(|w| w.cost).unwrap_or_default(),
            previous_attempts,
        }
    }

    /// Date the cycle closed, so cost-per-day stops moving once terminal.
    fn closing_date(cycle: &BreedingCycle) -> Option<Timestamp> {
        cycle
            .weaning_info
            .as_ref()
            .map(|w| w.weaning_date)
            .or_else(|| cycle.cull_info.as_ref().map(|c| c.date))
    }
}
