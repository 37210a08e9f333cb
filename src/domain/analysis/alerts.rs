//! Alert generation for breeding cycles.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::breeding::{BreedingCycle, CalfViability};
use crate::domain::foundation::Timestamp;

use super::EfficiencyScorer;

/// Days from service to calving assumed when no expected date was recorded.
pub const DEFAULT_GESTATION_DAYS: i64 = 280;

/// Score below which a cycle is flagged for low efficiency.
pub const LOW_EFFICIENCY_THRESHOLD: u8 = 60;

/// Overdue gestation beyond this many days is critical.
const CRITICAL_OVERDUE_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Calving,
    Gestation,
    Service,
    CalvingComplication,
    CalfHealth,
    Efficiency,
}

/// A condition on the cycle that a rancher should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub message: String,
    /// 1 is the most urgent.
    pub priority: u8,
}

impl Alert {
    fn new(severity: AlertSeverity, category: AlertCategory, priority: u8, message: String) -> Self {
        Self {
            severity,
            category,
            message,
            priority,
        }
    }

    /// Returns true if this alert alone requires attention.
    pub fn is_urgent(&self) -> bool {
        match self.severity {
            AlertSeverity::Critical => true,
            AlertSeverity::Warning => self.priority <= 2,
            AlertSeverity::Info => false,
        }
    }
}

pub struct AlertGenerator;

impl AlertGenerator {
    /// Expected calving date if recorded, otherwise service date plus the default gestation.
    pub fn estimated_calving_date(cycle: &BreedingCycle) -> Option<Timestamp> {
        cycle
            .pregnancy_info
            .as_ref()
            .and_then(|p| p.expected_calving_date)
            .or_else(|| {
                cycle
                    .service_info
                    .as_ref()
                    .map(|s| s.service_date.add_days(DEFAULT_GESTATION_DAYS))
            })
    }

    /// Evaluates every alert rule against the cycle, sorted by priority.
    pub fn generate(cycle: &BreedingCycle, now: Timestamp) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if cycle.status.is_gestating() && cycle.calving_info.is_none() {
            if let Some(estimated) = Self::estimated_calving_date(cycle) {
                alerts.extend(Self::calving_alert(estimated, now));
            }
        }

        if let Some(service) = &cycle.service_info {
            if service.service_number > 3 {
                alerts.push(Alert::new(
                    AlertSeverity::Warning,
                    AlertCategory::Service,
                    2,
                    format!("Multiple services: {} services recorded", service.service_number),
                ));
            }
        }

        if let Some(calving) = &cycle.calving_info {
            if !calving.complications.is_empty() {
                alerts.push(Alert::new(
                    AlertSeverity::Warning,
                    AlertCategory::CalvingComplication,
                    2,
                    format!("Calving complications: {}", calving.complications.join(", ")),
                ));
            }
        }

        if let Some(calf) = &cycle.calf_info {
            if calf.viability == CalfViability::AliveWeak {
                alerts.push(Alert::new(
                    AlertSeverity::Warning,
                    AlertCategory::CalfHealth,
                    1,
                    "Weak calf requires monitoring".to_string(),
                ));
            }
        }

        let score = EfficiencyScorer::score(cycle);
        if score.has_data() && score.value.value() < LOW_EFFICIENCY_THRESHOLD {
            alerts.push(Alert::new(
                AlertSeverity::Warning,
                AlertCategory::Efficiency,
                2,
                format!("Low reproductive efficiency: score {}", score.value),
            ));
        }

        alerts.sort_by_key(|a| a.priority);
        alerts
    }

    /// Returns true if any alert is critical or an urgent warning.
    pub fn needs_attention(alerts: &[Alert]) -> bool {
        alerts.iter().any(Alert::is_urgent)
    }

    fn calving_alert(estimated: Timestamp, now: Timestamp) -> Option<Alert> {
        let remaining = estimated.duration_since(&now);

        if remaining < Duration::zero() {
            let overdue = now.duration_since(&estimated);
            let (severity, priority) = if overdue > Duration::days(CRITICAL_OVERDUE_DAYS) {
                (AlertSeverity::Critical, 1)
            } else {
                (AlertSeverity::Warning, 2)
            };
            Some(Alert::new(
                severity,
                AlertCategory::Gestation,
                priority,
                format!("Gestation overdue by {} days", overdue.num_days()),
            ))
        } else if remaining <= Duration::days(7) {
            Some(Alert::new(
                AlertSeverity::Warning,
                AlertCategory::Calving,
                1,
                format!("Calving imminent: expected in {} days", remaining.num_days()),
            ))
        } else if remaining <= Duration::days(14) {
            Some(Alert::new(
                AlertSeverity::Info,
                AlertCategory::Calving,
                3,
                format!("Calving approaching: expected in {} days", remaining.num_days()),
            ))
        } else {
            None
        }
    }
}
