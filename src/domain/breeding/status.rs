//! ServiceStatus enum tracking the reproductive stage of a breeding cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a breeding cycle.
///
/// Valid transitions:
/// - Planned -> InHeat | Serviced
/// - InHeat -> Serviced
/// - Serviced -> ConfirmedPregnant | Open | RepeatBreeding
/// - RepeatBreeding -> Serviced (re-service)
/// - Open -> InHeat | Serviced
/// - ConfirmedPregnant -> Aborted | Calved
/// - Calved -> Weaned | Culled
/// - Aborted -> Culled | InHeat
///
/// Weaned and Culled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Planned,
    InHeat,
    Serviced,
    ConfirmedPregnant,
    Open,
    RepeatBreeding,
    Aborted,
    Calved,
    Weaned,
    Culled,
}

impl ServiceStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ServiceStatus; 10] = [
        ServiceStatus::Planned,
        ServiceStatus::InHeat,
        ServiceStatus::Serviced,
        ServiceStatus::ConfirmedPregnant,
        ServiceStatus::Open,
        ServiceStatus::RepeatBreeding,
        ServiceStatus::Aborted,
        ServiceStatus::Calved,
        ServiceStatus::Weaned,
        ServiceStatus::Culled,
    ];

    /// Returns true while a pregnancy may be in progress and a calving date is expected.
    pub fn is_gestating(&self) -> bool {
        matches!(self, ServiceStatus::Serviced | ServiceStatus::ConfirmedPregnant)
    }

    /// Returns true once the dam has calved (including terminal states reached after calving).
    pub fn has_calved(&self) -> bool {
        matches!(self, ServiceStatus::Calved | ServiceStatus::Weaned)
    }

    /// Returns true if entering this status from `from` starts a new breeding attempt
    /// within the same cycle.
    pub fn starts_new_attempt(from: ServiceStatus, to: ServiceStatus) -> bool {
        use ServiceStatus::*;
        matches!(
            (from, to),
            (RepeatBreeding, Serviced) | (Open, Serviced) | (Open, InHeat) | (Aborted, InHeat)
        )
    }

    /// Returns the snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Planned => "planned",
            ServiceStatus::InHeat => "in_heat",
            ServiceStatus::Serviced => "serviced",
            ServiceStatus::ConfirmedPregnant => "confirmed_pregnant",
            ServiceStatus::Open => "open",
            ServiceStatus::RepeatBreeding => "repeat_breeding",
            ServiceStatus::Aborted => "aborted",
            ServiceStatus::Calved => "calved",
            ServiceStatus::Weaned => "weaned",
            ServiceStatus::Culled => "culled",
        }
    }
}

impl StateMachine for ServiceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ServiceStatus::*;
        matches!(
            (self, target),
            (Planned, InHeat)
                | (Planned, Serviced)
                | (InHeat, Serviced)
                | (Serviced, ConfirmedPregnant)
                | (Serviced, Open)
                | (Serviced, RepeatBreeding)
                | (RepeatBreeding, Serviced)
                | (Open, InHeat)
                | (Open, Serviced)
                | (ConfirmedPregnant, Aborted)
                | (ConfirmedPregnant, Calved)
                | (Calved, Weaned)
                | (Calved, Culled)
                | (Aborted, Culled)
                | (Aborted, InHeat)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ServiceStatus::*;
        match self {
            Planned => vec![InHeat, Serviced],
            InHeat => vec![Serviced],
            Serviced => vec![ConfirmedPregnant, Open, RepeatBreeding],
            RepeatBreeding => vec![Serviced],
            Open => vec![InHeat, Serviced],
            ConfirmedPregnant => vec![Aborted, Calved],
            Calved => vec![Weaned, Culled],
            Aborted => vec![Culled, InHeat],
            Weaned | Culled => vec![],
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
