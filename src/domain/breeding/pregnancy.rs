//! Pregnancy diagnosis, gestation follow-up and pregnancy loss.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisMethod {
    RectalPalpation,
    Ultrasound,
    BloodTest,
    MilkTest,
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisResult {
    Positive,
    Negative,
    Inconclusive,
}

/// Outcome of a pregnancy check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyDiagnosis {
    pub method: DiagnosisMethod,
    pub date: Timestamp,
    pub result: DiagnosisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub cost: Decimal,
}

impl PregnancyDiagnosis {
    pub fn new(method: DiagnosisMethod, date: Timestamp, result: DiagnosisResult) -> Self {
        Self {
            method,
            date,
            result,
            veterinarian: None,
            cost: Decimal::ZERO,
        }
    }
}

/// A dated note recorded during gestation (check-up, ration change, treatment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestationEntry {
    pub date: Timestamp,
    pub description: String,
    #[serde(default)]
    pub cost: Decimal,
}

/// Record of an embryonic or foetal loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyLoss {
    pub date: Timestamp,
    pub cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_gestation_days: Option<i64>,
    #[serde(default)]
    pub cost: Decimal,
}

/// Everything known about the pregnancy following a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyInfo {
    pub diagnosis: PregnancyDiagnosis,
    /// Filled from the diagnosis or computed from the service date on a positive result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_calving_date: Option<Timestamp>,
    #[serde(default)]
    pub monitoring: Vec<GestationEntry>,
    #[serde(default)]
    pub nutrition: Vec<GestationEntry>,
    #[serde(default)]
    pub health: Vec<GestationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<PregnancyLoss>,
}

impl PregnancyInfo {
    pub fn new(diagnosis: PregnancyDiagnosis) -> Self {
        Self {
            diagnosis,
            expected_calving_date: None,
            monitoring: Vec::new(),
            nutrition: Vec::new(),
            health: Vec::new(),
            loss: None,
        }
    }

    /// Returns true if the diagnosis confirmed a pregnancy.
    pub fn is_positive(&self) -> bool {
        self.diagnosis.result == DiagnosisResult::Positive
    }

    /// Sum of every cost recorded against this pregnancy.
    pub fn total_cost(&self) -> Decimal {
        let loss = self.loss.as_ref().map(|l| l.cost).unwrap_or(Decimal::ZERO);
        self.monitoring
            .iter()
            .chain(self.nutrition.iter())
            .chain(self.health.iter())
            .map(|e| e.cost)
            .chain(std::iter::once(loss))
            .fold(self.diagnosis.cost, Decimal::saturating_add)
    }
}
