//! Calving and calf sub-records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnimalId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalvingDifficulty {
    Easy,
    SlightAssistance,
    ModerateAssistance,
    HardPull,
    Caesarean,
    Malpresentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacentaExpulsion {
    Normal,
    Delayed,
    Retained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamCondition {
    Good,
    Fair,
    Poor,
    Critical,
}

/// Who helped at calving and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalvingAssistance {
    pub assisted_by: String,
    pub technique: String,
    #[serde(default)]
    pub veterinarian_called: bool,
}

/// The calving event that ends a pregnancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalvingInfo {
    pub calving_date: Timestamp,
    /// Days from service to calving. Recomputed by the engine before validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gestation_length_days: Option<i64>,
    pub difficulty: CalvingDifficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistance: Option<CalvingAssistance>,
    #[serde(default)]
    pub complications: Vec<String>,
    pub placenta: PlacentaExpulsion,
    pub dam_condition: DamCondition,
    #[serde(default)]
    pub cost: Decimal,
}

impl CalvingInfo {
    pub fn new(calving_date: Timestamp, difficulty: CalvingDifficulty) -> Self {
        Self {
            calving_date,
            gestation_length_days: None,
            difficulty,
            assistance: None,
            complications: Vec::new(),
            placenta: PlacentaExpulsion::Normal,
            dam_condition: DamCondition::Good,
            cost: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalfSex {
    Male,
    Female,
    Freemartin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalfViability {
    AliveNormal,
    AliveWeak,
    Stillborn,
    DiedAfterBirth,
}

impl CalfViability {
    pub fn is_alive(&self) -> bool {
        matches!(self, CalfViability::AliveNormal | CalfViability::AliveWeak)
    }
}

/// Vital signs taken shortly after birth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BirthVitals {
    pub heart_rate_bpm: Option<u32>,
    pub respiratory_rate_bpm: Option<u32>,
    pub temperature_celsius: Option<f64>,
    pub minutes_to_stand: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColostrumSource {
    Dam,
    StoredColostrum,
    Replacer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColostrumInfo {
    pub source: ColostrumSource,
    pub hours_after_birth: f64,
    pub volume_liters: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationKind {
    EarTag,
    ElectronicTag,
    Brand,
    Tattoo,
    Registration,
}

/// An identification step completed for the calf (tagging, branding, registration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationMilestone {
    pub kind: IdentificationKind,
    pub value: String,
    pub date: Timestamp,
}

/// The offspring of the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalfInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calf_id: Option<AnimalId>,
    pub sex: CalfSex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_weight_kg: Option<f64>,
    pub viability: CalfViability,
    #[serde(default)]
    pub vitals: BirthVitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colostrum: Option<ColostrumInfo>,
    #[serde(default)]
    pub identification: Vec<IdentificationMilestone>,
    #[serde(default)]
    pub congenital_defects: Vec<String>,
    /// Market value used for the economic summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<Decimal>,
}

impl CalfInfo {
    pub fn new(sex: CalfSex, viability: CalfViability) -> Self {
        Self {
            calf_id: None,
            sex,
            birth_weight_kg: None,
            viability,
            vitals: BirthVitals::default(),
            colostrum: None,
            identification: Vec::new(),
            congenital_defects: Vec::new(),
            estimated_value: None,
        }
    }

    /// Builder: set the birth weight in kilograms.
    pub fn with_birth_weight(mut self, kg: f64) -> Self {
        self.birth_weight_kg = Some(kg);
        self
    }
}
