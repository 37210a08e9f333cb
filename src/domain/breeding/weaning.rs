//! Weaning and culling sub-records that close a cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaningMethod {
    Conventional,
    Fenceline,
    TwoStage,
    Early,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostWeaningCondition {
    Thriving,
    Stressed,
    Sick,
}

/// Separation of the calf from the dam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningInfo {
    pub weaning_date: Timestamp,
    /// Calf age in days at weaning. Computed from the calving date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<i64>,
    pub weight_kg: f64,
    pub method: WeaningMethod,
    /// Kilograms gained per day since birth. Computed when the birth weight is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_daily_gain_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_weaning_condition: Option<PostWeaningCondition>,
    #[serde(default)]
    pub cost: Decimal,
}

impl WeaningInfo {
    pub fn new(weaning_date: Timestamp, weight_kg: f64, method: WeaningMethod) -> Self {
        Self {
            weaning_date,
            age_days: None,
            weight_kg,
            method,
            average_daily_gain_kg: None,
            post_weaning_condition: None,
            cost: Decimal::ZERO,
        }
    }
}

/// Removal of the dam from the breeding herd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CullInfo {
    pub date: Timestamp,
    pub reason: String,
}

impl CullInfo {
    pub fn new(date: Timestamp, reason: impl Into<String>) -> Self {
        Self {
            date,
            reason: reason.into(),
        }
    }
}
