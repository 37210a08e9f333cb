//! Heat detection and service sub-records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// How oestrus was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatDetectionMethod {
    Visual,
    TailPaint,
    MountDetector,
    Pedometer,
    TeaserBull,
    /// Heat induced by a synchronisation protocol.
    Synchronized,
}

/// Observed strength of the heat signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatIntensity {
    Weak,
    Moderate,
    Strong,
}

/// Heat (oestrus) observation preceding a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatInfo {
    pub detected_at: Timestamp,
    pub detection_method: HeatDetectionMethod,
    pub intensity: HeatIntensity,
    /// Days since the previous observed heat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_length_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_regular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HeatInfo {
    pub fn new(
        detected_at: Timestamp,
        detection_method: HeatDetectionMethod,
        intensity: HeatIntensity,
    ) -> Self {
        Self {
            detected_at,
            detection_method,
            intensity,
            cycle_length_days: None,
            is_regular: None,
            notes: None,
        }
    }
}

/// Breeding method used for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMethod {
    NaturalService,
    ArtificialInsemination,
    TimedArtificialInsemination,
    EmbryoTransfer,
}

impl ServiceMethod {
    /// Returns true if the service consumes germplasm that must be tracked by batch.
    pub fn requires_germplasm(&self) -> bool {
        !matches!(self, ServiceMethod::NaturalService)
    }
}

/// Conditions recorded at the time of service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceConditions {
    /// Body condition score on the 1-9 beef scale.
    pub body_condition_score: Option<f64>,
    pub weather: Option<String>,
    pub notes: Option<String>,
}

/// A single breeding attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service_date: Timestamp,
    /// 1 for the first service of the cycle; incremented on every re-service.
    pub service_number: u32,
    pub method: ServiceMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default)]
    pub conditions: ServiceConditions,
    #[serde(default)]
    pub complications: Vec<String>,
    #[serde(default)]
    pub cost: Decimal,
}

impl ServiceInfo {
    pub fn new(service_date: Timestamp, service_number: u32, method: ServiceMethod) -> Self {
        Self {
            service_date,
            service_number,
            method,
            technician: None,
            conditions: ServiceConditions::default(),
            complications: Vec::new(),
            cost: Decimal::ZERO,
        }
    }

    /// Builder: set the service cost.
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = cost;
        self
    }
}
