//! Sire profile and germplasm sub-records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnimalId, Percentage, Timestamp};

/// The male used for breeding, or the source of the germplasm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SireProfile {
    /// Herd identifier when the sire is owned; absent for purchased semen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sire_id: Option<AnimalId>,
    pub name: String,
    pub breed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetic_predictions: Option<GeneticPredictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_history: Option<SireServiceHistory>,
}

impl SireProfile {
    /// Creates a profile with only the required fields.
    pub fn new(name: impl Into<String>, breed: impl Into<String>) -> Self {
        Self {
            sire_id: None,
            name: name.into(),
            breed: breed.into(),
            registration_number: None,
            genetic_predictions: None,
            service_history: None,
        }
    }
}

/// Expected progeny differences as published by the breed association.
///
/// Stored as received; the engine never computes with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeneticPredictions {
    pub birth_weight_epd: Option<f64>,
    pub weaning_weight_epd: Option<f64>,
    pub calving_ease_epd: Option<f64>,
    pub milk_epd: Option<f64>,
    /// Opaque genomic test reference.
    pub genomic_profile_ref: Option<String>,
}

/// Aggregate of the sire's previous services across the herd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SireServiceHistory {
    pub total_services: u32,
    pub conception_rate: Percentage,
    pub calving_ease_rate: Percentage,
}

/// Kind of reproductive material used for assisted services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GermplasmType {
    FreshSemen,
    FrozenSemen,
    FreshEmbryo,
    FrozenEmbryo,
    Oocytes,
}

/// Laboratory quality metrics of a germplasm batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GermplasmQuality {
    pub motility_percent: Option<f64>,
    pub concentration_million_per_ml: Option<f64>,
    pub normal_morphology_percent: Option<f64>,
}

/// Germplasm (semen, embryo, oocytes) used for the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GermplasmInfo {
    pub kind: GermplasmType,
    pub batch_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
    #[serde(default)]
    pub quality: GermplasmQuality,
    pub doses_available: u32,
    pub doses_used: u32,
}

impl GermplasmInfo {
    /// Creates germplasm info for a batch with a single dose used.
    pub fn new(kind: GermplasmType, batch_number: impl Into<String>, doses_available: u32) -> Self {
        Self {
            kind,
            batch_number: batch_number.into(),
            supplier: None,
            collection_date: None,
            expiration_date: None,
            quality: GermplasmQuality::default(),
            doses_available,
            doses_used: 1,
        }
    }
}
