//! Sub-record payloads carried by a transition request.

use serde::{Deserialize, Serialize};

use super::{
    CalfInfo, CalvingInfo, CullInfo, GermplasmInfo, HeatInfo, PregnancyInfo, PregnancyLoss,
    ServiceInfo, WeaningInfo,
};

/// The sub-record that justifies a transition, tagged by lifecycle stage.
///
/// The payload is merged into a candidate copy of the record before
/// validation; a payload that does not match the requested target status is
/// caught by the completeness rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SubrecordPayload {
    Heat(HeatInfo),
    Service {
        service: ServiceInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        germplasm: Option<GermplasmInfo>,
    },
    Diagnosis(PregnancyInfo),
    Loss(PregnancyLoss),
    Calving {
        calving: CalvingInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calf: Option<CalfInfo>,
    },
    Weaning(WeaningInfo),
    Cull(CullInfo),
    /// No new data; the record must already hold the justifying sub-record.
    None,
}

impl SubrecordPayload {
    /// Returns the stage name used in logs.
    pub fn stage(&self) -> &'static str {
        match self {
            SubrecordPayload::Heat(_) => "heat",
            SubrecordPayload::Service { .. } => "service",
            SubrecordPayload::Diagnosis(_) => "diagnosis",
            SubrecordPayload::Loss(_) => "loss",
            SubrecordPayload::Calving { .. } => "calving",
            SubrecordPayload::Weaning(_) => "weaning",
            SubrecordPayload::Cull(_) => "cull",
            SubrecordPayload::None => "none",
        }
    }
}
