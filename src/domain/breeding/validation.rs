//! Validation rules for breeding cycles.
//!
//! Every rule is a pure function returning the violations it found. The
//! composite checks run every rule and concatenate the results; nothing
//! short-circuits, so a rejected request reports all of its problems.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::foundation::{StateMachine, Timestamp, ValidationError};

use super::{BreedingCycle, DiagnosisResult, PregnancyInfo, ServiceStatus};

/// Plausible birth weight of a calf, kilograms.
pub const BIRTH_WEIGHT_RANGE_KG: (f64, f64) = (15.0, 80.0);

/// Plausible gestation length, days from service to calving.
pub const GESTATION_RANGE_DAYS: (i64, i64) = (150, 400);

/// Plausible interval between two heats, days.
pub const HEAT_CYCLE_RANGE_DAYS: (u32, u32) = (14, 35);

/// Body condition score scale used at service.
pub const BODY_CONDITION_RANGE: (f64, f64) = (1.0, 9.0);

/// Upper bound for a weaning weight, kilograms.
pub const MAX_WEANING_WEIGHT_KG: f64 = 600.0;

/// Largest monetary amount accepted on any cost or value field.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Most decimal places accepted on a monetary amount.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Runs every rule that a stored record must satisfy regardless of status.
pub fn validate_record(cycle: &BreedingCycle) -> Vec<ValidationError> {
    let mut errors = check_chronology(cycle);
    errors.extend(check_ranges(cycle));
    errors
}

/// Runs every rule for moving a record from `from` to `candidate.status`.
///
/// `candidate` is the record with the payload already merged and the
/// target status applied.
pub fn validate_transition(from: ServiceStatus, candidate: &BreedingCycle) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Err(e) = from.transition_to(candidate.status) {
        errors.push(e);
    }
    errors.extend(check_completeness(candidate, candidate.status));
    errors.extend(validate_record(candidate));
    errors
}

fn ordered(
    errors: &mut Vec<ValidationError>,
    earlier: Option<Timestamp>,
    earlier_field: &str,
    later: Option<Timestamp>,
    later_field: &str,
) {
    if let (Some(earlier), Some(later)) = (earlier, later) {
        if later.is_before(&earlier) {
            errors.push(ValidationError::chronology(earlier_field, later_field));
        }
    }
}

/// Checks that dated events appear in lifecycle order.
pub fn check_chronology(cycle: &BreedingCycle) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let service_date = cycle.service_info.as_ref().map(|s| s.service_date);
    let calving_date = cycle.calving_info.as_ref().map(|c| c.calving_date);
    let diagnosis_date = cycle.pregnancy_info.as_ref().map(|p| p.diagnosis.date);
    let loss_date = cycle
        .pregnancy_info
        .as_ref()
        .and_then(|p| p.loss.as_ref())
        .map(|l| l.date);

    ordered(
        &mut errors,
        cycle.heat_info.as_ref().map(|h| h.detected_at),
        "heat_info.detected_at",
        service_date,
        "service_info.service_date",
    );
    ordered(
        &mut errors,
        service_date,
        "service_info.service_date",
        diagnosis_date,
        "pregnancy_info.diagnosis.date",
    );
    ordered(
        &mut errors,
        service_date,
        "service_info.service_date",
        loss_date,
        "pregnancy_info.loss.date",
    );
    ordered(
        &mut errors,
        diagnosis_date,
        "pregnancy_info.diagnosis.date",
        loss_date,
        "pregnancy_info.loss.date",
    );
    ordered(
        &mut errors,
        service_date,
        "service_info.service_date",
        calving_date,
        "calving_info.calving_date",
    );
    ordered(
        &mut errors,
        calving_date,
        "calving_info.calving_date",
        cycle.weaning_info.as_ref().map(|w| w.weaning_date),
        "weaning_info.weaning_date",
    );
    let cull_date = cycle.cull_info.as_ref().map(|c| c.date);
    ordered(
        &mut errors,
        service_date,
        "service_info.service_date",
        cull_date,
        "cull_info.date",
    );
    ordered(
        &mut errors,
        loss_date,
        "pregnancy_info.loss.date",
        cull_date,
        "cull_info.date",
    );
    ordered(
        &mut errors,
        calving_date,
        "calving_info.calving_date",
        cull_date,
        "cull_info.date",
    );

    if let Some(germplasm) = &cycle.germplasm_info {
        ordered(
            &mut errors,
            germplasm.collection_date,
            "germplasm_info.collection_date",
            service_date,
            "service_info.service_date",
        );
        ordered(
            &mut errors,
            service_date,
            "service_info.service_date",
            germplasm.expiration_date,
            "germplasm_info.expiration_date",
        );
        ordered(
            &mut errors,
            germplasm.collection_date,
            "germplasm_info.collection_date",
            germplasm.expiration_date,
            "germplasm_info.expiration_date",
        );
    }

    ordered(
        &mut errors,
        cycle
            .previous_attempts
            .iter()
            .map(|a| a.service_info.service_date)
            .max(),
        "previous_attempts.service_info.service_date",
        service_date,
        "service_info.service_date",
    );

    errors
}

/// Checks numeric fields against their plausible ranges.
pub fn check_ranges(cycle: &BreedingCycle) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(service) = &cycle.service_info {
        if service.service_number < 1 {
            errors.push(ValidationError::out_of_range(
                "service_info.service_number",
                1.0,
                f64::from(u32::MAX),
                f64::from(service.service_number),
            ));
        }
        if let Some(bcs) = service.conditions.body_condition_score {
            let (min, max) = BODY_CONDITION_RANGE;
            if !(min..=max).contains(&bcs) {
                errors.push(ValidationError::out_of_range(
                    "service_info.conditions.body_condition_score",
                    min,
                    max,
                    bcs,
                ));
            }
        }
    }

    if let (Some(service), Some(calving)) = (&cycle.service_info, &cycle.calving_info) {
        let days = calving.calving_date.days_since(&service.service_date);
        let (min, max) = GESTATION_RANGE_DAYS;
        if !(min..=max).contains(&days) {
            errors.push(ValidationError::implausible_gestation(days, min, max));
        }
    }

    if let Some(weight) = cycle.calf_info.as_ref().and_then(|c| c.birth_weight_kg) {
        let (min, max) = BIRTH_WEIGHT_RANGE_KG;
        if !(min..=max).contains(&weight) {
            errors.push(ValidationError::out_of_range(
                "calf_info.birth_weight_kg",
                min,
                max,
                weight,
            ));
        }
    }

    if let Some(length) = cycle.heat_info.as_ref().and_then(|h| h.cycle_length_days) {
        let (min, max) = HEAT_CYCLE_RANGE_DAYS;
        if !(min..=max).contains(&length) {
            errors.push(ValidationError::out_of_range(
                "heat_info.cycle_length_days",
                f64::from(min),
                f64::from(max),
                f64::from(length),
            ));
        }
    }

    if let Some(germplasm) = &cycle.germplasm_info {
        if germplasm.doses_used > germplasm.doses_available {
            errors.push(ValidationError::out_of_range(
                "germplasm_info.doses_used",
                0.0,
                f64::from(germplasm.doses_available),
                f64::from(germplasm.doses_used),
            ));
        }
    }

    check_amounts(cycle, &mut errors);

    if let Some(weaning) = &cycle.weaning_info {
        if weaning.weight_kg <= 0.0 || weaning.weight_kg > MAX_WEANING_WEIGHT_KG {
            errors.push(ValidationError::out_of_range(
                "weaning_info.weight_kg",
                0.0,
                MAX_WEANING_WEIGHT_KG,
                weaning.weight_kg,
            ));
        }
    }

    errors
}

fn check_amount(errors: &mut Vec<ValidationError>, field: &str, amount: Decimal) {
    let max = Decimal::from(MAX_AMOUNT);
    if amount < Decimal::ZERO || amount > max {
        errors.push(ValidationError::out_of_range(
            field,
            0.0,
            MAX_AMOUNT as f64,
            amount.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if amount.scale() > MAX_AMOUNT_SCALE {
        errors.push(ValidationError::out_of_range(
            format!("{}.scale", field),
            0.0,
            f64::from(MAX_AMOUNT_SCALE),
            f64::from(amount.scale()),
        ));
    }
}

fn check_pregnancy_amounts(
    errors: &mut Vec<ValidationError>,
    prefix: &str,
    pregnancy: &PregnancyInfo,
) {
    check_amount(errors, &format!("{}.diagnosis.cost", prefix), pregnancy.diagnosis.cost);
    for (name, entries) in [
        ("monitoring", &pregnancy.monitoring),
        ("nutrition", &pregnancy.nutrition),
        ("health", &pregnancy.health),
    ] {
        for (i, entry) in entries.iter().enumerate() {
            check_amount(errors, &format!("{}.{}[{}].cost", prefix, name, i), entry.cost);
        }
    }
    if let Some(loss) = &pregnancy.loss {
        check_amount(errors, &format!("{}.loss.cost", prefix), loss.cost);
    }
}

/// Costs and values must be non-negative, bounded and at most four decimals.
fn check_amounts(cycle: &BreedingCycle, errors: &mut Vec<ValidationError>) {
    if let Some(service) = &cycle.service_info {
        check_amount(errors, "service_info.cost", service.cost);
    }
    if let Some(pregnancy) = &cycle.pregnancy_info {
        check_pregnancy_amounts(errors, "pregnancy_info", pregnancy);
    }
    if let Some(calving) = &cycle.calving_info {
        check_amount(errors, "calving_info.cost", calving.cost);
    }
    if let Some(value) = cycle.calf_info.as_ref().and_then(|c| c.estimated_value) {
        check_amount(errors, "calf_info.estimated_value", value);
    }
    if let Some(weaning) = &cycle.weaning_info {
        check_amount(errors, "weaning_info.cost", weaning.cost);
    }
    for (i, attempt) in cycle.previous_attempts.iter().enumerate() {
        let prefix = format!("previous_attempts[{}]", i);
        check_amount(errors, &format!("{}.service_info.cost", prefix), attempt.service_info.cost);
        if let Some(pregnancy) = &attempt.pregnancy_info {
            check_pregnancy_amounts(errors, &format!("{}.pregnancy_info", prefix), pregnancy);
        }
    }
}

/// Returns true for every status that can only be reached after a service.
fn requires_service(status: ServiceStatus) -> bool {
    !matches!(status, ServiceStatus::Planned | ServiceStatus::InHeat)
}

/// Checks that the sub-records justifying `status` are present and filled in.
pub fn check_completeness(cycle: &BreedingCycle, status: ServiceStatus) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if requires_service(status) && cycle.service_info.is_none() {
        errors.push(ValidationError::missing_subrecord("service_info"));
    }

    match status {
        ServiceStatus::Planned => {}
        ServiceStatus::InHeat => {
            if cycle.heat_info.is_none() {
                errors.push(ValidationError::missing_subrecord("heat_info"));
            }
        }
        ServiceStatus::Serviced => {
            if cycle.sire.name.trim().is_empty() {
                errors.push(ValidationError::incomplete("sire", "name is empty"));
            }
            if let Some(service) = &cycle.service_info {
                if service.method.requires_germplasm() {
                    match &cycle.germplasm_info {
                        None => errors.push(ValidationError::missing_subrecord("germplasm_info")),
                        Some(g) if g.batch_number.trim().is_empty() => errors.push(
                            ValidationError::incomplete("germplasm_info", "batch_number is empty"),
                        ),
                        Some(_) => {}
                    }
                }
            }
        }
        ServiceStatus::ConfirmedPregnant => {
            check_diagnosis(cycle, &mut errors, &[DiagnosisResult::Positive], "positive");
        }
        ServiceStatus::Open => {
            check_diagnosis(cycle, &mut errors, &[DiagnosisResult::Negative], "negative");
        }
        ServiceStatus::RepeatBreeding => {
            check_diagnosis(
                cycle,
                &mut errors,
                &[DiagnosisResult::Negative, DiagnosisResult::Inconclusive],
                "negative or inconclusive",
            );
        }
        ServiceStatus::Aborted => match cycle.pregnancy_info.as_ref().and_then(|p| p.loss.as_ref()) {
            None => errors.push(ValidationError::incomplete(
                "pregnancy_info",
                "pregnancy loss record is missing",
            )),
            Some(loss) if loss.cause.trim().is_empty() => errors.push(
                ValidationError::incomplete("pregnancy_info", "loss.cause is empty"),
            ),
            Some(_) => {}
        },
        ServiceStatus::Calved => {
            if cycle.calving_info.is_none() {
                errors.push(ValidationError::missing_subrecord("calving_info"));
            }
        }
        ServiceStatus::Weaned => {
            if cycle.weaning_info.is_none() {
                errors.push(ValidationError::missing_subrecord("weaning_info"));
            }
            match &cycle.calf_info {
                None => errors.push(ValidationError::missing_subrecord("calf_info")),
                Some(calf) if !calf.viability.is_alive() => errors.push(
                    ValidationError::incomplete("calf_info", "calf must be alive to be weaned"),
                ),
                Some(_) => {}
            }
        }
        ServiceStatus::Culled => match &cycle.cull_info {
            None => errors.push(ValidationError::missing_subrecord("cull_info")),
            Some(cull) if cull.reason.trim().is_empty() => {
                errors.push(ValidationError::incomplete("cull_info", "reason is empty"))
            }
            Some(_) => {}
        },
    }

    errors
}

fn check_diagnosis(
    cycle: &BreedingCycle,
    errors: &mut Vec<ValidationError>,
    accepted: &[DiagnosisResult],
    expected: &str,
) {
    match &cycle.pregnancy_info {
        None => errors.push(ValidationError::missing_subrecord("pregnancy_info")),
        Some(p) if !accepted.contains(&p.diagnosis.result) => {
            errors.push(ValidationError::incomplete(
                "pregnancy_info",
                format!("diagnosis.result must be {}", expected),
            ))
        }
        Some(_) => {}
    }
}
