//! Transition proposal: merge, pre-commit computation, validation.
//!
//! A transition never mutates the stored record. It builds a candidate copy,
//! applies the payload and every pre-save computed value, validates the
//! candidate as a whole, and only then hands it back for persistence.

use sha2::{Digest, Sha256};

use crate::domain::analysis::{derive_metrics, DEFAULT_GESTATION_DAYS};
use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::{
    validate_transition, BreedingAttempt, BreedingCycle, ServiceStatus, SubrecordPayload,
};

/// Prefix of every traceability code.
pub const TRACEABILITY_PREFIX: &str = "TRC-";

/// Builds the candidate record for moving `record` to `target`.
///
/// Runs the pre-commit step:
/// - archives the current attempt when the edge starts a new one
/// - merges the payload sub-record
/// - numbers re-services after the last archived attempt
/// - fills computed leaf values (gestation length, expected calving date,
///   weaning age and daily gain)
/// - assigns a traceability code if the record has none
///
/// The result is not validated.
pub fn prepare_candidate(
    record: &BreedingCycle,
    target: ServiceStatus,
    payload: SubrecordPayload,
    actor: &UserId,
    now: Timestamp,
) -> BreedingCycle {
    let mut candidate = record.clone();

    if ServiceStatus::starts_new_attempt(record.status, target) {
        archive_current_attempt(&mut candidate, now);
    }

    let reservice = matches!(payload, SubrecordPayload::Service { .. });
    merge_payload(&mut candidate, payload);

    if reservice {
        let last = candidate
            .previous_attempts
            .iter()
            .map(|a| a.service_info.service_number)
            .max();
        if let (Some(last), Some(service)) = (last, candidate.service_info.as_mut()) {
            service.service_number = last + 1;
        }
    }

    fill_computed_values(&mut candidate);

    if candidate.traceability_code.is_none() {
        candidate.traceability_code = Some(traceability_code(&candidate));
    }

    candidate.status = target;
    candidate.audit.touch(actor.clone(), now);
    candidate
}

/// Proposes a transition without side effects.
///
/// Returns the validated candidate with fresh derived metrics, or every
/// violation found. The input record is never modified.
pub fn propose_transition(
    record: &BreedingCycle,
    target: ServiceStatus,
    payload: SubrecordPayload,
    actor: &UserId,
    now: Timestamp,
) -> Result<BreedingCycle, Vec<ValidationError>> {
    let mut candidate = prepare_candidate(record, target, payload, actor, now);

    let errors = validate_transition(record.status, &candidate);
    if !errors.is_empty() {
        return Err(errors);
    }

    candidate.derived = Some(derive_metrics(&candidate, now));
    Ok(candidate)
}

/// Moves the current heat, germplasm, service and pregnancy into the attempt log.
fn archive_current_attempt(cycle: &mut BreedingCycle, now: Timestamp) {
    let Some(service_info) = cycle.service_info.take() else {
        return;
    };
    cycle.previous_attempts.push(BreedingAttempt {
        heat_info: cycle.heat_info.take(),
        germplasm_info: cycle.germplasm_info.take(),
        service_info,
        pregnancy_info: cycle.pregnancy_info.take(),
        archived_at: now,
    });
}

fn merge_payload(cycle: &mut BreedingCycle, payload: SubrecordPayload) {
    match payload {
        SubrecordPayload::Heat(heat) => cycle.heat_info = Some(heat),
        SubrecordPayload::Service { service, germplasm } => {
            cycle.service_info = Some(service);
            if germplasm.is_some() {
                cycle.germplasm_info = germplasm;
            }
        }
        SubrecordPayload::Diagnosis(pregnancy) => cycle.pregnancy_info = Some(pregnancy),
        SubrecordPayload::Loss(loss) => {
            if let Some(pregnancy) = cycle.pregnancy_info.as_mut() {
                pregnancy.loss = Some(loss);
            }
        }
        SubrecordPayload::Calving { calving, calf } => {
            cycle.calving_info = Some(calving);
            if calf.is_some() {
                cycle.calf_info = calf;
            }
        }
        SubrecordPayload::Weaning(weaning) => cycle.weaning_info = Some(weaning),
        SubrecordPayload::Cull(cull) => cycle.cull_info = Some(cull),
        SubrecordPayload::None => {}
    }
}

fn fill_computed_values(cycle: &mut BreedingCycle) {
    let service_date = cycle.service_info.as_ref().map(|s| s.service_date);

    if let (Some(service_date), Some(pregnancy)) = (service_date, cycle.pregnancy_info.as_mut()) {
        if pregnancy.is_positive() && pregnancy.expected_calving_date.is_none() {
            pregnancy.expected_calving_date = Some(service_date.add_days(DEFAULT_GESTATION_DAYS));
        }
    }

    if let (Some(service_date), Some(calving)) = (service_date, cycle.calving_info.as_mut()) {
        calving.gestation_length_days = Some(calving.calving_date.days_since(&service_date));
    }

    let calving_date = cycle.calving_info.as_ref().map(|c| c.calving_date);
    let birth_weight = cycle.calf_info.as_ref().and_then(|c| c.birth_weight_kg);
    if let (Some(calving_date), Some(weaning)) = (calving_date, cycle.weaning_info.as_mut()) {
        let age = weaning.weaning_date.days_since(&calving_date);
        weaning.age_days = Some(age);
        weaning.average_daily_gain_kg = match birth_weight {
            Some(birth) if age > 0 => Some(round3((weaning.weight_kg - birth) / age as f64)),
            _ => None,
        };
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Derives the traceability code from the cycle code, dam and creation time.
///
/// Deterministic, so re-deriving for the same record yields the same code.
pub fn traceability_code(cycle: &BreedingCycle) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cycle.cycle_code.as_str().as_bytes());
    hasher.update(cycle.dam_id.to_string().as_bytes());
    hasher.update(cycle.audit.created_at.as_unix_millis().to_be_bytes());
    let digest = hasher.finalize();

    let hex: String = digest.iter().take(6).map(|b| format!("{:02X}", b)).collect();
    format!("{}{}", TRACEABILITY_PREFIX, hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breeding::{
        CalfInfo, CalfSex, CalfViability, CalvingDifficulty, CalvingInfo, CullInfo,
        DiagnosisMethod, DiagnosisResult, HeatDetectionMethod, HeatInfo, HeatIntensity,
        PregnancyDiagnosis, PregnancyInfo, PregnancyLoss, ServiceInfo, ServiceMethod, SireProfile,
        WeaningInfo, WeaningMethod,
    };
    use crate::domain::breeding::validate_record;
    use crate::domain::foundation::{AnimalId, CycleCode, StateMachine};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn day(n: i64) -> Timestamp {
        Timestamp::from_ymd(2024, 4, 1).unwrap().add_days(n)
    }

    fn rancher() -> UserId {
        UserId::new("rancher").unwrap()
    }

    fn planned() -> BreedingCycle {
        BreedingCycle::planned(
            CycleCode::new("BC-2024-0042").unwrap(),
            AnimalId::new(),
            2024,
            SireProfile::new("Big Red", "Angus"),
            rancher(),
            day(-30),
        )
    }

    fn step(
        record: &BreedingCycle,
        target: ServiceStatus,
        payload: SubrecordPayload,
        at: i64,
    ) -> BreedingCycle {
        propose_transition(record, target, payload, &rancher(), day(at)).unwrap()
    }

    fn heat(at: i64) -> SubrecordPayload {
        SubrecordPayload::Heat(HeatInfo::new(day(at), HeatDetectionMethod::Visual, HeatIntensity::Strong))
    }

    fn service(at: i64, number: u32) -> SubrecordPayload {
        SubrecordPayload::Service {
            service: ServiceInfo::new(day(at), number, ServiceMethod::NaturalService),
            germplasm: None,
        }
    }

    fn diagnosis(at: i64, result: DiagnosisResult) -> SubrecordPayload {
        SubrecordPayload::Diagnosis(PregnancyInfo::new(PregnancyDiagnosis::new(
            DiagnosisMethod::Ultrasound,
            day(at),
            result,
        )))
    }

    fn serviced() -> BreedingCycle {
        let in_heat = step(&planned(), ServiceStatus::InHeat, heat(0), 0);
        step(&in_heat, ServiceStatus::Serviced, service(0, 1), 0)
    }

    fn calved() -> BreedingCycle {
        let pregnant = step(
            &serviced(),
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            35,
        );
        step(
            &pregnant,
            ServiceStatus::Calved,
            SubrecordPayload::Calving {
                calving: CalvingInfo::new(day(282), CalvingDifficulty::Easy),
                calf: Some(CalfInfo::new(CalfSex::Female, CalfViability::AliveNormal).with_birth_weight(38.0)),
            },
            282,
        )
    }

    #[test]
    fn full_lifecycle_reaches_weaned_with_perfect_score() {
        let calved = calved();
        let derived = calved.derived.as_ref().unwrap();
        assert_eq!(derived.efficiency.value.value(), 100);
        assert_eq!(calved.calving_info.as_ref().unwrap().gestation_length_days, Some(282));

        let weaned = step(
            &calved,
            ServiceStatus::Weaned,
            SubrecordPayload::Weaning(WeaningInfo::new(day(487), 243.0, WeaningMethod::Fenceline)),
            487,
        );

        let weaning = weaned.weaning_info.as_ref().unwrap();
        assert_eq!(weaned.status, ServiceStatus::Weaned);
        assert_eq!(weaning.age_days, Some(205));
        assert_eq!(weaning.average_daily_gain_kg, Some(1.0));
        assert!(weaned.derived.as_ref().unwrap().reproduction.is_completed);
    }

    #[test]
    fn input_record_is_not_modified() {
        let record = serviced();
        let before = record.clone();

        let _ = propose_transition(
            &record,
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            &rancher(),
            day(35),
        );
        let _ = propose_transition(&record, ServiceStatus::Weaned, SubrecordPayload::None, &rancher(), day(35));

        assert_eq!(record, before);
    }

    #[test]
    fn positive_diagnosis_sets_expected_calving_date() {
        let pregnant = step(
            &serviced(),
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            35,
        );
        assert_eq!(
            pregnant.pregnancy_info.as_ref().unwrap().expected_calving_date,
            Some(day(280))
        );
    }

    #[test]
    fn traceability_code_is_assigned_once_and_stable() {
        let in_heat = step(&planned(), ServiceStatus::InHeat, heat(0), 0);
        let code = in_heat.traceability_code.clone().unwrap();

        assert!(code.starts_with(TRACEABILITY_PREFIX));
        assert_eq!(code.len(), TRACEABILITY_PREFIX.len() + 12);
        assert_eq!(code, traceability_code(&in_heat));

        let serviced = step(&in_heat, ServiceStatus::Serviced, service(0, 1), 0);
        assert_eq!(serviced.traceability_code, Some(code));
    }

    #[test]
    fn audit_records_the_actor() {
        let record = serviced();
        let vet = UserId::new("vet").unwrap();
        let next = propose_transition(
            &record,
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            &vet,
            day(36),
        )
        .unwrap();

        assert_eq!(next.audit.updated_by, vet);
        assert_eq!(next.audit.updated_at, day(36));
        assert_eq!(next.audit.created_by, rancher());
    }

    #[test]
    fn weaned_to_in_heat_is_invalid() {
        let weaned = step(
            &calved(),
            ServiceStatus::Weaned,
            SubrecordPayload::Weaning(WeaningInfo::new(day(487), 243.0, WeaningMethod::Fenceline)),
            487,
        );

        let errors = propose_transition(&weaned, ServiceStatus::InHeat, heat(500), &rancher(), day(500))
            .unwrap_err();
        assert!(errors.contains(&ValidationError::invalid_transition(
            ServiceStatus::Weaned,
            ServiceStatus::InHeat
        )));
    }

    #[test]
    fn repeat_breeding_archives_attempt_and_numbers_next_service() {
        let open = step(
            &serviced(),
            ServiceStatus::RepeatBreeding,
            diagnosis(35, DiagnosisResult::Negative),
            35,
        );
        let reserviced = step(&open, ServiceStatus::Serviced, service(40, 1), 40);

        assert_eq!(reserviced.previous_attempts.len(), 1);
        assert_eq!(reserviced.previous_attempts[0].service_info.service_number, 1);
        assert_eq!(reserviced.previous_attempts[0].archived_at, day(40));
        assert!(reserviced.previous_attempts[0].pregnancy_info.is_some());
        assert_eq!(reserviced.service_info.as_ref().unwrap().service_number, 2);
        assert!(reserviced.pregnancy_info.is_none());
        assert_eq!(reserviced.services_recorded(), 2);
    }

    #[test]
    fn open_to_in_heat_starts_over_and_keeps_counting() {
        let open = step(&serviced(), ServiceStatus::Open, diagnosis(35, DiagnosisResult::Negative), 35);
        let in_heat = step(&open, ServiceStatus::InHeat, heat(50), 50);

        assert!(in_heat.service_info.is_none());
        assert_eq!(in_heat.heat_info.as_ref().unwrap().detected_at, day(50));
        assert_eq!(in_heat.previous_attempts.len(), 1);

        let reserviced = step(&in_heat, ServiceStatus::Serviced, service(50, 1), 50);
        assert_eq!(reserviced.service_info.as_ref().unwrap().service_number, 2);
    }

    #[test]
    fn reservice_before_previous_service_is_rejected() {
        let open = step(
            &serviced(),
            ServiceStatus::RepeatBreeding,
            diagnosis(35, DiagnosisResult::Negative),
            35,
        );
        let errors = propose_transition(&open, ServiceStatus::Serviced, service(-5, 2), &rancher(), day(40))
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::ChronologyViolation { .. }));
    }

    #[test]
    fn abortion_records_loss() {
        let pregnant = step(
            &serviced(),
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            35,
        );
        let aborted = step(
            &pregnant,
            ServiceStatus::Aborted,
            SubrecordPayload::Loss(PregnancyLoss {
                date: day(90),
                cause: "BVD".to_string(),
                estimated_gestation_days: Some(90),
                cost: Decimal::from(40),
            }),
            90,
        );

        assert_eq!(aborted.pregnancy_info.as_ref().unwrap().loss.as_ref().unwrap().cause, "BVD");
        assert_eq!(aborted.derived.as_ref().unwrap().economics.total_costs, Decimal::from(40));
    }

    #[test]
    fn calving_before_service_reports_all_violations() {
        let pregnant = step(
            &serviced(),
            ServiceStatus::ConfirmedPregnant,
            diagnosis(35, DiagnosisResult::Positive),
            35,
        );
        let errors = propose_transition(
            &pregnant,
            ServiceStatus::Calved,
            SubrecordPayload::Calving {
                calving: CalvingInfo::new(day(-5), CalvingDifficulty::Easy),
                calf: Some(CalfInfo::new(CalfSex::Male, CalfViability::AliveNormal).with_birth_weight(95.0)),
            },
            &rancher(),
            day(40),
        )
        .unwrap_err();

        assert!(errors.contains(&ValidationError::chronology(
            "service_info.service_date",
            "calving_info.calving_date"
        )));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ImplausibleGestation { days: -5, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::OutOfRange { field, .. } if field == "calf_info.birth_weight_kg")));
    }

    #[test]
    fn cull_closes_the_cycle() {
        let culled = step(
            &calved(),
            ServiceStatus::Culled,
            SubrecordPayload::Cull(CullInfo::new(day(300), "chronic mastitis")),
            300,
        );

        assert_eq!(culled.status, ServiceStatus::Culled);
        assert!(culled.derived.as_ref().unwrap().reproduction.is_completed);
        let errors = propose_transition(&culled, ServiceStatus::InHeat, heat(310), &rancher(), day(310))
            .unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidTransition { .. }));
    }

    #[test]
    fn overly_precise_cost_is_rejected_before_derivation() {
        let payload = SubrecordPayload::Service {
            service: ServiceInfo::new(day(0), 1, ServiceMethod::NaturalService)
                .with_cost(Decimal::new(1, 20)),
            germplasm: None,
        };

        let errors = propose_transition(&planned(), ServiceStatus::Serviced, payload, &rancher(), day(0))
            .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::out_of_range("service_info.cost.scale", 0.0, 4.0, 20.0)]
        );
    }

    fn weaned() -> BreedingCycle {
        step(
            &calved(),
            ServiceStatus::Weaned,
            SubrecordPayload::Weaning(WeaningInfo::new(day(487), 243.0, WeaningMethod::Fenceline)),
            487,
        )
    }

    fn culled() -> BreedingCycle {
        step(
            &calved(),
            ServiceStatus::Culled,
            SubrecordPayload::Cull(CullInfo::new(day(300), "chronic mastitis")),
            300,
        )
    }

    fn any_payload() -> impl Strategy<Value = SubrecordPayload> {
        prop_oneof![
            (0i64..600).prop_map(heat),
            (0i64..600, 1u32..4, -5i64..500).prop_map(|(at, number, cost)| {
                SubrecordPayload::Service {
                    service: ServiceInfo::new(day(at), number, ServiceMethod::NaturalService)
                        .with_cost(Decimal::from(cost)),
                    germplasm: None,
                }
            }),
            (0i64..600, 0usize..3).prop_map(|(at, result)| {
                let results = [
                    DiagnosisResult::Positive,
                    DiagnosisResult::Negative,
                    DiagnosisResult::Inconclusive,
                ];
                diagnosis(at, results[result])
            }),
            (0i64..600).prop_map(|at| {
                SubrecordPayload::Loss(PregnancyLoss {
                    date: day(at),
                    cause: "abortion".to_string(),
                    estimated_gestation_days: None,
                    cost: Decimal::ZERO,
                })
            }),
            (0i64..600, 10.0f64..90.0, any::<bool>()).prop_map(|(at, kg, alive)| {
                let viability = if alive {
                    CalfViability::AliveNormal
                } else {
                    CalfViability::Stillborn
                };
                SubrecordPayload::Calving {
                    calving: CalvingInfo::new(day(at), CalvingDifficulty::Easy),
                    calf: Some(CalfInfo::new(CalfSex::Female, viability).with_birth_weight(kg)),
                }
            }),
            (0i64..700, -10.0f64..700.0).prop_map(|(at, kg)| {
                SubrecordPayload::Weaning(WeaningInfo::new(day(at), kg, WeaningMethod::Fenceline))
            }),
            (0i64..700, any::<bool>()).prop_map(|(at, blank)| {
                let reason = if blank { " " } else { "lameness" };
                SubrecordPayload::Cull(CullInfo::new(day(at), reason))
            }),
            Just(SubrecordPayload::None),
        ]
    }

    proptest! {
        #[test]
        fn accepted_transitions_always_yield_valid_records(
            steps in prop::collection::vec((0usize..10, any_payload(), 0i64..700), 1..30),
        ) {
            let mut record = planned();
            for (target, payload, at) in steps {
                let target = ServiceStatus::ALL[target];
                let was_terminal = record.status.is_terminal();

                match propose_transition(&record, target, payload, &rancher(), day(at)) {
                    Ok(next) => {
                        prop_assert!(!was_terminal);
                        prop_assert_eq!(next.status, target);
                        prop_assert!(validate_record(&next).is_empty());
                        prop_assert!(next.derived.is_some());
                        record = next;
                    }
                    Err(errors) => {
                        prop_assert!(!errors.is_empty());
                        if was_terminal {
                            prop_assert!(errors.contains(&ValidationError::invalid_transition(
                                record.status,
                                target
                            )));
                        }
                    }
                }
            }
        }

        #[test]
        fn terminal_records_reject_every_transition(
            use_cull in any::<bool>(),
            target in 0usize..10,
            payload in any_payload(),
            at in 0i64..900,
        ) {
            let terminal = if use_cull { culled() } else { weaned() };
            let target = ServiceStatus::ALL[target];

            let result = propose_transition(&terminal, target, payload, &rancher(), day(at));

            match result {
                Ok(next) => prop_assert!(false, "{} -> {} was accepted", terminal.status, next.status),
                Err(errors) => prop_assert!(errors.contains(&ValidationError::invalid_transition(
                    terminal.status,
                    target
                ))),
            }
        }
    }
}
