//! End-to-end recommendation scenarios over a small protocol table.
//!
//! Run with: cargo test --package painrx-engine --test test_recommendation_e2e

use chrono::NaiveDate;
use painrx_common::{
    EngineConfig, HepaticClass, LabPanel, PainHistory, PatientSnapshot, ProtocolRow, RenalClass,
    RenalValue,
};
use painrx_engine::rules::{AgeRule, RenalRule};
use painrx_engine::{
    Assessment, FailureKind, RecommendationAssembler, RecommendationStatus, RulePipeline, SlotRole,
};
use painrx_protocol::InMemoryProtocolSource;
use pretty_assertions::assert_eq;

fn assessed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn patient(birth_year: i32) -> PatientSnapshot {
    PatientSnapshot {
        patient_id: "p-100".to_string(),
        birth_date: NaiveDate::from_ymd_opt(birth_year, 1, 15).unwrap(),
        weight_kg: Some(72.0),
        labs: LabPanel {
            renal: Some(RenalValue::Numeric(95.0)),
            platelets: Some(250.0),
            white_cells: Some(7.0),
            sodium: Some(140.0),
            oxygen_saturation: Some(98.0),
            hepatic: Some(HepaticClass::A),
            hepatic_points: None,
        },
        allergies: Default::default(),
        diagnoses: Default::default(),
    }
}

fn moderate_row() -> ProtocolRow {
    ProtocolRow {
        pain_range: "4-6".to_string(),
        hierarchy: 1,
        primary_drug: "Nurofen".to_string(),
        primary_ingredient: "ibuprofen".to_string(),
        primary_dose_mg: Some(400.0),
        primary_interval_h: Some(8.0),
        alternative_drug: "Panadol".to_string(),
        alternative_ingredient: "paracetamol".to_string(),
        alternative_dose_mg: Some(1000.0),
        alternative_interval_h: Some(6.0),
        route: "oral".to_string(),
        age_rule: ">75 years - avoid".to_string(),
        weight_rule: "<50 kg - 300 mg".to_string(),
        renal_rule: "<60 mL/min - reduce by 25%  <30 mL/min - avoid".to_string(),
        hepatic_rule: "Class B - 12h  Class C - avoid".to_string(),
        platelet_rule: "<100K/\u{03BC}L - avoid".to_string(),
        white_cell_rule: "NA".to_string(),
        sodium_rule: "<130 mmol/L - avoid".to_string(),
        saturation_rule: "NA".to_string(),
        contraindications: "Peptic ulcer K25, GI bleeding K92.2".to_string(),
        allergy_avoidance: "Ibuprofen OR NSAID".to_string(),
    }
}

fn fallback_row() -> ProtocolRow {
    ProtocolRow {
        pain_range: "4 to 6".to_string(),
        hierarchy: 2,
        primary_drug: "Tramal".to_string(),
        primary_ingredient: "tramadol".to_string(),
        primary_dose_mg: Some(50.0),
        primary_interval_h: Some(6.0),
        route: "oral".to_string(),
        renal_rule: "Class D - 12h  Class E - 12h".to_string(),
        ..Default::default()
    }
}

fn assembler() -> RecommendationAssembler {
    RecommendationAssembler::new(EngineConfig::default())
}

fn assess<'a>(patient: &'a PatientSnapshot, history: &'a PainHistory, score: i32) -> Assessment<'a> {
    Assessment { patient, history, pain_score: score, assessed_on: assessed_on() }
}

#[test]
fn test_healthy_patient_gets_first_row_unchanged() {
    let p = patient(1970);
    let h = PainHistory::new(vec![5, 5]);
    let rec = assembler()
        .assemble(&[moderate_row(), fallback_row()], &assess(&p, &h, 5))
        .unwrap();

    assert_eq!(rec.status, RecommendationStatus::Pending);
    assert_eq!(rec.hierarchy, Some(1));
    let primary = rec.slot(SlotRole::Primary).unwrap();
    assert_eq!(primary.drug_name, "Nurofen");
    assert_eq!(primary.dose_mg, Some(400.0));
    assert_eq!(primary.interval_h, Some(8.0));

    // the alternative is reserved for patients from 75 onwards
    assert!(!rec.is_slot_active(SlotRole::Alternative));
    assert_eq!(rec.rejection_reasons.len(), 1);
}

#[test]
fn test_elderly_patient_keeps_alternative() {
    let p = patient(1944); // 80 on the assessment date
    let h = PainHistory::default();
    let rec = assembler().assemble(&[moderate_row()], &assess(&p, &h, 5)).unwrap();

    assert_eq!(rec.status, RecommendationStatus::Pending);
    assert!(!rec.is_slot_active(SlotRole::Primary));
    assert!(rec.is_slot_active(SlotRole::Alternative));
    assert!(rec.comments.iter().any(|c| c.contains("age 80 above 75")));
}

#[test]
fn test_low_platelets_fall_through_to_next_row() {
    let mut p = patient(1970);
    p.labs.platelets = Some(45.0);
    let h = PainHistory::default();
    let rec = assembler()
        .assemble(&[moderate_row(), fallback_row()], &assess(&p, &h, 5))
        .unwrap();

    assert_eq!(rec.status, RecommendationStatus::Pending);
    assert_eq!(rec.slot(SlotRole::Primary).unwrap().drug_name, "Tramal");
}

#[test]
fn test_low_platelets_name_both_drugs() {
    let mut p = patient(1970);
    p.labs.platelets = Some(45.0);
    let h = PainHistory::default();
    let rec = assembler().assemble(&[moderate_row()], &assess(&p, &h, 5)).unwrap();

    assert_eq!(rec.failure, Some(FailureKind::NoViableCandidate));
    assert!(rec.primary.is_none());
    let reason = rec
        .rejection_reasons
        .iter()
        .find(|r| r.contains("platelets"))
        .unwrap();
    assert!(reason.contains("Nurofen and Panadol avoided"));
    assert!(reason.contains("<100"));
}

#[test]
fn test_pain_trend_aborts_everything() {
    let p = patient(1970);
    let h = PainHistory::new(vec![4, 7]);
    let rec = assembler()
        .assemble(&[moderate_row(), fallback_row()], &assess(&p, &h, 5))
        .unwrap();

    assert_eq!(rec.failure, Some(FailureKind::PainTrendAborted));
    assert!(rec.primary.is_none() && rec.alternative.is_none());
    assert_eq!(rec.rejection_reasons.len(), 1);
}

#[test]
fn test_all_rows_rejected() {
    let mut p = patient(1970);
    p.allergies.insert("nsaid".to_string());
    p.labs.renal = Some(RenalValue::Numeric(10.0));
    let h = PainHistory::default();

    let mut fallback = fallback_row();
    fallback.renal_rule = "<15 mL/min - avoid".to_string();

    let rec = assembler().assemble(&[moderate_row(), fallback], &assess(&p, &h, 5)).unwrap();
    assert_eq!(rec.failure, Some(FailureKind::NoViableCandidate));
    assert!(rec.rejection_reasons.len() >= 2);
    assert!(rec.rejection_reasons.iter().any(|r| r.contains("nsaid")));
    assert!(rec.rejection_reasons.iter().any(|r| r.contains("Tramal")));
}

#[test]
fn test_renal_and_weight_corrections_merge() {
    let mut p = patient(1970);
    p.weight_kg = Some(45.0);
    p.labs.renal = Some(RenalValue::Numeric(59.0));
    let h = PainHistory::default();
    let rec = assembler().assemble(&[moderate_row()], &assess(&p, &h, 5)).unwrap();

    // weight says 300 mg, renal says 25% off the current dose (300 → 225)
    let primary = rec.slot(SlotRole::Primary).unwrap();
    assert_eq!(primary.dose_mg, Some(225.0));
    assert!(primary.annotations.iter().any(|a| a.contains("lowest of")));
}

#[test]
fn test_class_renal_value_and_hepatic_interval() {
    let mut p = patient(1970);
    p.labs.hepatic = Some(HepaticClass::B);
    p.labs.renal = Some(RenalValue::Class(RenalClass::D));
    let h = PainHistory::default();

    // class D sits around 37 mL/min: inside "<60" but not "<30"
    let rec = assembler()
        .assemble(&[moderate_row(), fallback_row()], &assess(&p, &h, 5))
        .unwrap();
    let primary = rec.slot(SlotRole::Primary).unwrap();
    assert_eq!(primary.drug_name, "Nurofen");
    assert_eq!(primary.interval_h, Some(12.0));
    assert_eq!(primary.dose_mg, Some(300.0));
}

#[test]
fn test_missing_lab_value_is_an_error() {
    let mut p = patient(1970);
    p.labs.sodium = None;
    let h = PainHistory::default();
    assert!(assembler().assemble(&[moderate_row()], &assess(&p, &h, 5)).is_err());
}

#[test]
fn test_assemble_from_source() {
    let source = InMemoryProtocolSource::new().with(moderate_row()).with(fallback_row());
    let p = patient(1970);
    let h = PainHistory::default();
    let rec = assembler().assemble_from(&source, &assess(&p, &h, 9)).unwrap();
    assert_eq!(rec.failure, Some(FailureKind::NoProtocolForScore));
}

#[test]
fn test_cleared_slots_stay_cleared_through_finalize() {
    let mut p = patient(1944);
    p.weight_kg = Some(45.0);
    let h = PainHistory::default();
    let rec = assembler().assemble(&[moderate_row()], &assess(&p, &h, 5)).unwrap();

    let primary = rec.slot(SlotRole::Primary).unwrap();
    assert!(primary.is_cleared());
    assert_eq!(primary.dose_mg, Some(400.0));
}

#[test]
fn test_custom_pipeline_runs_only_its_appliers() {
    let p = patient(1944);
    let h = PainHistory::new(vec![4, 7]);
    let pipeline = RulePipeline::with_appliers(vec![Box::new(AgeRule), Box::new(RenalRule)]);
    let assembler = RecommendationAssembler::with_pipeline(EngineConfig::default(), pipeline);

    // no pain-trend step, so the jump from 4 to 7 does not abort
    let rec = assembler.assemble(&[moderate_row()], &assess(&p, &h, 5)).unwrap();
    assert_eq!(rec.status, RecommendationStatus::Pending);
    assert!(!rec.is_slot_active(SlotRole::Primary));
}
