use super::common::*;
use crate::workflows::appraisal::domain::{AssetSubject, CheckSeverity, CheckStatus};
use crate::workflows::appraisal::quality::{critical_failures, is_eligible_for_review};

#[test]
fn evaluation_is_deterministic_for_the_same_snapshot_and_date() {
    let snapshot = snapshot();
    let valuation = appraise(&snapshot);
    let engine = quality_engine();

    let first = engine.evaluate(&snapshot, &valuation, eval_date());
    let second = engine.evaluate(&snapshot, &valuation, eval_date());

    let first_ids: Vec<&str> = first.checks.iter().map(|check| check.id.as_str()).collect();
    let second_ids: Vec<&str> = second.checks.iter().map(|check| check.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first, second);
}

#[test]
fn check_order_is_stable() {
    let snapshot = snapshot();
    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    let ids: Vec<&str> = evaluation
        .checks
        .iter()
        .map(|check| check.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "completeness_debtor_identity",
            "completeness_collateral_location",
            "completeness_technical_data",
            "legal_certificate_present",
            "legal_certificate_not_expired",
            "legal_documents_verified",
            "consistency_land_area",
            "risk_flood_prone",
            "risk_high_voltage",
            "risk_road_access",
            "plausibility_standard_fallback",
            "plausibility_safety_margin",
            "plausibility_land_rate",
            "plausibility_comparable_weights",
        ]
    );
}

#[test]
fn a_complete_snapshot_passes_every_check() {
    let snapshot = snapshot();
    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    assert_eq!(evaluation.summary.total, evaluation.checks.len());
    assert_eq!(evaluation.summary.passed, evaluation.summary.total);
    assert_eq!(evaluation.summary.warnings, 0);
    assert!(is_eligible_for_review(&evaluation.checks));
    assert!(evaluation.legal_alerts.is_empty());
}

#[test]
fn missing_identity_raises_a_critical_failure() {
    let snapshot = incomplete_snapshot();
    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    assert!(!is_eligible_for_review(&evaluation.checks));
    let failing: Vec<&str> = critical_failures(&evaluation.checks)
        .into_iter()
        .map(|check| check.id.as_str())
        .collect();
    assert!(failing.contains(&"completeness_debtor_identity"));
    assert!(failing.contains(&"legal_certificate_present"));
}

#[test]
fn environment_flags_surface_as_warnings_without_blocking() {
    let mut snapshot = snapshot();
    snapshot.environment.flood_prone = true;
    snapshot.environment.high_voltage_proximity = true;
    snapshot.environment.limited_road_access = true;

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    assert_eq!(evaluation.summary.warnings, 3);
    assert!(is_eligible_for_review(&evaluation.checks));

    let flood = evaluation
        .checks
        .iter()
        .find(|check| check.id == "risk_flood_prone")
        .expect("check present");
    assert_eq!(flood.status, CheckStatus::Fail);
    assert_eq!(flood.severity, CheckSeverity::Warning);
}

#[test]
fn collateral_detail_drift_fails_the_consistency_check() {
    let mut snapshot = snapshot();
    snapshot.collaterals[0].land_area = 90.0;

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    let consistency = evaluation
        .checks
        .iter()
        .find(|check| check.id == "consistency_land_area")
        .expect("check present");
    assert_eq!(consistency.status, CheckStatus::Fail);
    assert!(!is_eligible_for_review(&evaluation.checks));
}

#[test]
fn silent_standard_fallback_is_flagged_as_implausible() {
    let mut snapshot = snapshot();
    if let AssetSubject::Property {
        building_standard_code,
        ..
    } = &mut snapshot.valuation_input.subject
    {
        *building_standard_code = Some("STD-X".to_string());
    }

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    let fallback = evaluation
        .checks
        .iter()
        .find(|check| check.id == "plausibility_standard_fallback")
        .expect("check present");
    assert_eq!(fallback.status, CheckStatus::Fail);
    assert_eq!(fallback.severity, CheckSeverity::Warning);
    assert!(fallback
        .message
        .as_deref()
        .is_some_and(|message| message.contains("STD-X")));
}

#[test]
fn excessive_safety_margin_is_flagged() {
    let mut snapshot = snapshot();
    snapshot.valuation_input.safety_margin_percent = 80.0;

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    let margin = evaluation
        .checks
        .iter()
        .find(|check| check.id == "plausibility_safety_margin")
        .expect("check present");
    assert_eq!(margin.status, CheckStatus::Fail);
    assert!(is_eligible_for_review(&evaluation.checks));
}

#[test]
fn comparable_weight_drift_is_flagged_but_absent_weights_are_not() {
    let mut snapshot = snapshot();
    snapshot.comparables[1].weight = Some(30.0);

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());
    let weights = evaluation
        .checks
        .iter()
        .find(|check| check.id == "plausibility_comparable_weights")
        .expect("check present");
    assert_eq!(weights.status, CheckStatus::Fail);

    let mut snapshot = super::common::snapshot();
    for comparable in &mut snapshot.comparables {
        comparable.weight = None;
    }
    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());
    let weights = evaluation
        .checks
        .iter()
        .find(|check| check.id == "plausibility_comparable_weights")
        .expect("check present");
    assert_eq!(weights.status, CheckStatus::Pass);
}

#[test]
fn vehicle_snapshots_skip_the_property_only_checks() {
    let mut snapshot = snapshot();
    snapshot.valuation_input.subject = AssetSubject::Vehicle {
        market_price: 150_000_000.0,
    };
    snapshot.collaterals.clear();

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    for id in ["consistency_land_area", "plausibility_land_rate"] {
        let check = evaluation
            .checks
            .iter()
            .find(|check| check.id == id)
            .expect("check present");
        assert_eq!(check.status, CheckStatus::Pass, "{id} should pass");
    }
}

#[test]
fn summary_counts_match_the_severity_policy() {
    let mut snapshot = incomplete_snapshot();
    snapshot.environment.flood_prone = true;

    let valuation = appraise(&snapshot);
    let evaluation = quality_engine().evaluate(&snapshot, &valuation, eval_date());

    let failed = evaluation
        .checks
        .iter()
        .filter(|check| check.status == CheckStatus::Fail)
        .count();
    assert_eq!(
        evaluation.summary.passed,
        evaluation.summary.total - failed
    );
    assert_eq!(evaluation.summary.warnings, 1);
    assert!(critical_failures(&evaluation.checks).len() >= 2);
}
