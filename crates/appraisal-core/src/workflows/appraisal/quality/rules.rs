use chrono::NaiveDate;

use super::super::domain::{
    AssetSubject, CheckCategory, CheckSeverity, CheckStatus, LegalDocumentKind, ReportSnapshot,
};
use super::super::valuation::ValuationResult;
use super::QualityConfig;

pub(crate) struct CheckContext<'a> {
    pub(crate) snapshot: &'a ReportSnapshot,
    pub(crate) valuation: &'a ValuationResult,
    pub(crate) config: &'a QualityConfig,
    pub(crate) today: NaiveDate,
}

pub(crate) struct CheckOutcome {
    pub(crate) status: CheckStatus,
    pub(crate) message: Option<String>,
}

impl CheckOutcome {
    fn pass() -> Self {
        Self {
            status: CheckStatus::Pass,
            message: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: Some(message.into()),
        }
    }
}

pub(crate) struct CheckRule {
    pub(crate) id: &'static str,
    pub(crate) category: CheckCategory,
    pub(crate) severity: CheckSeverity,
    pub(crate) run: fn(&CheckContext) -> CheckOutcome,
}

/// The fixed battery, in the order checks are reported. Predicates read only
/// the snapshot, the computed valuation, and the passed evaluation date.
pub(crate) const CHECKS: &[CheckRule] = &[
    CheckRule {
        id: "completeness_debtor_identity",
        category: CheckCategory::Completeness,
        severity: CheckSeverity::Critical,
        run: debtor_identity,
    },
    CheckRule {
        id: "completeness_collateral_location",
        category: CheckCategory::Completeness,
        severity: CheckSeverity::Critical,
        run: collateral_location,
    },
    CheckRule {
        id: "completeness_technical_data",
        category: CheckCategory::Completeness,
        severity: CheckSeverity::Critical,
        run: technical_data,
    },
    CheckRule {
        id: "legal_certificate_present",
        category: CheckCategory::Legal,
        severity: CheckSeverity::Critical,
        run: certificate_present,
    },
    CheckRule {
        id: "legal_certificate_not_expired",
        category: CheckCategory::Legal,
        severity: CheckSeverity::Critical,
        run: certificate_not_expired,
    },
    CheckRule {
        id: "legal_documents_verified",
        category: CheckCategory::Legal,
        severity: CheckSeverity::Warning,
        run: documents_verified,
    },
    CheckRule {
        id: "consistency_land_area",
        category: CheckCategory::Consistency,
        severity: CheckSeverity::Critical,
        run: land_area_consistency,
    },
    CheckRule {
        id: "risk_flood_prone",
        category: CheckCategory::Risk,
        severity: CheckSeverity::Warning,
        run: flood_prone,
    },
    CheckRule {
        id: "risk_high_voltage",
        category: CheckCategory::Risk,
        severity: CheckSeverity::Warning,
        run: high_voltage,
    },
    CheckRule {
        id: "risk_road_access",
        category: CheckCategory::Risk,
        severity: CheckSeverity::Warning,
        run: road_access,
    },
    CheckRule {
        id: "plausibility_standard_fallback",
        category: CheckCategory::Plausibility,
        severity: CheckSeverity::Warning,
        run: standard_fallback,
    },
    CheckRule {
        id: "plausibility_safety_margin",
        category: CheckCategory::Plausibility,
        severity: CheckSeverity::Warning,
        run: safety_margin_range,
    },
    CheckRule {
        id: "plausibility_land_rate",
        category: CheckCategory::Plausibility,
        severity: CheckSeverity::Warning,
        run: land_rate_range,
    },
    CheckRule {
        id: "plausibility_comparable_weights",
        category: CheckCategory::Plausibility,
        severity: CheckSeverity::Warning,
        run: comparable_weights,
    },
];

fn debtor_identity(context: &CheckContext) -> CheckOutcome {
    if context.snapshot.debtor.name.trim().is_empty() {
        CheckOutcome::fail("debtor name has not been captured")
    } else {
        CheckOutcome::pass()
    }
}

fn collateral_location(context: &CheckContext) -> CheckOutcome {
    if context.snapshot.location.address.trim().is_empty() {
        CheckOutcome::fail("collateral address has not been captured")
    } else {
        CheckOutcome::pass()
    }
}

fn technical_data(context: &CheckContext) -> CheckOutcome {
    match &context.snapshot.valuation_input.subject {
        AssetSubject::Property {
            land_area,
            building_area,
            land_rate,
            building_standard_code,
            ..
        } => {
            let mut missing = Vec::new();
            if *land_area <= 0.0 {
                missing.push("land area");
            }
            if *land_rate <= 0.0 {
                missing.push("land rate");
            }
            if *building_area > 0.0 && building_standard_code.is_none() {
                missing.push("building standard");
            }

            if missing.is_empty() {
                CheckOutcome::pass()
            } else {
                CheckOutcome::fail(format!("missing technical data: {}", missing.join(", ")))
            }
        }
        AssetSubject::Vehicle { market_price } | AssetSubject::Machine { market_price } => {
            if *market_price > 0.0 {
                CheckOutcome::pass()
            } else {
                CheckOutcome::fail("market price has not been captured")
            }
        }
    }
}

fn certificate_present(context: &CheckContext) -> CheckOutcome {
    let present = context
        .snapshot
        .legal_documents
        .iter()
        .any(|document| document.kind == LegalDocumentKind::OwnershipCertificate);

    if present {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail("no ownership certificate attached to the report")
    }
}

fn certificate_not_expired(context: &CheckContext) -> CheckOutcome {
    let expired: Vec<&str> = context
        .snapshot
        .legal_documents
        .iter()
        .filter(|document| document.kind == LegalDocumentKind::OwnershipCertificate)
        .filter(|document| document.due_date.is_some_and(|due| due <= context.today))
        .map(|document| document.number.as_deref().unwrap_or(document.id.as_str()))
        .collect();

    if expired.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(format!(
            "ownership certificate expired: {}",
            expired.join(", ")
        ))
    }
}

fn documents_verified(context: &CheckContext) -> CheckOutcome {
    let unverified = context
        .snapshot
        .legal_documents
        .iter()
        .filter(|document| !document.verified)
        .count();

    if unverified == 0 {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(format!(
            "{unverified} legal document(s) awaiting verification"
        ))
    }
}

fn land_area_consistency(context: &CheckContext) -> CheckOutcome {
    let AssetSubject::Property { land_area, .. } = &context.snapshot.valuation_input.subject else {
        return CheckOutcome::pass();
    };

    if context.snapshot.collaterals.is_empty() {
        return CheckOutcome::pass();
    }

    let detailed: f64 = context
        .snapshot
        .collaterals
        .iter()
        .map(|collateral| collateral.land_area)
        .sum();

    if (detailed - land_area).abs() <= context.config.land_area_tolerance {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(format!(
            "collateral details sum to {detailed} m2 but the valuation input declares {land_area} m2"
        ))
    }
}

fn flood_prone(context: &CheckContext) -> CheckOutcome {
    if context.snapshot.environment.flood_prone {
        CheckOutcome::fail("collateral sits in a flood-prone area")
    } else {
        CheckOutcome::pass()
    }
}

fn high_voltage(context: &CheckContext) -> CheckOutcome {
    if context.snapshot.environment.high_voltage_proximity {
        CheckOutcome::fail("collateral is close to high-voltage transmission lines")
    } else {
        CheckOutcome::pass()
    }
}

fn road_access(context: &CheckContext) -> CheckOutcome {
    if context.snapshot.environment.limited_road_access {
        CheckOutcome::fail("road access to the collateral is limited")
    } else {
        CheckOutcome::pass()
    }
}

fn standard_fallback(context: &CheckContext) -> CheckOutcome {
    match &context.valuation.standard_fallback {
        Some(fallback) => CheckOutcome::fail(format!(
            "building standard {} was not found; {} was applied instead",
            fallback.requested_code, fallback.applied_code
        )),
        None => CheckOutcome::pass(),
    }
}

fn safety_margin_range(context: &CheckContext) -> CheckOutcome {
    let margin = context.snapshot.valuation_input.safety_margin_percent;

    if margin < 0.0 || margin > context.config.max_safety_margin_percent {
        CheckOutcome::fail(format!(
            "safety margin {margin}% is outside the expected 0..{}% range",
            context.config.max_safety_margin_percent
        ))
    } else {
        CheckOutcome::pass()
    }
}

fn land_rate_range(context: &CheckContext) -> CheckOutcome {
    let AssetSubject::Property { land_rate, .. } = &context.snapshot.valuation_input.subject else {
        return CheckOutcome::pass();
    };

    // A zero rate is a completeness problem, not a plausibility one.
    if *land_rate <= 0.0 {
        return CheckOutcome::pass();
    }

    if *land_rate < context.config.min_land_rate || *land_rate > context.config.max_land_rate {
        CheckOutcome::fail(format!(
            "land rate {land_rate} is outside the configured {}..{} range",
            context.config.min_land_rate, context.config.max_land_rate
        ))
    } else {
        CheckOutcome::pass()
    }
}

fn comparable_weights(context: &CheckContext) -> CheckOutcome {
    let total: f64 = context
        .snapshot
        .comparables
        .iter()
        .filter_map(|comparable| comparable.weight)
        .filter(|weight| weight.is_finite() && *weight >= 0.0)
        .sum();

    if total == 0.0 {
        return CheckOutcome::pass();
    }

    let target = context.config.comparable_weight_target;
    if (total - target).abs() <= context.config.comparable_weight_tolerance {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(format!(
            "comparable weights sum to {total}, expected about {target}"
        ))
    }
}
