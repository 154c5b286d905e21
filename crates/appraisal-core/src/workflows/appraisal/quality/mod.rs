mod legal;
mod rules;

pub use legal::LegalAlert;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CheckCategory, CheckSeverity, CheckStatus, ReportSnapshot};
use super::valuation::ValuationResult;
use rules::CheckContext;

/// Thresholds backing the consistency and plausibility checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    pub max_safety_margin_percent: f64,
    pub min_land_rate: f64,
    pub max_land_rate: f64,
    /// Allowed drift, in square meters, between the per-collateral land
    /// areas and the valuation input.
    pub land_area_tolerance: f64,
    pub comparable_weight_target: f64,
    pub comparable_weight_tolerance: f64,
}

/// Single evaluated rule from the ordered battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub id: String,
    pub category: CheckCategory,
    pub severity: CheckSeverity,
    pub status: CheckStatus,
    pub message: Option<String>,
}

/// Derived counts over the current check list. The critical-failure count is
/// obtained by filtering, never stored separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub total: usize,
    pub passed: usize,
    pub warnings: usize,
}

impl QualitySummary {
    pub fn over(checks: &[QualityCheck]) -> Self {
        Self {
            total: checks.len(),
            passed: checks
                .iter()
                .filter(|check| check.status == CheckStatus::Pass)
                .count(),
            warnings: checks
                .iter()
                .filter(|check| {
                    check.status == CheckStatus::Fail && check.severity == CheckSeverity::Warning
                })
                .count(),
        }
    }
}

/// Full output of one evaluation pass over a report snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvaluation {
    pub checks: Vec<QualityCheck>,
    pub summary: QualitySummary,
    pub legal_alerts: Vec<LegalAlert>,
}

/// Stateless evaluator running the fixed check battery and the legal
/// document pass over a report snapshot.
///
/// Deterministic by construction: the same snapshot and evaluation date
/// always produce the identical ordered check list and summary. No predicate
/// consults a clock other than the passed date.
pub struct QualityEngine {
    config: QualityConfig,
}

impl QualityEngine {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        snapshot: &ReportSnapshot,
        valuation: &ValuationResult,
        today: NaiveDate,
    ) -> QualityEvaluation {
        let context = CheckContext {
            snapshot,
            valuation,
            config: &self.config,
            today,
        };

        let checks: Vec<QualityCheck> = rules::CHECKS
            .iter()
            .map(|rule| {
                let outcome = (rule.run)(&context);
                QualityCheck {
                    id: rule.id.to_string(),
                    category: rule.category,
                    severity: rule.severity,
                    status: outcome.status,
                    message: outcome.message,
                }
            })
            .collect();

        let summary = QualitySummary::over(&checks);
        let legal_alerts = legal::evaluate_documents(&snapshot.legal_documents, today);

        QualityEvaluation {
            checks,
            summary,
            legal_alerts,
        }
    }
}

/// Hard gate consulted before the draft -> for_review transition. Warnings
/// never make a report ineligible.
pub fn is_eligible_for_review(checks: &[QualityCheck]) -> bool {
    !checks.iter().any(|check| {
        check.severity == CheckSeverity::Critical && check.status == CheckStatus::Fail
    })
}

/// The checks blocking the gate, for the rejection payload.
pub fn critical_failures(checks: &[QualityCheck]) -> Vec<&QualityCheck> {
    checks
        .iter()
        .filter(|check| {
            check.severity == CheckSeverity::Critical && check.status == CheckStatus::Fail
        })
        .collect()
}
