use serde::{Deserialize, Serialize};

use super::comparables::ComparableAnalysis;
use super::domain::{ReportId, ReportSnapshot, ReportStatus, StandardCatalog};
use super::quality::{is_eligible_for_review, QualityEvaluation};
use super::valuation::ValuationResult;

/// Persisted aggregate joining the survey snapshot with the derived engine
/// outputs. The derived fields are replaced wholesale on every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub snapshot: ReportSnapshot,
    pub status: ReportStatus,
    pub valuation: Option<ValuationResult>,
    pub comparables: Option<ComparableAnalysis>,
    pub quality: Option<QualityEvaluation>,
}

impl ReportRecord {
    pub fn status_view(&self) -> ReportStatusView {
        let aggregate = self.valuation.as_ref().map(|valuation| valuation.aggregate);
        let checks = self
            .quality
            .as_ref()
            .map(|quality| quality.checks.as_slice())
            .unwrap_or(&[]);

        ReportStatusView {
            report_id: self.id.clone(),
            status: self.status.label(),
            market_value: aggregate.map(|aggregate| aggregate.market_value),
            collateral_value_after_safety: aggregate
                .map(|aggregate| aggregate.collateral_value_after_safety),
            liquidation_value: aggregate.map(|aggregate| aggregate.liquidation_value),
            checks_total: checks.len(),
            warnings: self
                .quality
                .as_ref()
                .map(|quality| quality.summary.warnings)
                .unwrap_or(0),
            legal_alerts: self
                .quality
                .as_ref()
                .map(|quality| quality.legal_alerts.len())
                .unwrap_or(0),
            eligible_for_review: is_eligible_for_review(checks),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Implementations must honor the single-writer-per-identifier discipline at
/// the persistence boundary.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError>;
    fn update(&self, record: ReportRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError>;
    fn by_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Reference-data source. The full catalog is handed to every computation
/// call; the engines neither cache nor invalidate it.
pub trait MetadataProvider: Send + Sync {
    fn catalog(&self) -> Result<StandardCatalog, MetadataError>;
}

/// Metadata lookup error.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata source unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized headline view of a stored report for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatusView {
    pub report_id: ReportId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_value_after_safety: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidation_value: Option<i64>,
    pub checks_total: usize,
    pub warnings: usize,
    pub legal_alerts: usize,
    pub eligible_for_review: bool,
}
