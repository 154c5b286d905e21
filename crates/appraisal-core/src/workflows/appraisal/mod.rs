//! Collateral appraisal report engine.
//!
//! Three pure engines (valuation calculator, comparable-analysis aggregator,
//! quality/compliance rule battery) run over an immutable survey snapshot;
//! the report service is the only stateful actor and merges their outputs
//! into the persisted aggregate.

pub mod comparables;
pub mod domain;
pub mod quality;
pub mod repository;
pub mod router;
pub mod service;
pub mod valuation;

#[cfg(test)]
mod tests;

pub use comparables::{
    analyze, AnalyzedComparable, ComparableAnalysis, ComparableAnalysisSummary,
    ComparableCsvImporter, ComparableImportError,
};
pub use domain::{
    AssetSubject, BuildingStandard, CheckCategory, CheckSeverity, CheckStatus, CollateralDetail,
    CollateralLocation, ComparableAdjustment, DebtorIdentity, DepreciationRule,
    EnvironmentChecklist, LegalDocument, LegalDocumentKind, MarketComparable, ReportId,
    ReportSnapshot, ReportStatus, StandardCatalog, ValuationInput,
};
pub use quality::{
    critical_failures, is_eligible_for_review, LegalAlert, QualityCheck, QualityConfig,
    QualityEngine, QualityEvaluation, QualitySummary,
};
pub use repository::{
    MetadataError, MetadataProvider, ReportRecord, ReportRepository, ReportStatusView,
    RepositoryError,
};
pub use router::report_router;
pub use service::{AppraisalReportService, CheckFailure, ReportServiceError};
pub use valuation::{
    ResolvedBuildingRate, StandardFallback, ValuationAggregate, ValuationBreakdown,
    ValuationComponent, ValuationEngine, ValuationResult,
};
