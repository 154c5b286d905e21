use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::comparables;
use super::domain::{ReportId, ReportSnapshot, ReportStatus};
use super::quality::{self, QualityConfig, QualityEngine};
use super::repository::{
    MetadataError, MetadataProvider, ReportRecord, ReportRepository, RepositoryError,
};
use super::valuation::ValuationEngine;

/// Service composing the three engines over the persisted report aggregate.
///
/// Writes to one report are serialized through a per-identifier lock held
/// across the fetch, recompute, and update steps, so concurrent edits can
/// never interleave their recomputations. Reads are unrestricted.
pub struct AppraisalReportService<R, M> {
    repository: Arc<R>,
    metadata: Arc<M>,
    quality: QualityEngine,
    write_locks: Mutex<HashMap<ReportId, Arc<Mutex<()>>>>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<R, M> AppraisalReportService<R, M>
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    pub fn new(repository: Arc<R>, metadata: Arc<M>, config: QualityConfig) -> Self {
        Self {
            repository,
            metadata,
            quality: QualityEngine::new(config),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Open a new draft report: the engines run immediately so a freshly
    /// created report already carries its derived figures and checks.
    pub fn create(
        &self,
        snapshot: ReportSnapshot,
        today: Option<NaiveDate>,
    ) -> Result<ReportRecord, ReportServiceError> {
        let mut record = ReportRecord {
            id: next_report_id(),
            snapshot,
            status: ReportStatus::Draft,
            valuation: None,
            comparables: None,
            quality: None,
        };
        self.recompute(&mut record, today)?;

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    pub fn get(&self, id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Replace the survey snapshot and rerun the engines. Only draft and
    /// rejected reports are editable.
    pub fn update_snapshot(
        &self,
        id: &ReportId,
        snapshot: ReportSnapshot,
        today: Option<NaiveDate>,
    ) -> Result<ReportRecord, ReportServiceError> {
        let lock = self.write_lock(id);
        let _guard = lock.lock().expect("report write lock poisoned");

        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if !record.status.allows_edits() {
            return Err(ReportServiceError::EditLocked {
                status: record.status,
            });
        }

        record.snapshot = snapshot;
        self.recompute(&mut record, today)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Rerun the engines over the stored snapshot without changing it.
    pub fn recalculate(
        &self,
        id: &ReportId,
        today: Option<NaiveDate>,
    ) -> Result<ReportRecord, ReportServiceError> {
        let lock = self.write_lock(id);
        let _guard = lock.lock().expect("report write lock poisoned");

        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if !record.status.allows_edits() {
            return Err(ReportServiceError::EditLocked {
                status: record.status,
            });
        }

        self.recompute(&mut record, today)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Gate the draft -> for_review transition on the critical checks. The
    /// checks are re-evaluated first so the gate never trusts stale results.
    pub fn submit_for_review(
        &self,
        id: &ReportId,
        today: Option<NaiveDate>,
    ) -> Result<ReportRecord, ReportServiceError> {
        let lock = self.write_lock(id);
        let _guard = lock.lock().expect("report write lock poisoned");

        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if !record.status.allows_edits() {
            return Err(ReportServiceError::InvalidTransition {
                from: record.status,
                to: ReportStatus::ForReview,
            });
        }

        self.recompute(&mut record, today)?;

        let checks = record
            .quality
            .as_ref()
            .map(|quality| quality.checks.as_slice())
            .unwrap_or(&[]);
        if !quality::is_eligible_for_review(checks) {
            let failures = quality::critical_failures(checks)
                .into_iter()
                .map(|check| CheckFailure {
                    id: check.id.clone(),
                    message: check.message.clone(),
                })
                .collect();
            return Err(ReportServiceError::ReviewBlocked { failures });
        }

        record.status = ReportStatus::ForReview;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn approve(&self, id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        self.transition(id, ReportStatus::ForReview, ReportStatus::Approved)
    }

    pub fn reject(&self, id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        self.transition(id, ReportStatus::ForReview, ReportStatus::Rejected)
    }

    fn transition(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        next: ReportStatus,
    ) -> Result<ReportRecord, ReportServiceError> {
        let lock = self.write_lock(id);
        let _guard = lock.lock().expect("report write lock poisoned");

        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if record.status != expected {
            return Err(ReportServiceError::InvalidTransition {
                from: record.status,
                to: next,
            });
        }

        record.status = next;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    fn recompute(
        &self,
        record: &mut ReportRecord,
        today: Option<NaiveDate>,
    ) -> Result<(), ReportServiceError> {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let catalog = self.metadata.catalog()?;
        let snapshot = &record.snapshot;

        let valuation = ValuationEngine::appraise(
            &snapshot.valuation_input,
            &catalog,
            Some(snapshot.appraisal_date),
        );
        let comparables = comparables::analyze(&snapshot.comparables, &snapshot.analysis_notes);
        let quality = self.quality.evaluate(snapshot, &valuation, today);

        record.valuation = Some(valuation);
        record.comparables = Some(comparables);
        record.quality = Some(quality);
        Ok(())
    }

    fn write_lock(&self, id: &ReportId) -> Arc<Mutex<()>> {
        let mut registry = self.write_locks.lock().expect("lock registry poisoned");
        registry.entry(id.clone()).or_default().clone()
    }
}

/// One critical check blocking the review gate, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    pub id: String,
    pub message: Option<String>,
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("survey data is locked while the report is {}", .status.label())]
    EditLocked { status: ReportStatus },
    #[error("report cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ReportStatus,
        to: ReportStatus,
    },
    #[error("review blocked by {} critical check(s)", .failures.len())]
    ReviewBlocked { failures: Vec<CheckFailure> },
}
