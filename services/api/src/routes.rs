use crate::infra::{default_catalog, default_quality_config, deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

use appraisal_core::error::AppError;
use appraisal_core::workflows::appraisal::{
    analyze, is_eligible_for_review, report_router, AppraisalReportService, ComparableAnalysis,
    ComparableCsvImporter, LegalAlert, MetadataProvider, QualityCheck, QualityEngine,
    QualitySummary, ReportRepository, ReportSnapshot, ValuationEngine, ValuationResult,
};

/// Stateless preview request: the same engines the persistence path uses run
/// over the submitted snapshot without storing anything.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) snapshot: ReportSnapshot,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) comparables_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) today: NaiveDate,
    pub(crate) valuation: ValuationResult,
    pub(crate) comparables: ComparableAnalysis,
    pub(crate) checks: Vec<QualityCheck>,
    pub(crate) summary: QualitySummary,
    pub(crate) legal_alerts: Vec<LegalAlert>,
    pub(crate) eligible_for_review: bool,
}

pub(crate) fn with_report_routes<R, M>(service: Arc<AppraisalReportService<R, M>>) -> axum::Router
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    report_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/appraisal/preview",
            axum::routing::post(preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn preview_endpoint(
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let PreviewRequest {
        mut snapshot,
        today,
        comparables_csv,
    } = payload;

    if let Some(csv) = comparables_csv {
        let imported = ComparableCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?;
        snapshot.comparables.extend(imported);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = default_catalog();

    let valuation = ValuationEngine::appraise(
        &snapshot.valuation_input,
        &catalog,
        Some(snapshot.appraisal_date),
    );
    let comparables = analyze(&snapshot.comparables, &snapshot.analysis_notes);
    let evaluation = QualityEngine::new(default_quality_config()).evaluate(
        &snapshot,
        &valuation,
        today,
    );
    let eligible_for_review = is_eligible_for_review(&evaluation.checks);

    Ok(Json(PreviewResponse {
        today,
        valuation,
        comparables,
        checks: evaluation.checks,
        summary: evaluation.summary,
        legal_alerts: evaluation.legal_alerts,
        eligible_for_review,
    }))
}
