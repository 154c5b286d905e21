use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::domain::{ReportId, ReportSnapshot};
use super::repository::{MetadataProvider, ReportRepository, RepositoryError};
use super::service::{AppraisalReportService, ReportServiceError};

/// Router builder exposing the report aggregate over HTTP.
pub fn report_router<R, M>(service: Arc<AppraisalReportService<R, M>>) -> Router
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    Router::new()
        .route("/api/v1/appraisal/reports", post(create_handler::<R, M>))
        .route(
            "/api/v1/appraisal/reports/:report_id",
            get(detail_handler::<R, M>),
        )
        .route(
            "/api/v1/appraisal/reports/:report_id/snapshot",
            put(update_snapshot_handler::<R, M>),
        )
        .route(
            "/api/v1/appraisal/reports/:report_id/recalculate",
            post(recalculate_handler::<R, M>),
        )
        .route(
            "/api/v1/appraisal/reports/:report_id/submit",
            post(submit_handler::<R, M>),
        )
        .route(
            "/api/v1/appraisal/reports/:report_id/approve",
            post(approve_handler::<R, M>),
        )
        .route(
            "/api/v1/appraisal/reports/:report_id/reject",
            post(reject_handler::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    axum::Json(snapshot): axum::Json<ReportSnapshot>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.create(snapshot, None) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.get(&ReportId(report_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_snapshot_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
    axum::Json(snapshot): axum::Json<ReportSnapshot>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.update_snapshot(&ReportId(report_id), snapshot, None) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.recalculate(&ReportId(report_id), None) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.submit_for_review(&ReportId(report_id), None) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.approve(&ReportId(report_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, M>(
    State(service): State<Arc<AppraisalReportService<R, M>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    M: MetadataProvider + 'static,
{
    match service.reject(&ReportId(report_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

/// A blocked review gate is an expected business outcome, so it is reported
/// as a structured 422 payload rather than a server failure.
fn error_response(error: ReportServiceError) -> Response {
    match error {
        ReportServiceError::ReviewBlocked { failures } => {
            let payload = json!({
                "error": "report is not eligible for review",
                "failures": failures,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ReportServiceError::EditLocked { .. } | ReportServiceError::InvalidTransition { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        ReportServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "report not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ReportServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "report already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
