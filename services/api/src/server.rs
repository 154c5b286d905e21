use crate::cli::ServeArgs;
use crate::infra::{
    default_quality_config, AppState, InMemoryReportRepository, StaticMetadataProvider,
};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use appraisal_core::config::AppConfig;
use appraisal_core::error::AppError;
use appraisal_core::telemetry;
use appraisal_core::workflows::appraisal::AppraisalReportService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::default());
    let metadata = Arc::new(StaticMetadataProvider::default());
    let report_service = Arc::new(AppraisalReportService::new(
        repository,
        metadata,
        default_quality_config(),
    ));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "collateral appraisal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
