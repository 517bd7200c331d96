use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAuditPublisher, InMemoryScoreRepository, InMemoryWeightConfigRepository,
};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pollen_scoring::config::AppConfig;
use pollen_scoring::error::AppError;
use pollen_scoring::scoring::ScoringService;
use pollen_scoring::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let scoring_config = config.scoring.initial_config()?;
    if !scoring_config.weights.is_valid() {
        warn!(
            total_weight = scoring_config.weights.total_weight(),
            "initial scoring weights do not total 100; aggregates will be approximate"
        );
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let scoring_service = Arc::new(ScoringService::new(
        Arc::new(InMemoryScoreRepository::default()),
        Arc::new(InMemoryWeightConfigRepository::new(scoring_config)),
        Arc::new(InMemoryAuditPublisher::default()),
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "candidate scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
