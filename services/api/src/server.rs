use crate::cli::ServeArgs;
use crate::infra::{AppState, DashboardState};
use crate::routes::dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sentify::config::AppConfig;
use sentify::customers::{CustomerDataset, ScoringClient};
use sentify::error::AppError;
use sentify::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dashboard_state = DashboardState {
        dataset: Arc::new(CustomerDataset::new(config.dataset.data_path.clone())),
        scoring: Arc::new(ScoringClient::new(
            config.scoring.base_url.clone(),
            config.scoring.health_timeout,
        )?),
        schema_path: Arc::new(config.dataset.schema_path.clone()),
    };

    let app = dashboard_routes()
        .layer(Extension(app_state))
        .layer(Extension(dashboard_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "customer dashboard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
