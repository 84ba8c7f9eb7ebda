use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStateStore};
use crate::routes::with_progression_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leo_rewards::config::AppConfig;
use leo_rewards::error::AppError;
use leo_rewards::progression::ProgressionService;
use leo_rewards::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryStateStore::default());
    let service = Arc::new(ProgressionService::new(
        store,
        config.engine.engine_config(),
    ));

    let app = with_progression_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "brushing rewards service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
