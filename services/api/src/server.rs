use crate::cli::ServeArgs;
use crate::infra::{load_content, AppState, InMemorySessionRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use prakruti::assessment::AssessmentService;
use prakruti::config::AppConfig;
use prakruti::error::AppError;
use prakruti::telemetry;
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

    let (questionnaire, catalog) = load_content(&config.content)?;
    info!(
        questions = questionnaire.len(),
        title = questionnaire.title(),
        "questionnaire loaded"
    );

    let repository = Arc::new(InMemorySessionRepository::default());
    let service = Arc::new(AssessmentService::new(repository, questionnaire, catalog));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prakruti assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
