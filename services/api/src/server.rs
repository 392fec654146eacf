use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStore};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use cyberscore::assessment::{EvaluationService, TtlCache};
use cyberscore::config::AppConfig;
use cyberscore::error::AppError;
use cyberscore::questionnaire::{builtin_questionnaire, Questionnaire};
use cyberscore::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let questionnaire = match &config.questionnaire_path {
        Some(path) => Questionnaire::from_path(path)?,
        None => builtin_questionnaire(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = InMemoryStore::with_directory();
    let service = Arc::new(EvaluationService::new(
        store.clone(),
        store,
        Arc::new(TtlCache::default()),
        Arc::new(questionnaire),
    ));

    let app = with_evaluation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "security self-assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
