use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use cyberscore::assessment::{
    evaluation_router, EntiteRepository, EvaluationCache, EvaluationRepository, EvaluationService,
};

pub(crate) fn with_evaluation_routes<E, V, C>(
    service: Arc<EvaluationService<E, V, C>>,
) -> axum::Router
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    evaluation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use cyberscore::assessment::NoopCache;
    use cyberscore::questionnaire::builtin_questionnaire;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], json!("ok"));
    }

    #[tokio::test]
    async fn router_serves_the_questionnaire() {
        let store = crate::infra::InMemoryStore::with_directory();
        let service = Arc::new(EvaluationService::new(
            store.clone(),
            store,
            Arc::new(NoopCache),
            Arc::new(builtin_questionnaire()),
        ));

        let response = with_evaluation_routes(service)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/questions")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["success"], json!(true));
    }
}
