use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::cache::EvaluationCache;
use super::domain::{AnswerSet, EntiteId};
use super::repository::{EntiteRepository, EvaluationRepository};
use super::service::{EvaluationService, EvaluationServiceError};

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Router builder exposing the evaluation API.
pub fn evaluation_router<E, V, C>(service: Arc<EvaluationService<E, V, C>>) -> Router
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(submit_handler::<E, V, C>))
        .route(
            "/api/v1/evaluations/latest/:entite_id",
            get(latest_handler::<E, V, C>),
        )
        .route(
            "/api/v1/evaluations/history",
            get(history_handler::<E, V, C>),
        )
        .route(
            "/api/v1/evaluations/history/details",
            get(history_details_handler::<E, V, C>),
        )
        .route("/api/v1/evaluations/stats", get(stats_handler::<E, V, C>))
        .route(
            "/api/v1/evaluations/breakdown",
            get(breakdown_handler::<E, V, C>),
        )
        .route(
            "/api/v1/evaluations/compare/:id",
            get(compare_handler::<E, V, C>),
        )
        .route(
            "/api/v1/evaluations/compare-sector",
            get(compare_sector_handler::<E, V, C>),
        )
        .route("/api/v1/entites", get(entites_handler::<E, V, C>))
        .route("/api/v1/entites/:id", get(entite_handler::<E, V, C>))
        .route("/api/v1/questions", get(questions_handler::<E, V, C>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) entite_id: String,
    pub(crate) evaluateur: String,
    pub(crate) reponses: AnswerSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntiteQuery {
    pub(crate) entite_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    pub(crate) entite_id: String,
    pub(crate) page: Option<usize>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectorQuery {
    pub(crate) entite_id: String,
    pub(crate) secteur: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) exclude: Option<String>,
}

fn error_response(error: &EvaluationServiceError) -> Response {
    let status = match error {
        EvaluationServiceError::IncompleteSubmission { .. }
        | EvaluationServiceError::SameEntity
        | EvaluationServiceError::MissingEvaluations => StatusCode::BAD_REQUEST,
        EvaluationServiceError::EntityNotFound
        | EvaluationServiceError::NoEvaluation
        | EvaluationServiceError::NoEntityData => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = json!({
        "success": false,
        "error": error.code(),
        "message": error.to_string(),
    });
    if let EvaluationServiceError::IncompleteSubmission { missing } = error {
        body["missing"] = json!(missing);
    }

    (status, Json(body)).into_response()
}

pub(crate) async fn submit_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    let entite_id = EntiteId(request.entite_id);
    match service.submit(&entite_id, &request.evaluateur, &request.reponses) {
        Ok(receipt) => {
            let body = json!({
                "success": true,
                "message": "Évaluation enregistrée",
                "evaluation_id": receipt.evaluation_id,
                "score": receipt.score,
            });
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn latest_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Path(entite_id): Path<String>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.latest(&EntiteId(entite_id)) {
        Ok(view) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": view })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn history_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match service.history(&EntiteId(query.entite_id), page, limit) {
        Ok(history) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": history.data,
                "pagination": history.pagination,
            })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn history_details_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<EntiteQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.history_details(&EntiteId(query.entite_id)) {
        Ok(views) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": views.len(),
                "data": views,
            })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn stats_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<EntiteQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.stats(&EntiteId(query.entite_id)) {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": stats })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn breakdown_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<EntiteQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.domain_breakdown(&EntiteId(query.entite_id)) {
        Ok(scores) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": scores })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn compare_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Path(other_id): Path<String>,
    Query(query): Query<EntiteQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.compare(&EntiteId(query.entite_id), &EntiteId(other_id)) {
        Ok(view) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": view })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn compare_sector_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<SectorQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.compare_sector(&EntiteId(query.entite_id), &query.secteur) {
        Ok(view) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": view })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn entites_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    let excluding = query.exclude.map(EntiteId);
    match service.entites(excluding.as_ref()) {
        Ok(entites) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": entites })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn entite_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
    Path(id): Path<String>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    match service.entite(&EntiteId(id)) {
        Ok(entite) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": entite })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn questions_handler<E, V, C>(
    State(service): State<Arc<EvaluationService<E, V, C>>>,
) -> Response
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": service.questionnaire() })),
    )
        .into_response()
}
