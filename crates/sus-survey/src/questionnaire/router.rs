use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{QuestionnaireSubmission, ResponseId};
use super::repository::{QuestionnaireRepository, RepositoryError};
use super::service::{QuestionnaireService, ServiceError};
use crate::scoring::{analyze, ResponseInput};

/// Router exposing scoring, intake, result lookup, listing, and aggregate endpoints.
pub fn questionnaire_router<R>(service: Arc<QuestionnaireService<R>>) -> Router
where
    R: QuestionnaireRepository + 'static,
{
    Router::new()
        .route("/api/v1/sus/score", post(score_handler))
        .route(
            "/api/v1/questionnaires",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/questionnaires/:response_id",
            get(result_handler::<R>).delete(delete_handler::<R>),
        )
        .route("/api/v1/statistics", get(statistics_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<usize>,
    limit: Option<usize>,
}

pub(crate) async fn score_handler(Json(payload): Json<Value>) -> Response {
    let responses = match payload {
        Value::Object(mut map) if map.contains_key("responses") => {
            map.remove("responses").unwrap_or(Value::Null)
        }
        other => other,
    };
    let analysis = analyze(&ResponseInput::from_value(responses));
    (StatusCode::OK, Json(analysis)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<QuestionnaireService<R>>>,
    payload: Result<Json<QuestionnaireSubmission>, JsonRejection>,
) -> Response
where
    R: QuestionnaireRepository + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return malformed_submission(rejection),
    };

    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record.result_view())).into_response(),
        Err(ServiceError::Respondent(violation)) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(ServiceError::InvalidResponses(validation)) => {
            let payload = json!({
                "error": "responses are incomplete or out of range",
                "errors": validation.errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(ServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "questionnaire already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<QuestionnaireService<R>>>,
    Query(query): Query<PageQuery>,
) -> Response
where
    R: QuestionnaireRepository + 'static,
{
    match service.page(query.page, query.limit) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn result_handler<R>(
    State(service): State<Arc<QuestionnaireService<R>>>,
    Path(response_id): Path<String>,
) -> Response
where
    R: QuestionnaireRepository + 'static,
{
    let id = ResponseId(response_id);
    match service.result(&id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<QuestionnaireService<R>>>,
    Path(response_id): Path<String>,
) -> Response
where
    R: QuestionnaireRepository + 'static,
{
    let id = ResponseId(response_id);
    match service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<QuestionnaireService<R>>>,
) -> Response
where
    R: QuestionnaireRepository + 'static,
{
    match service.statistics() {
        Ok(statistics) => (StatusCode::OK, Json(statistics)).into_response(),
        Err(other) => internal_error(other),
    }
}

fn not_found(id: &ResponseId) -> Response {
    let payload = json!({
        "error": "questionnaire not found",
        "id": id.0,
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

/// Keeps the extractor's status but answers with the usual `{"error": ..}` body.
fn malformed_submission(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(payload)).into_response()
}

fn internal_error(error: ServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
