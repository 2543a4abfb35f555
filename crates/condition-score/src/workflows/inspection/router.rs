use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{MediaHandle, ObservationKey};
use super::instance::{InspectionError, InspectionId};
use super::report::{render_csv, views::InspectionView};
use super::repository::{InspectionRepository, RepositoryError};
use super::service::{InspectionRequest, InspectionService, InspectionServiceError};

const LIST_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationUpdate {
    pub key: ObservationKey,
    #[serde(default = "default_delta")]
    pub delta: i64,
}

fn default_delta() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationCount {
    pub key: ObservationKey,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub key: ObservationKey,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub key: ObservationKey,
    pub handle: MediaHandle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
}

/// Router builder exposing the inspection capture and scoring endpoints.
pub fn inspection_router<R>(service: Arc<InspectionService<R>>) -> Router
where
    R: InspectionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/inspections",
            post(start_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/inspections/:id", get(get_handler::<R>))
        .route(
            "/api/v1/inspections/:id/observations",
            post(record_handler::<R>),
        )
        .route("/api/v1/inspections/:id/notes", put(note_handler::<R>))
        .route("/api/v1/inspections/:id/media", post(media_handler::<R>))
        .route("/api/v1/inspections/:id/score", get(score_handler::<R>))
        .route(
            "/api/v1/inspections/:id/complete",
            post(complete_handler::<R>),
        )
        .route("/api/v1/inspections/:id/report", get(report_handler::<R>))
        .route(
            "/api/v1/inspections/:id/report.csv",
            get(report_csv_handler::<R>),
        )
        .route(
            "/api/v1/sample-size/:units",
            get(sample_size_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    axum::Json(request): axum::Json<InspectionRequest>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.start(request) {
        Ok(inspection) => (
            StatusCode::CREATED,
            axum::Json(InspectionView::from(&inspection)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<InspectionService<R>>>) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.list(LIST_LIMIT) {
        Ok(inspections) => {
            let views: Vec<InspectionView> = inspections.iter().map(InspectionView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.get(&InspectionId(id)) {
        Ok(inspection) => {
            (StatusCode::OK, axum::Json(InspectionView::from(&inspection))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<ObservationUpdate>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.record_occurrence(&InspectionId(id), update.key, update.delta) {
        Ok(count) => (
            StatusCode::OK,
            axum::Json(ObservationCount {
                key: update.key,
                count,
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn note_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<NoteUpdate>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.set_note(&InspectionId(id), update.key, update.note) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn media_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
    axum::Json(attachment): axum::Json<MediaAttachment>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.attach_media(&InspectionId(id), attachment.key, attachment.handle) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.score(&InspectionId(id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
    body: Option<axum::Json<CompletionRequest>>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let completed_on = body
        .and_then(|axum::Json(request)| request.completed_on)
        .unwrap_or_else(|| Local::now().date_naive());

    match service.complete(&InspectionId(id), completed_on) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.report(&InspectionId(id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_csv_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let report = match service.report(&InspectionId(id)) {
        Ok(report) => report,
        Err(error) => return error_response(error),
    };

    match render_csv(&report) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn sample_size_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(units): Path<u32>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.resolve_sample_size(units) {
        Ok(sample_size) => {
            let payload = json!({ "total_units": units, "sample_size": sample_size });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: InspectionServiceError) -> Response {
    let status = match &error {
        InspectionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InspectionServiceError::Repository(RepositoryError::Conflict)
        | InspectionServiceError::Inspection(InspectionError::Completed(_)) => StatusCode::CONFLICT,
        InspectionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        InspectionServiceError::Inspection(_) | InspectionServiceError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
