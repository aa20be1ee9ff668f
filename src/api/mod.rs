pub mod dto;
pub mod extract;

use crate::api::dto::{ListTasksQuery, TaskRequest, TaskResponse};
use crate::api::extract::ValidatedJson;
use crate::errors::AppError;
use crate::service::TaskService;
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State, rejection::QueryRejection},
    http::{HeaderName, HeaderValue, StatusCode},
    routing::{delete, get, patch, post},
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use uuid::Uuid;


const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
}

#[derive(Clone, Copy)]
pub struct MakeUuidRequest;

impl MakeRequestId for MakeUuidRequest {
    fn make_request_id<B>(&mut self, _: &axum::http::Request<B>) -> Option<RequestId> {
        let uuid = Uuid::new_v4().to_string();

        let header_value =
            HeaderValue::from_str(&uuid).unwrap_or(HeaderValue::from_static("invalid-uuid"));

        Some(RequestId::new(header_value))
    }
}

/// Build the application router with all routes and middleware
///
/// # Arguments
///
/// * `service` - An instance of TaskService to handle business logic
///
/// # Returns
/// * `Router` - The configured Axum router
pub fn router(service: TaskService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/api/tasks", post(create_task).get(list_tasks))
        .route("/api/tasks/completed", delete(delete_completed_tasks))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/complete", patch(mark_completed))
        .route("/api/tasks/{id}/pending", patch(mark_pending))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let req_id = request
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or("bad-ascii"))
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        request_id = %req_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeUuidRequest))
}

/// Handler to create a new task
///
/// # Errors
///
/// * `AppError::Validation` - If the body breaks a field constraint
/// * `AppError::BadRequest` - If the body is not valid JSON
async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let task = state.service.create_task(payload).await?;

    tracing::info!(task_id = task.id, "Task Created Successfully");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Handler to list tasks, optionally filtered by `completed` and/or a `title` fragment
async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let tasks = match (query.completed, query.title.as_deref()) {
        (None, None) => state.service.get_all_tasks().await?,
        (Some(completed), None) => state.service.get_tasks_by_status(completed).await?,
        (completed, Some(fragment)) => {
            let mut found = state.service.search_tasks_by_title(fragment).await?;
            if let Some(completed) = completed {
                found.retain(|task| task.completed == completed);
            }
            found
        }
    };

    Ok(Json(tasks))
}

/// Handler to fetch a single task
///
/// # Errors
///
/// * `AppError::NotFound` - If no task has this id
async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(state.service.get_task_by_id(task_id).await?))
}

/// Handler to replace a task's title and description
///
/// # Errors
///
/// * `AppError::NotFound` - If no task has this id
/// * `AppError::Validation` - If the body breaks a field constraint
async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.service.update_task(task_id, payload).await?;

    tracing::info!(task_id, "Task Updated");

    Ok(Json(task))
}

/// Handler to mark a task as completed
///
/// # Errors
///
/// * `AppError::NotFound` - If no task has this id
async fn mark_completed(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.service.mark_as_completed(task_id).await?;

    tracing::info!(task_id, "Task marked as completed");

    Ok(Json(task))
}

/// Handler to mark a task as pending again
///
/// # Errors
///
/// * `AppError::NotFound` - If no task has this id
async fn mark_pending(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.service.mark_as_pending(task_id).await?;

    tracing::info!(task_id, "Task marked as pending");

    Ok(Json(task))
}

/// Handler to delete a task by its ID
///
/// # Errors
///
/// * `AppError::NotFound` - If no task has this id
async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_task(task_id).await?;

    tracing::info!(task_id, "Task Deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler to delete every completed task. Succeeds even when there are none.
async fn delete_completed_tasks(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let deleted = state.service.delete_completed_tasks().await?;

    tracing::info!(deleted, "Completed tasks deleted");

    Ok(StatusCode::NO_CONTENT)
}
