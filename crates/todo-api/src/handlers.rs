use crate::error::ApiError;
use crate::models::{AppJson, CreateTaskRequest, UpdateTaskRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domain::{Task, TaskId};
use shared::Identity;

/// GET /api/v1/todos
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.tasks.list())
}

/// GET /api/v1/todos/:id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.get(&TaskId::from(id))?;
    Ok(Json(task))
}

/// POST /api/v1/todos
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppJson(req): AppJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.tasks.create(req.into())?;
    tracing::info!(task_id = %task.id, user_id = %identity.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/todos/:id
///
/// 存在しない ID は本文の検査より先に 404 を返す。
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<AppJson<UpdateTaskRequest>, ApiError>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::from(id);
    state.tasks.get(&id)?;
    let AppJson(req) = body?;

    let task = state.tasks.update(&id, req.into())?;
    tracing::info!(task_id = %task.id, user_id = %identity.user_id, "todo updated");
    Ok(Json(task))
}

/// DELETE /api/v1/todos/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TaskId::from(id);
    state.tasks.delete(&id)?;
    tracing::info!(task_id = %id, user_id = %identity.user_id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 未定義ルート
pub async fn fallback() -> ApiError {
    ApiError::RouteNotFound
}

/// 定義済みパスで未対応のメソッド
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
