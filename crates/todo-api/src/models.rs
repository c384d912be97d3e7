use crate::error::ApiError;
use axum::extract::FromRequest;
use domain::{NewTask, TaskPatch};
use serde::{Deserialize, Serialize};

/// JSON 抽出器（失敗時も `{message}` 形式で 400 を返す）
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// POST /api/v1/login リクエスト
///
/// フィールド欠落はパースエラーではなく認証失敗として扱う。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/v1/todos リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            title: req.title,
            description: req.description,
        }
    }
}

/// PUT /api/v1/todos/:id リクエスト（省略または null のフィールドは変更しない）
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}
