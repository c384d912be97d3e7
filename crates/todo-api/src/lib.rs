//! HTTP API（axum）
//!
//! `/api/v1/login` でトークンを発行し、それ以外の全ルートを認証ゲートの内側に置きます。
//! タスクはプロセス内メモリにのみ保持されます。

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use infrastructure::{InMemoryTaskRepository, TaskRepository};
use shared::TokenService;
use std::{sync::Arc, time::Instant};

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;

pub const LOGIN_PATH: &str = "/api/v1/login";

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// 空の InMemory ストアで初期化
    pub fn new(tokens: TokenService) -> Self {
        Self::with_repository(tokens, Arc::new(InMemoryTaskRepository::new()))
    }

    /// 外部からストアを注入できる版
    pub fn with_repository(tokens: TokenService, tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            tasks,
            tokens: Arc::new(tokens),
        }
    }
}

/// ルータを構築して返します。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            LOGIN_PATH,
            post(auth::login).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/todos",
            get(handlers::list_tasks)
                .post(handlers::create_task)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/todos/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ))
        // 最外層: 認証失敗も含めて全リクエストを記録
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    tracing::info!(%method, %path, "Incoming request");
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
