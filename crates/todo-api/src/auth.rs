//! 認証ゲートとログイン
//!
//! ゲートはログインパス以外の全リクエストに適用され、ハンドラより先に完了します。
//! 検証に成功した場合のみ `Identity` をリクエスト拡張に載せて次へ進めます。

use crate::error::ApiError;
use crate::models::{AppJson, LoginRequest, LoginResponse};
use crate::{AppState, LOGIN_PATH};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};

/// `Authorization: Bearer <token>` を検証するミドルウェア
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.uri().path() == LOGIN_PATH {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers())?;
    let identity = state.tokens.verify(token)?;

    tracing::debug!(user_id = %identity.user_id, "token accepted");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// ヘッダー欠落は 401、値の形式不正は 403 として扱う
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.split_whitespace().nth(1))
        .ok_or(ApiError::InvalidToken)
}

/// POST /api/v1/login
///
/// 読めない本文は空の資格情報と同じく 401 にする。
pub async fn login(
    State(state): State<AppState>,
    body: Result<AppJson<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let AppJson(req) = body.map_err(|_| ApiError::InvalidCredentials)?;
    let token = state.tokens.issue(&req.username, &req.password)?;
    tracing::info!(username = %req.username, "login succeeded");
    Ok(Json(LoginResponse { token }))
}
