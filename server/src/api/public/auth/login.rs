use crate::api::ErrorResponse;
use crate::auth::{find_user_by_username, issue_token, verify_password, JwtManager};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use recipi_core::{LoginRequest, TokenResponse};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "osman", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(jwt): State<Arc<JwtManager>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let mut conn = pool.get()?;

    let user = find_user_by_username(&mut conn, req.username.trim())?
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&jwt, &user)?;
    Ok(Json(TokenResponse { token }))
}
