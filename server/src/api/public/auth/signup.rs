use crate::api::ErrorResponse;
use crate::auth::{hash_password, issue_token, username_taken, JwtManager};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use recipi_core::profile::{validate_email, validate_username};
use recipi_core::{SignupRequest, TokenResponse, ValidationErrors};
use std::sync::Arc;

const USERNAME_TAKEN: &str = "Username already exists";
pub const MIN_PASSWORD_LEN: usize = 8;

fn validate(req: &SignupRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.extend(validate_username(req.username.trim()));
    errors.extend(validate_email(req.email.trim()));
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    errors.into_result()
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({"username": "osman", "email": "osman@example.com", "password": "password"})),
    responses(
        (status = 201, description = "User created successfully", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    State(jwt): State<Arc<JwtManager>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    validate(&req)?;

    let username = req.username.trim();
    let email = req.email.trim();

    let mut conn = pool.get()?;

    if username_taken(&mut conn, username, None)? {
        return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let user: User = diesel::insert_into(users::table)
        .values(&NewUser {
            username,
            email,
            password_hash: &password_hash,
        })
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| ApiError::conflict_on_unique(e, USERNAME_TAKEN))?;

    let token = issue_token(&jwt, &user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user signed up");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
