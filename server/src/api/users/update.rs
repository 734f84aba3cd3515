use crate::api::multipart::FormParts;
use crate::api::ErrorResponse;
use crate::auth::{issue_token, username_taken, AuthUser, JwtManager};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::{User, UserChangeset};
use crate::photos::store_image;
use crate::schema::users;
use crate::state::UploadLimits;
use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use recipi_core::multipart::parse_profile_parts;
use recipi_core::{AuthenticatedUser, ProfileUpdateResponse};
use std::sync::Arc;
use utoipa::ToSchema;

const USERNAME_TAKEN: &str = "Username already exists";

/// Multipart body accepted by the profile update. Every field is optional.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProfileForm {
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
}

#[utoipa::path(
    patch,
    path = "/api/users/user",
    tag = "users",
    request_body(content_type = "multipart/form-data", content = ProfileForm),
    responses(
        (status = 200, description = "Profile updated; carries a replacement token", body = ProfileUpdateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(jwt): State<Arc<JwtManager>>,
    State(limits): State<UploadLimits>,
    multipart: Multipart,
) -> ApiResult<Json<ProfileUpdateResponse>> {
    let form = FormParts::read(multipart, limits.max_image_bytes).await?;
    let mut patch = parse_profile_parts(form.fields);
    patch.image = form.image;

    if patch.is_empty() {
        return Err(ApiError::BadRequest("No changes provided".to_string()));
    }
    patch.validate()?;

    let mut conn = pool.get()?;

    if let Some(username) = &patch.username {
        if username_taken(&mut conn, username, Some(user.id))? {
            return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
        }
    }

    let updated: User = conn.transaction(|conn| -> ApiResult<User> {
        let photo_id = patch
            .image
            .as_ref()
            .map(|image| store_image(conn, user.id, image))
            .transpose()?;

        let changes = UserChangeset {
            username: patch.username.as_deref(),
            email: patch.email.as_deref(),
            bio: patch.bio.as_deref(),
            photo_id,
            updated_at: Utc::now(),
        };

        diesel::update(users::table.find(user.id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(conn)
            .map_err(|e| ApiError::conflict_on_unique(e, USERNAME_TAKEN))
    })?;

    // The old token names the old username; hand back one that matches.
    let token = issue_token(&jwt, &updated)?;

    tracing::info!(user_id = %updated.id, username = %updated.username, "profile updated");

    Ok(Json(ProfileUpdateResponse {
        user: AuthenticatedUser {
            username: updated.username,
            bio: updated.bio,
            email: updated.email,
            image_id: updated.photo_id,
            token,
        },
    }))
}
