use crate::api::recipes::shared::to_response;
use crate::api::ErrorResponse;
use crate::auth::find_user_by_username;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::Recipe;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use recipi_core::ProfileResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Username (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Profile with the user's recipes", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(pool): State<Arc<DbPool>>,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let mut conn = pool.get()?;

    let user = find_user_by_username(&mut conn, &username)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let owned: Vec<Recipe> = recipes::table
        .filter(recipes::user_id.eq(user.id))
        .order(recipes::created_at.asc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let recipes = owned
        .into_iter()
        .map(|recipe| to_response(recipe, user.username.clone()))
        .collect();

    Ok(Json(ProfileResponse {
        username: user.username,
        bio: user.bio,
        email: user.email,
        image_id: user.photo_id,
        recipes,
    }))
}
