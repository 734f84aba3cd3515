use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use std::sync::Arc;

use super::shared::{find_by_slug, require_owner};

#[utoipa::path(
    delete,
    path = "/api/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get()?;

    let (recipe, _) = find_by_slug(&mut conn, &slug)?;
    require_owner(&recipe, &user)?;

    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    tracing::info!(slug = %slug, user = %user.username, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
