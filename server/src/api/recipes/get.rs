use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};
use recipi_core::RecipeResponse;
use std::sync::Arc;

use super::shared::{find_by_slug, to_response};

#[utoipa::path(
    get,
    path = "/api/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RecipeResponse>> {
    let mut conn = pool.get()?;
    let (recipe, author) = find_by_slug(&mut conn, &slug)?;
    Ok(Json(to_response(recipe, author)))
}
