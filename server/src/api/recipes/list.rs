use crate::db::DbPool;
use crate::error::ApiResult;
use crate::models::Recipe;
use crate::schema::{recipes, users};
use axum::{extract::State, Json};
use diesel::prelude::*;
use recipi_core::RecipeResponse;
use std::sync::Arc;

use super::shared::to_response;

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes, newest first", body = Vec<RecipeResponse>)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let mut conn = pool.get()?;

    let rows: Vec<(Recipe, String)> = recipes::table
        .inner_join(users::table)
        .order(recipes::created_at.desc())
        .select((Recipe::as_select(), users::username))
        .load(&mut conn)?;

    Ok(Json(
        rows.into_iter()
            .map(|(recipe, author)| to_response(recipe, author))
            .collect(),
    ))
}
