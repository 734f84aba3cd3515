use crate::api::multipart::FormParts;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::{Recipe, RecipeChangeset};
use crate::photos::store_image;
use crate::schema::recipes;
use crate::state::UploadLimits;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use recipi_core::multipart::parse_recipe_parts;
use recipi_core::{ingredients, RecipePatch, RecipeResponse};
use std::sync::Arc;

use super::shared::{find_by_slug, require_owner, to_db_array, to_db_int, to_response, RecipeForm};

/// Map the present fields of a patch onto a changeset. The slug is never
/// changed, so renaming a recipe keeps its address.
fn changeset(patch: RecipePatch) -> RecipeChangeset {
    RecipeChangeset {
        name: patch.name.map(|n| n.trim().to_string()),
        description: patch.description,
        prep_time: patch.prep_time.map(to_db_int),
        cook_time: patch.cook_time.map(to_db_int),
        difficulty: patch.difficulty.map(|d| d.as_str().to_string()),
        servings: patch.servings.map(to_db_int),
        notes: patch.notes,
        ingredients: patch.ingredients.as_deref().map(ingredients::encode),
        steps: patch.steps.as_deref().map(to_db_array),
        tags: patch.tags.as_deref().map(to_db_array),
        photo_id: None,
        updated_at: Some(Utc::now()),
    }
}

#[utoipa::path(
    put,
    path = "/api/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    request_body(content_type = "multipart/form-data", content = RecipeForm),
    responses(
        (status = 200, description = "Recipe updated successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(limits): State<UploadLimits>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<RecipeResponse>> {
    let form = FormParts::read(multipart, limits.max_image_bytes).await?;
    let patch = parse_recipe_parts(form.fields)?;
    patch.validate()?;

    let mut conn = pool.get()?;

    let (recipe, author) = find_by_slug(&mut conn, &slug)?;
    require_owner(&recipe, &user)?;

    // Last writer wins: no version check against concurrent edits.
    let updated: Recipe = conn.transaction(|conn| -> ApiResult<Recipe> {
        let mut changes = changeset(patch);
        changes.photo_id = form
            .image
            .as_ref()
            .map(|image| store_image(conn, user.id, image))
            .transpose()?;

        diesel::update(recipes::table.find(recipe.id))
            .set(&changes)
            .returning(Recipe::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    })?;

    tracing::info!(slug = %updated.slug, user = %user.username, "recipe updated");

    Ok(Json(to_response(updated, author)))
}
