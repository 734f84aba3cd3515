use crate::api::multipart::FormParts;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewRecipe, Recipe};
use crate::photos::store_image;
use crate::schema::recipes;
use crate::state::UploadLimits;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use recipi_core::multipart::parse_recipe_parts;
use recipi_core::slug::{next_free_slug, slugify};
use recipi_core::{ingredients, RecipeResponse};
use std::sync::Arc;

use super::shared::{to_db_array, to_db_int, to_response, RecipeForm};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = RecipeForm),
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(limits): State<UploadLimits>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let form = FormParts::read(multipart, limits.max_image_bytes).await?;
    let fields = parse_recipe_parts(form.fields)?.into_fields()?;

    let mut conn = pool.get()?;

    let recipe: Recipe = conn.transaction(|conn| -> ApiResult<Recipe> {
        let photo_id = form
            .image
            .as_ref()
            .map(|image| store_image(conn, user.id, image))
            .transpose()?;

        let base = slugify(&fields.name);
        let taken: Vec<String> = recipes::table
            .filter(
                recipes::slug
                    .eq(base.as_str())
                    .or(recipes::slug.like(format!("{}-%", base))),
            )
            .select(recipes::slug)
            .load(conn)?;
        let slug = next_free_slug(&base, &taken);

        let encoded_ingredients = ingredients::encode(&fields.ingredients);
        let steps = to_db_array(&fields.steps);
        let tags = to_db_array(&fields.tags);

        let new_recipe = NewRecipe {
            user_id: user.id,
            slug: &slug,
            name: fields.name.trim(),
            description: &fields.description,
            prep_time: to_db_int(fields.prep_time),
            cook_time: to_db_int(fields.cook_time),
            difficulty: fields.difficulty.as_str(),
            servings: fields.servings.map(to_db_int),
            notes: fields.notes.as_deref(),
            ingredients: &encoded_ingredients,
            steps: &steps,
            tags: &tags,
            photo_id,
        };

        diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    })?;

    tracing::info!(slug = %recipe.slug, user = %user.username, "recipe created");

    Ok((StatusCode::CREATED, Json(to_response(recipe, user.username))))
}
