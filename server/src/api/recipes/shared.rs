use diesel::prelude::*;
use recipi_core::{Difficulty, RecipeResponse, RecipeStep};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::models::{Recipe, User};
use crate::schema::{recipes, users};

/// Multipart body accepted by recipe create and update.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct RecipeForm {
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub servings: Option<u32>,
    pub notes: Option<String>,
    /// JSON-encoded array of ingredient strings
    pub ingredients: Option<String>,
    /// Sent as indexed fields: steps[0], steps[1], ...
    pub steps: Option<Vec<String>>,
    /// Sent as indexed fields: tags[0], tags[1], ...
    pub tags: Option<Vec<String>>,
}

pub fn to_response(recipe: Recipe, author: String) -> RecipeResponse {
    let steps = recipe
        .steps
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, instruction)| RecipeStep {
            position: i as u32 + 1,
            instruction,
        })
        .collect();

    RecipeResponse {
        slug: recipe.slug,
        name: recipe.name,
        description: recipe.description,
        prep_time: from_db_int(recipe.prep_time),
        cook_time: from_db_int(recipe.cook_time),
        difficulty: recipe.difficulty.parse().unwrap_or_default(),
        servings: recipe.servings.map(from_db_int),
        notes: recipe.notes,
        ingredients: recipe.ingredients,
        steps,
        tags: recipe.tags.into_iter().flatten().collect(),
        image_id: recipe.photo_id,
        author,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }
}

/// Fetch a recipe and its author's username.
pub fn find_by_slug(conn: &mut PgConnection, slug: &str) -> ApiResult<(Recipe, String)> {
    recipes::table
        .inner_join(users::table)
        .filter(recipes::slug.eq(slug))
        .select((Recipe::as_select(), users::username))
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}

/// Only the owner may change or delete a recipe.
pub fn require_owner(recipe: &Recipe, user: &User) -> ApiResult<()> {
    if recipe.user_id != user.id {
        return Err(ApiError::Forbidden(
            "You can only modify your own recipes".to_string(),
        ));
    }
    Ok(())
}

pub fn to_db_array(items: &[String]) -> Vec<Option<String>> {
    items.iter().cloned().map(Some).collect()
}

/// Values are bounded by validation well below `i32::MAX`.
pub fn to_db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_db_int(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
