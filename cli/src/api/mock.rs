//! In-memory [`RecipiApi`] for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use recipi_core::multipart::parse_recipe_parts;
use recipi_core::slug::{next_free_slug, slugify};
use recipi_core::{
    decode_unverified, ingredients, AuthenticatedUser, ErrorResponse, LoginRequest, ProfilePatch, ProfileResponse,
    ProfileUpdateResponse, RecipeResponse, RecipeStep, SignupRequest, TokenResponse,
};
use tokio::sync::Mutex;

use super::{ApiError, ApiResult, RecipeUpload, RecipiApi};

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListRecipes,
    GetRecipe(String),
    CreateRecipe { token: String, upload: RecipeUpload },
    UpdateRecipe { token: String, slug: String, upload: RecipeUpload },
    DeleteRecipe { token: String, slug: String },
    GetProfile(String),
    UpdateProfile { token: String, patch: ProfilePatch },
    DeleteProfile { token: String },
    Signup(String),
    Login(String),
}

#[derive(Default)]
struct MockState {
    recipes: HashMap<String, RecipeResponse>,
    profiles: HashMap<String, ProfileResponse>,
    calls: Vec<Call>,
    failure: Option<(u16, ErrorResponse)>,
    issued_token: String,
}

/// Stores recipes and profiles in memory and records every call.
///
/// Writes are applied loosely: enough for controller tests, not a model of
/// server validation.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_recipe(&self, recipe: RecipeResponse) {
        let mut state = self.state.lock().await;
        state.recipes.insert(recipe.slug.clone(), recipe);
    }

    pub async fn insert_profile(&self, profile: ProfileResponse) {
        let mut state = self.state.lock().await;
        state.profiles.insert(profile.username.clone(), profile);
    }

    /// Token handed out by signup, login and profile updates.
    pub async fn set_issued_token(&self, token: impl Into<String>) {
        self.state.lock().await.issued_token = token.into();
    }

    /// Make every following call fail with this status and body.
    pub async fn fail_with(&self, status: u16, body: ErrorResponse) {
        self.state.lock().await.failure = Some((status, body));
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    /// Record the call, then report the configured failure if there is one.
    async fn record(&self, call: Call) -> ApiResult<tokio::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().await;
        state.calls.push(call);
        match &state.failure {
            Some((status, body)) => Err(ApiError::Status {
                status: *status,
                body: Some(body.clone()),
            }),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        body: Some(ErrorResponse::new(format!("{} not found", what))),
    }
}

fn invalid(errors: recipi_core::ValidationErrors) -> ApiError {
    ApiError::Status {
        status: 400,
        body: Some(ErrorResponse {
            error: "Validation failed".to_string(),
            details: errors.messages().to_vec(),
        }),
    }
}

fn steps(list: Vec<String>) -> Vec<RecipeStep> {
    list.into_iter()
        .enumerate()
        .map(|(i, instruction)| RecipeStep {
            position: i as u32 + 1,
            instruction,
        })
        .collect()
}

#[async_trait]
impl RecipiApi for MockApi {
    async fn list_recipes(&self) -> ApiResult<Vec<RecipeResponse>> {
        let state = self.record(Call::ListRecipes).await?;
        let mut recipes: Vec<RecipeResponse> = state.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn get_recipe(&self, slug: &str) -> ApiResult<RecipeResponse> {
        let state = self.record(Call::GetRecipe(slug.to_string())).await?;
        state
            .recipes
            .get(slug)
            .cloned()
            .ok_or_else(|| not_found("Recipe"))
    }

    async fn create_recipe(&self, token: &str, upload: RecipeUpload) -> ApiResult<RecipeResponse> {
        let mut state = self
            .record(Call::CreateRecipe {
                token: token.to_string(),
                upload: upload.clone(),
            })
            .await?;

        let fields = parse_recipe_parts(upload.fields)
            .and_then(|patch| patch.into_fields())
            .map_err(invalid)?;

        let taken: Vec<String> = state.recipes.keys().cloned().collect();
        let slug = next_free_slug(&slugify(&fields.name), &taken);
        let now = Utc::now();

        let recipe = RecipeResponse {
            slug: slug.clone(),
            name: fields.name,
            description: fields.description,
            prep_time: fields.prep_time,
            cook_time: fields.cook_time,
            difficulty: fields.difficulty,
            servings: fields.servings,
            notes: fields.notes,
            ingredients: ingredients::encode(&fields.ingredients),
            steps: steps(fields.steps),
            tags: fields.tags,
            image_id: None,
            author: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.recipes.insert(slug, recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(
        &self,
        token: &str,
        slug: &str,
        upload: RecipeUpload,
    ) -> ApiResult<RecipeResponse> {
        let mut state = self
            .record(Call::UpdateRecipe {
                token: token.to_string(),
                slug: slug.to_string(),
                upload: upload.clone(),
            })
            .await?;

        let patch = parse_recipe_parts(upload.fields).map_err(invalid)?;
        patch.validate().map_err(invalid)?;

        let recipe = state
            .recipes
            .get_mut(slug)
            .ok_or_else(|| not_found("Recipe"))?;

        if let Some(name) = patch.name {
            recipe.name = name;
        }
        if let Some(description) = patch.description {
            recipe.description = description;
        }
        if let Some(prep_time) = patch.prep_time {
            recipe.prep_time = prep_time;
        }
        if let Some(cook_time) = patch.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(difficulty) = patch.difficulty {
            recipe.difficulty = difficulty;
        }
        if let Some(list) = patch.ingredients {
            recipe.ingredients = ingredients::encode(&list);
        }
        if let Some(list) = patch.steps {
            recipe.steps = steps(list);
        }
        if let Some(tags) = patch.tags {
            recipe.tags = tags;
        }
        if patch.servings.is_some() {
            recipe.servings = patch.servings;
        }
        if patch.notes.is_some() {
            recipe.notes = patch.notes;
        }
        recipe.updated_at = Utc::now();

        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, token: &str, slug: &str) -> ApiResult<()> {
        let mut state = self
            .record(Call::DeleteRecipe {
                token: token.to_string(),
                slug: slug.to_string(),
            })
            .await?;
        state
            .recipes
            .remove(slug)
            .map(|_| ())
            .ok_or_else(|| not_found("Recipe"))
    }

    async fn get_profile(&self, username: &str) -> ApiResult<ProfileResponse> {
        let state = self.record(Call::GetProfile(username.to_string())).await?;
        state
            .profiles
            .values()
            .find(|p| p.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or_else(|| not_found("User"))
    }

    async fn update_profile(
        &self,
        token: &str,
        patch: ProfilePatch,
    ) -> ApiResult<ProfileUpdateResponse> {
        let state = self
            .record(Call::UpdateProfile {
                token: token.to_string(),
                patch: patch.clone(),
            })
            .await?;

        // Absent fields are unchanged; the caller's name comes from the token.
        let username = patch.username.unwrap_or_else(|| {
            decode_unverified(token)
                .map(|claims| claims.username)
                .unwrap_or_default()
        });
        Ok(ProfileUpdateResponse {
            user: AuthenticatedUser {
                username,
                bio: patch.bio.unwrap_or_default(),
                email: patch.email.unwrap_or_default(),
                image_id: None,
                token: state.issued_token.clone(),
            },
        })
    }

    async fn delete_profile(&self, token: &str) -> ApiResult<()> {
        self.record(Call::DeleteProfile {
            token: token.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn signup(&self, request: SignupRequest) -> ApiResult<TokenResponse> {
        let state = self.record(Call::Signup(request.username)).await?;
        Ok(TokenResponse {
            token: state.issued_token.clone(),
        })
    }

    async fn login(&self, request: LoginRequest) -> ApiResult<TokenResponse> {
        let state = self.record(Call::Login(request.username)).await?;
        Ok(TokenResponse {
            token: state.issued_token.clone(),
        })
    }
}
