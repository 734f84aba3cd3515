//! JSON bodies exchanged between the server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ingredients;
use crate::recipe::Difficulty;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Individual validation messages, when the request failed validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    /// The most specific message available: the first validation detail,
    /// otherwise the error itself.
    pub fn message(&self) -> &str {
        self.details
            .first()
            .map(String::as_str)
            .unwrap_or(self.error.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeStep {
    /// 1-based position within the recipe.
    pub position: u32,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub difficulty: Difficulty,
    pub servings: Option<u32>,
    pub notes: Option<String>,
    /// JSON-encoded array of ingredient strings.
    #[serde(deserialize_with = "ingredients::deserialize_encoded")]
    pub ingredients: String,
    pub steps: Vec<RecipeStep>,
    pub tags: Vec<String>,
    pub image_id: Option<Uuid>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub email: String,
    pub image_id: Option<Uuid>,
    /// Recipes owned by this user, oldest first.
    pub recipes: Vec<RecipeResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub username: String,
    pub bio: String,
    pub email: String,
    pub image_id: Option<Uuid>,
    /// Replacement bearer token reflecting the updated claims.
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdateResponse {
    pub user: AuthenticatedUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
