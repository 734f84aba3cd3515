//! Talking to the Recipi server.
//!
//! [`RecipiApi`] is the seam the controllers depend on. [`HttpApi`] is the
//! real implementation; [`MockApi`] keeps everything in memory and records
//! each call for tests.

mod http;
mod mock;

pub use http::HttpApi;
pub use mock::{Call, MockApi};

use async_trait::async_trait;
use recipi_core::multipart::{patch_parts, recipe_parts};
use recipi_core::{
    ErrorResponse, ImageFile, LoginRequest, ProfilePatch, ProfileResponse, ProfileUpdateResponse,
    RecipeFields, RecipePatch, RecipeResponse, SignupRequest, TokenResponse,
};
use thiserror::Error;

/// Errors from a call to the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response, or the response body was unreadable.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}{}", .body.as_ref().map(|b| format!(": {}", b.message())).unwrap_or_default())]
    Status {
        status: u16,
        body: Option<ErrorResponse>,
    },

    /// The response was well-formed JSON but its content was not usable.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The call needs a bearer token and the session has none.
    #[error("Not signed in")]
    Unauthenticated,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message the server gave, preferring the first validation detail.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => Some(body.message()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A recipe write: the multipart text fields plus the optional image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeUpload {
    pub fields: Vec<(String, String)>,
    pub image: Option<ImageFile>,
}

impl RecipeUpload {
    pub fn new(fields: &RecipeFields, image: Option<ImageFile>) -> Self {
        Self {
            fields: recipe_parts(fields),
            image,
        }
    }

    /// An edit carrying only the fields in `patch`.
    pub fn from_patch(patch: &RecipePatch, image: Option<ImageFile>) -> Self {
        Self {
            fields: patch_parts(patch),
            image,
        }
    }

    /// Value of the first text field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The Recipi REST API as seen by a client.
#[async_trait]
pub trait RecipiApi: Send + Sync {
    async fn list_recipes(&self) -> ApiResult<Vec<RecipeResponse>>;

    async fn get_recipe(&self, slug: &str) -> ApiResult<RecipeResponse>;

    async fn create_recipe(&self, token: &str, upload: RecipeUpload) -> ApiResult<RecipeResponse>;

    async fn update_recipe(
        &self,
        token: &str,
        slug: &str,
        upload: RecipeUpload,
    ) -> ApiResult<RecipeResponse>;

    async fn delete_recipe(&self, token: &str, slug: &str) -> ApiResult<()>;

    async fn get_profile(&self, username: &str) -> ApiResult<ProfileResponse>;

    /// Sends only the fields present in `patch`.
    async fn update_profile(
        &self,
        token: &str,
        patch: ProfilePatch,
    ) -> ApiResult<ProfileUpdateResponse>;

    async fn delete_profile(&self, token: &str) -> ApiResult<()>;

    async fn signup(&self, request: SignupRequest) -> ApiResult<TokenResponse>;

    async fn login(&self, request: LoginRequest) -> ApiResult<TokenResponse>;
}
