pub mod claims;
pub mod error;
pub mod image;
pub mod ingredients;
pub mod multipart;
pub mod profile;
pub mod recipe;
pub mod slug;
pub mod tags;
pub mod types;

pub use claims::{decode_unverified, Claims, TokenError};
pub use error::ValidationErrors;
pub use image::ImageFile;
pub use profile::ProfilePatch;
pub use recipe::{Difficulty, ParseDifficultyError, RecipeFields, RecipePatch};
pub use tags::TagError;
pub use types::{
    AuthenticatedUser, ErrorResponse, LoginRequest, ProfileResponse, ProfileUpdateResponse,
    RecipeResponse, RecipeStep, SignupRequest, TokenResponse,
};
