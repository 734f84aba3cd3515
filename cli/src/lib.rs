//! Client side of Recipi: the HTTP gateway, the session, and the controllers
//! that own recipe-form and profile state.

pub mod api;
pub mod navigation;
pub mod profile;
pub mod recipe_form;
pub mod session;

pub use api::{ApiError, ApiResult, HttpApi, MockApi, RecipeUpload, RecipiApi};
pub use navigation::Navigation;
pub use profile::{ProfileController, ProfileState, ProfileUpdateError};
pub use recipe_form::{FormMode, FormState, FormWarning, RecipeForm, RecipeFormController, SubmitError};
pub use session::{Session, SessionError, SessionStore};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use recipi_core::{Claims, Difficulty, RecipeResponse, RecipeStep};

    /// A signed token for `username` expiring `hours` from now (negative for
    /// the past). The client never checks the signature.
    pub fn token_for(username: &str, hours: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + hours * 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-server-secret"),
        )
        .unwrap()
    }

    pub fn chili_verde() -> RecipeResponse {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        RecipeResponse {
            slug: "chili-verde".to_string(),
            name: "Chili Verde".to_string(),
            description: "Pork shoulder braised in tomatillo salsa".to_string(),
            prep_time: 25,
            cook_time: 150,
            difficulty: Difficulty::Medium,
            servings: Some(6),
            notes: Some("Better the next day".to_string()),
            ingredients: r#"["3 lb pork shoulder","1 lb tomatillos","2 poblano peppers"]"#
                .to_string(),
            steps: vec![
                RecipeStep {
                    position: 1,
                    instruction: "Roast the tomatillos and peppers".to_string(),
                },
                RecipeStep {
                    position: 2,
                    instruction: "Brown the pork".to_string(),
                },
            ],
            tags: vec!["mexican".to_string(), "spicy".to_string()],
            image_id: None,
            author: "osman".to_string(),
            created_at: created,
            updated_at: created,
        }
    }
}
