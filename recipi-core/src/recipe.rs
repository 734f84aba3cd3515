use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::ValidationErrors;
use crate::tags::validate_tags;

/// Longest prep or cook time accepted, in minutes (one week).
pub const MAX_MINUTES: u32 = 60 * 24 * 7;
pub const MAX_SERVINGS: u32 = 1000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("difficulty must be one of easy, medium, hard (got {0:?})")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Everything a user can author about a recipe, minus the image.
///
/// This is what the form controller submits. Times are in minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFields {
    pub name: String,
    pub description: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub difficulty: Difficulty,
    pub servings: Option<u32>,
    pub notes: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
}

impl RecipeFields {
    /// Check the completeness rules a new recipe must satisfy.
    pub fn check_complete(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name should not be empty");
        }
        if self.description.trim().is_empty() {
            errors.push("description should not be empty");
        }
        if self.prep_time == 0 {
            errors.push("prepTime must be greater than 0");
        }
        if self.ingredients.is_empty() {
            errors.push("ingredients should not be empty");
        }
        if self.steps.is_empty() {
            errors.push("steps should not be empty");
        }
        if self.tags.is_empty() {
            errors.push("tags should not be empty");
        }
        errors.extend(check_bounds(
            Some(self.prep_time),
            Some(self.cook_time),
            self.servings,
        ));
        errors.extend(validate_tags(&self.tags));

        errors.into_result()
    }

    /// The fields that differ from `base`, as a patch. Fields equal to
    /// `base` are left out and stay unchanged on the server.
    pub fn changes_from(&self, base: &RecipeFields) -> RecipePatch {
        fn changed<T: PartialEq + Clone>(value: &T, base: &T) -> Option<T> {
            (value != base).then(|| value.clone())
        }

        RecipePatch {
            name: changed(&self.name, &base.name),
            description: changed(&self.description, &base.description),
            prep_time: changed(&self.prep_time, &base.prep_time),
            cook_time: changed(&self.cook_time, &base.cook_time),
            difficulty: changed(&self.difficulty, &base.difficulty),
            servings: changed(&self.servings, &base.servings).flatten(),
            notes: changed(&self.notes, &base.notes).flatten(),
            ingredients: changed(&self.ingredients, &base.ingredients),
            steps: changed(&self.steps, &base.steps),
            tags: changed(&self.tags, &base.tags),
        }
    }
}

/// A partial recipe as decoded from a write request. `None` means the field
/// was absent (or blank) and should be left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub servings: Option<u32>,
    pub notes: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        *self == RecipePatch::default()
    }

    /// Validate only the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.extend(check_bounds(self.prep_time, self.cook_time, self.servings));
        if self.prep_time == Some(0) {
            errors.push("prepTime must be greater than 0");
        }
        if let Some(tags) = &self.tags {
            errors.extend(validate_tags(tags));
        }

        errors.into_result()
    }

    /// Promote a patch to a full recipe for creation.
    ///
    /// Cook time defaults to zero; servings and notes stay optional. Every
    /// other field is required.
    pub fn into_fields(self) -> Result<RecipeFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.difficulty.is_none() {
            errors.push("difficulty should not be empty");
        }

        let fields = RecipeFields {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            prep_time: self.prep_time.unwrap_or_default(),
            cook_time: self.cook_time.unwrap_or_default(),
            difficulty: self.difficulty.unwrap_or_default(),
            servings: self.servings,
            notes: self.notes,
            ingredients: self.ingredients.unwrap_or_default(),
            steps: self.steps.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
        };

        if let Err(e) = fields.check_complete() {
            errors.extend(e.0);
        }
        errors.into_result()?;
        Ok(fields)
    }
}

fn check_bounds(prep: Option<u32>, cook: Option<u32>, servings: Option<u32>) -> Vec<String> {
    let mut errors = Vec::new();
    if prep.is_some_and(|m| m > MAX_MINUTES) {
        errors.push(format!("prepTime must not exceed {} minutes", MAX_MINUTES));
    }
    if cook.is_some_and(|m| m > MAX_MINUTES) {
        errors.push(format!("cookTime must not exceed {} minutes", MAX_MINUTES));
    }
    if servings.is_some_and(|s| s > MAX_SERVINGS) {
        errors.push(format!("servings must not exceed {}", MAX_SERVINGS));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RecipeFields {
        RecipeFields {
            name: "Chili Verde".to_string(),
            description: "Pork in tomatillo sauce".to_string(),
            prep_time: 20,
            cook_time: 120,
            difficulty: Difficulty::Medium,
            servings: Some(6),
            notes: None,
            ingredients: vec!["2 lb pork shoulder".to_string()],
            steps: vec!["Brown the pork".to_string()],
            tags: vec!["mexican".to_string()],
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("extreme".parse::<Difficulty>().is_err());
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse(), Ok(difficulty));
        }
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"medium\""
        );
    }

    #[test]
    fn test_complete_recipe_passes() {
        assert!(complete().check_complete().is_ok());
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = RecipeFields::default().check_complete().unwrap_err();
        assert_eq!(errors.messages().len(), 6);
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let mut fields = complete();
        fields.name = "   ".to_string();
        let errors = fields.check_complete().unwrap_err();
        assert_eq!(errors.messages(), ["name should not be empty"]);
    }

    #[test]
    fn test_patch_into_fields_requires_difficulty() {
        let patch = RecipePatch {
            name: Some("Soup".to_string()),
            description: Some("Warm".to_string()),
            prep_time: Some(5),
            ingredients: Some(vec!["water".to_string()]),
            steps: Some(vec!["boil".to_string()]),
            tags: Some(vec!["easy".to_string()]),
            ..Default::default()
        };
        let errors = patch.clone().into_fields().unwrap_err();
        assert_eq!(errors.messages(), ["difficulty should not be empty"]);

        let fields = RecipePatch {
            difficulty: Some(Difficulty::Easy),
            ..patch
        }
        .into_fields()
        .unwrap();
        assert_eq!(fields.cook_time, 0);
    }

    #[test]
    fn test_changes_from_keeps_only_edited_fields() {
        let stored = complete();
        let mut edited = stored.clone();
        edited.name = "Chili Verde, Fast".to_string();
        edited.tags.push("stew".to_string());

        let patch = edited.changes_from(&stored);

        assert_eq!(
            patch,
            RecipePatch {
                name: Some("Chili Verde, Fast".to_string()),
                tags: Some(vec!["mexican".to_string(), "stew".to_string()]),
                ..Default::default()
            }
        );
        assert!(stored.changes_from(&stored).is_empty());
    }

    #[test]
    fn test_changes_from_blank_form_skips_defaults() {
        let edited = RecipeFields {
            prep_time: 10,
            ..Default::default()
        };

        let patch = edited.changes_from(&RecipeFields::default());

        assert_eq!(patch.prep_time, Some(10));
        assert_eq!(patch.cook_time, None);
        assert_eq!(patch.difficulty, None);
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        assert!(RecipePatch::default().validate().is_ok());

        let patch = RecipePatch {
            tags: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            cook_time: Some(MAX_MINUTES + 1),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err().messages().len(), 2);
    }
}
