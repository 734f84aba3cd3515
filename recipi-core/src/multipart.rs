//! The `multipart/form-data` field contract for recipe and profile writes.
//!
//! Recipe writes carry `file`, `name`, `description`, `prepTime`, `cookTime`,
//! `difficulty`, `servings`, `notes`, a JSON-encoded `ingredients` array,
//! and indexed `steps[i]` / `tags[i]` fields. Older clients send
//! `ingredients[i]` fields instead of the JSON array; both decode the same.
//!
//! On decode, blank values count as absent so that a partially filled edit
//! form leaves the untouched fields alone.

use std::collections::BTreeMap;

use crate::error::ValidationErrors;
use crate::ingredients;
use crate::profile::ProfilePatch;
use crate::recipe::{RecipeFields, RecipePatch};

pub const FILE: &str = "file";
pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const PREP_TIME: &str = "prepTime";
pub const COOK_TIME: &str = "cookTime";
pub const DIFFICULTY: &str = "difficulty";
pub const SERVINGS: &str = "servings";
pub const NOTES: &str = "notes";
pub const INGREDIENTS: &str = "ingredients";
pub const STEPS: &str = "steps";
pub const TAGS: &str = "tags";

pub const USERNAME: &str = "username";
pub const BIO: &str = "bio";
pub const EMAIL: &str = "email";

/// Text parts for a recipe write, in submission order. The image, if any, is
/// sent separately under [`FILE`].
pub fn recipe_parts(fields: &RecipeFields) -> Vec<(String, String)> {
    let mut parts = vec![
        (NAME.to_string(), fields.name.clone()),
        (DESCRIPTION.to_string(), fields.description.clone()),
        (PREP_TIME.to_string(), fields.prep_time.to_string()),
        (COOK_TIME.to_string(), fields.cook_time.to_string()),
        (DIFFICULTY.to_string(), fields.difficulty.to_string()),
        (
            SERVINGS.to_string(),
            fields.servings.map(|s| s.to_string()).unwrap_or_default(),
        ),
        (NOTES.to_string(), fields.notes.clone().unwrap_or_default()),
        (INGREDIENTS.to_string(), ingredients::encode(&fields.ingredients)),
    ];

    push_indexed(&mut parts, STEPS, &fields.steps);
    push_indexed(&mut parts, TAGS, &fields.tags);

    parts
}

/// Text parts for a partial recipe write: only the fields present in the
/// patch, so the server leaves the rest unchanged.
pub fn patch_parts(patch: &RecipePatch) -> Vec<(String, String)> {
    let mut parts: Vec<(String, String)> = [
        (NAME, patch.name.clone()),
        (DESCRIPTION, patch.description.clone()),
        (PREP_TIME, patch.prep_time.map(|m| m.to_string())),
        (COOK_TIME, patch.cook_time.map(|m| m.to_string())),
        (DIFFICULTY, patch.difficulty.map(|d| d.to_string())),
        (SERVINGS, patch.servings.map(|s| s.to_string())),
        (NOTES, patch.notes.clone()),
        (INGREDIENTS, patch.ingredients.as_deref().map(ingredients::encode)),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
    .collect();

    if let Some(steps) = &patch.steps {
        push_indexed(&mut parts, STEPS, steps);
    }
    if let Some(tags) = &patch.tags {
        push_indexed(&mut parts, TAGS, tags);
    }

    parts
}

fn push_indexed(parts: &mut Vec<(String, String)>, base: &str, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        parts.push((format!("{}[{}]", base, i), item.clone()));
    }
}

/// Decode the text parts of a recipe write. Unknown fields are ignored.
pub fn parse_recipe_parts<I, K, V>(parts: I) -> Result<RecipePatch, ValidationErrors>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut errors = ValidationErrors::new();
    let mut patch = RecipePatch::default();
    let mut json_ingredients: Option<Vec<String>> = None;
    let mut indexed_ingredients = IndexedList::default();
    let mut steps = IndexedList::default();
    let mut tags = IndexedList::default();

    for (key, value) in parts {
        let key = key.as_ref();
        let value: String = value.into();

        match key {
            NAME => patch.name = non_blank(value),
            DESCRIPTION => patch.description = non_blank(value),
            NOTES => patch.notes = non_blank(value),
            PREP_TIME => patch.prep_time = parse_number(PREP_TIME, &value, &mut errors),
            COOK_TIME => patch.cook_time = parse_number(COOK_TIME, &value, &mut errors),
            SERVINGS => patch.servings = parse_number(SERVINGS, &value, &mut errors),
            DIFFICULTY => {
                if let Some(value) = non_blank(value) {
                    match value.parse() {
                        Ok(d) => patch.difficulty = Some(d),
                        Err(e) => errors.push(e.to_string()),
                    }
                }
            }
            INGREDIENTS => match ingredients::decode(&value) {
                Ok(list) => json_ingredients = Some(list),
                Err(e) => errors.push(e.to_string()),
            },
            _ => {
                if let Some((base, index)) = split_indexed(key) {
                    let list = match base {
                        INGREDIENTS => &mut indexed_ingredients,
                        STEPS => &mut steps,
                        TAGS => &mut tags,
                        _ => continue,
                    };
                    list.insert(index, value);
                }
            }
        }
    }

    errors.into_result()?;

    patch.ingredients = json_ingredients
        .filter(|list| !list.is_empty())
        .or_else(|| indexed_ingredients.into_list());
    patch.steps = steps.into_list();
    patch.tags = tags.into_list();

    Ok(patch)
}

/// Text parts for a profile write: only the fields present in the patch.
pub fn profile_parts(patch: &ProfilePatch) -> Vec<(String, String)> {
    [
        (USERNAME, &patch.username),
        (BIO, &patch.bio),
        (EMAIL, &patch.email),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
    .collect()
}

/// Decode the text parts of a profile write. The image is filled in by the
/// caller from the [`FILE`] part.
pub fn parse_profile_parts<I, K, V>(parts: I) -> ProfilePatch
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut patch = ProfilePatch::default();
    for (key, value) in parts {
        let value = non_blank(value.into());
        match key.as_ref() {
            USERNAME => patch.username = value.map(|v| v.trim().to_string()),
            BIO => patch.bio = value,
            EMAIL => patch.email = value.map(|v| v.trim().to_string()),
            _ => {}
        }
    }
    patch
}

/// Values collected from `name[i]` and `name[]` fields.
#[derive(Default)]
struct IndexedList {
    indexed: BTreeMap<usize, String>,
    appended: Vec<String>,
}

impl IndexedList {
    fn insert(&mut self, index: Option<usize>, value: String) {
        if value.trim().is_empty() {
            return;
        }
        match index {
            Some(i) => {
                self.indexed.insert(i, value);
            }
            None => self.appended.push(value),
        }
    }

    fn into_list(self) -> Option<Vec<String>> {
        let list: Vec<String> = self.indexed.into_values().chain(self.appended).collect();
        if list.is_empty() {
            None
        } else {
            Some(list)
        }
    }
}

/// "steps[2]" -> ("steps", Some(2)); "steps[]" -> ("steps", None)
fn split_indexed(key: &str) -> Option<(&str, Option<usize>)> {
    let (base, rest) = key.split_once('[')?;
    let inner = rest.strip_suffix(']')?;
    if inner.is_empty() {
        return Some((base, None));
    }
    inner.parse().ok().map(|i| (base, Some(i)))
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_number(field: &str, value: &str, errors: &mut ValidationErrors) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(format!("{} must be a non-negative integer", field));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Difficulty;

    #[test]
    fn test_split_indexed() {
        assert_eq!(split_indexed("steps[2]"), Some(("steps", Some(2))));
        assert_eq!(split_indexed("tags[]"), Some(("tags", None)));
        assert_eq!(split_indexed("tags[x]"), None);
        assert_eq!(split_indexed("tags"), None);
    }

    #[test]
    fn test_indexed_fields_sorted_by_index() {
        let patch = parse_recipe_parts([
            ("steps[1]", "Simmer"),
            ("steps[0]", "Brown the pork"),
            ("steps[10]", "Serve"),
        ])
        .unwrap();
        assert_eq!(
            patch.steps.unwrap(),
            vec!["Brown the pork", "Simmer", "Serve"]
        );
    }

    #[test]
    fn test_blank_values_are_absent() {
        let patch = parse_recipe_parts([
            ("name", "  "),
            ("prepTime", ""),
            ("difficulty", ""),
            ("ingredients", "[]"),
            ("notes", ""),
        ])
        .unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_indexed_ingredients_accepted() {
        let patch = parse_recipe_parts([
            ("ingredients[0]", "2 cups flour"),
            ("ingredients[1]", "1 egg"),
        ])
        .unwrap();
        assert_eq!(patch.ingredients.unwrap(), vec!["2 cups flour", "1 egg"]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let patch = parse_recipe_parts([("instructions[]", "osman"), ("name", "Soup")]).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Soup"));
        assert!(patch.steps.is_none());
    }

    #[test]
    fn test_bad_values_reported() {
        let errors = parse_recipe_parts([
            ("prepTime", "ten"),
            ("difficulty", "extreme"),
            ("ingredients", "flour"),
        ])
        .unwrap_err();
        assert_eq!(errors.messages().len(), 3);
    }

    #[test]
    fn test_difficulty_parsed() {
        let patch = parse_recipe_parts([("difficulty", "hard")]).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn test_patch_parts_only_present_fields() {
        let patch = RecipePatch {
            name: Some("Chili Verde, Fast".to_string()),
            prep_time: Some(10),
            tags: Some(vec!["mexican".to_string()]),
            ..Default::default()
        };

        let parts = patch_parts(&patch);

        assert_eq!(
            parts,
            vec![
                ("name".to_string(), "Chili Verde, Fast".to_string()),
                ("prepTime".to_string(), "10".to_string()),
                ("tags[0]".to_string(), "mexican".to_string()),
            ]
        );
        assert_eq!(parse_recipe_parts(parts).unwrap(), patch);
    }

    #[test]
    fn test_profile_parts_only_present_fields() {
        let patch = ProfilePatch {
            bio: Some("I cook".to_string()),
            ..Default::default()
        };
        assert_eq!(
            profile_parts(&patch),
            vec![("bio".to_string(), "I cook".to_string())]
        );
    }

    #[test]
    fn test_parse_profile_parts_trims_identity_fields() {
        let patch = parse_profile_parts([
            ("username", " chef "),
            ("email", ""),
            ("bio", "  spaced bio "),
        ]);
        assert_eq!(patch.username.as_deref(), Some("chef"));
        assert_eq!(patch.email, None);
        assert_eq!(patch.bio.as_deref(), Some("  spaced bio "));
    }
}
