//! Authoring and editing a recipe.
//!
//! [`RecipeFormController`] owns the form while the user fills it in: the
//! field values, the draft text of the ingredient, instruction and tag inputs,
//! and the submission state. List edits that break a rule are refused with a
//! [`FormWarning`] and leave the form untouched.

use std::mem;
use std::sync::Arc;

use recipi_core::tags::{check_delete_tag, check_new_tag};
use recipi_core::{ingredients, ImageFile, RecipeFields, RecipeResponse, TagError};
use thiserror::Error;

use crate::api::{ApiError, RecipeUpload, RecipiApi};
use crate::navigation::Navigation;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the recipe stored under `slug`.
    Edit { slug: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Editing,
    Submitting,
    Finished,
}

/// A refused form edit. The message is shown to the user as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormWarning {
    #[error("No ingredient")]
    NoIngredient,
    #[error("No instruction")]
    NoInstruction,
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error("Please fill in all fields")]
    Incomplete,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    /// Refused locally; nothing was sent.
    #[error(transparent)]
    Warning(#[from] FormWarning),

    #[error("This form has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Field values plus the text currently typed into the list inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeForm {
    pub fields: RecipeFields,
    pub image: Option<ImageFile>,
    pub ingredient_draft: String,
    pub instruction_draft: String,
    pub tag_draft: String,
}

impl RecipeForm {
    fn populate(&mut self, recipe: RecipeResponse) -> Result<(), ApiError> {
        let ingredients = ingredients::decode(&recipe.ingredients)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.fields = RecipeFields {
            name: recipe.name,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            difficulty: recipe.difficulty,
            servings: recipe.servings,
            notes: recipe.notes,
            ingredients,
            steps: recipe.steps.into_iter().map(|s| s.instruction).collect(),
            tags: recipe.tags,
        };
        Ok(())
    }
}

pub struct RecipeFormController {
    api: Arc<dyn RecipiApi>,
    session: Session,
    mode: FormMode,
    state: FormState,
    form: RecipeForm,
    /// Field values as last loaded from the server. Edits send only what
    /// differs from these.
    loaded: RecipeFields,
    navigation: Option<Navigation>,
}

impl RecipeFormController {
    pub fn new(api: Arc<dyn RecipiApi>, session: Session, mode: FormMode) -> Self {
        Self {
            api,
            session,
            mode,
            state: FormState::Idle,
            form: RecipeForm::default(),
            loaded: RecipeFields::default(),
            navigation: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn form(&self) -> &RecipeForm {
        &self.form
    }

    /// Direct access to the field values and drafts.
    pub fn form_mut(&mut self) -> &mut RecipeForm {
        self.touch();
        &mut self.form
    }

    /// Where to go once the form is finished.
    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    fn touch(&mut self) {
        if self.state == FormState::Idle {
            self.state = FormState::Editing;
        }
    }

    /// Fetch `slug` and fill the form with it, switching to edit mode. On
    /// failure the form is left exactly as it was.
    pub async fn load_for_edit(&mut self, slug: &str) -> Result<(), ApiError> {
        let recipe = self.api.get_recipe(slug).await?;
        let fetched_slug = recipe.slug.clone();

        let mut form = self.form.clone();
        form.populate(recipe)?;

        self.loaded = form.fields.clone();
        self.form = form;
        self.mode = FormMode::Edit { slug: fetched_slug };
        self.touch();
        Ok(())
    }

    pub fn add_ingredient(&mut self) -> Result<(), FormWarning> {
        self.touch();
        if self.form.ingredient_draft.trim().is_empty() {
            return Err(FormWarning::NoIngredient);
        }
        let ingredient = mem::take(&mut self.form.ingredient_draft);
        self.form.fields.ingredients.push(ingredient);
        Ok(())
    }

    /// Out-of-range indexes are ignored.
    pub fn remove_ingredient(&mut self, index: usize) {
        self.touch();
        if index < self.form.fields.ingredients.len() {
            self.form.fields.ingredients.remove(index);
        }
    }

    pub fn add_instruction(&mut self) -> Result<(), FormWarning> {
        self.touch();
        if self.form.instruction_draft.trim().is_empty() {
            return Err(FormWarning::NoInstruction);
        }
        let instruction = mem::take(&mut self.form.instruction_draft);
        self.form.fields.steps.push(instruction);
        Ok(())
    }

    pub fn remove_last_instruction(&mut self) {
        self.touch();
        self.form.fields.steps.pop();
    }

    pub fn add_tag(&mut self) -> Result<(), FormWarning> {
        self.touch();
        let tag = check_new_tag(&self.form.fields.tags, &self.form.tag_draft)?;
        self.form.fields.tags.push(tag);
        self.form.tag_draft.clear();
        Ok(())
    }

    pub fn delete_tag(&mut self, index: usize) -> Result<(), FormWarning> {
        self.touch();
        check_delete_tag(&self.form.fields.tags)?;
        if index < self.form.fields.tags.len() {
            self.form.fields.tags.remove(index);
        }
        Ok(())
    }

    /// Send the form. New recipes must be complete; edits send only the fields
    /// changed since the recipe was loaded and the server leaves the rest
    /// unchanged.
    ///
    /// Once a request has been made the form is finished and navigates home,
    /// whether or not the server accepted it.
    pub async fn submit(&mut self) -> Result<RecipeResponse, SubmitError> {
        if matches!(self.state, FormState::Submitting | FormState::Finished) {
            return Err(SubmitError::AlreadySubmitted);
        }

        if self.mode == FormMode::Create && self.form.fields.check_complete().is_err() {
            return Err(FormWarning::Incomplete.into());
        }

        let token = self.session.require_token()?.to_string();
        let image = self.form.image.clone();
        let upload = match &self.mode {
            FormMode::Create => RecipeUpload::new(&self.form.fields, image),
            FormMode::Edit { .. } => {
                RecipeUpload::from_patch(&self.form.fields.changes_from(&self.loaded), image)
            }
        };

        self.state = FormState::Submitting;
        let result = match &self.mode {
            FormMode::Create => self.api.create_recipe(&token, upload).await,
            FormMode::Edit { slug } => self.api.update_recipe(&token, slug, upload).await,
        };
        self.state = FormState::Finished;
        self.navigation = Some(Navigation::Home);

        if let Err(e) = &result {
            tracing::warn!(error = %e, "recipe submission failed");
        }
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Call, MockApi};
    use crate::test_support::{chili_verde, token_for};
    use recipi_core::multipart::{COOK_TIME, DIFFICULTY, INGREDIENTS, NAME, PREP_TIME, SERVINGS};
    use recipi_core::{Difficulty, ErrorResponse};

    fn session() -> Session {
        Session::new("http://localhost:3000").with_token(token_for("osman", 1))
    }

    fn controller(mode: FormMode) -> (Arc<MockApi>, RecipeFormController) {
        let api = Arc::new(MockApi::new());
        let controller = RecipeFormController::new(api.clone(), session(), mode);
        (api, controller)
    }

    fn with_tags(controller: &mut RecipeFormController, tags: &[&str]) {
        controller.form_mut().fields.tags = tags.iter().map(|t| t.to_string()).collect();
    }

    fn fill_complete(controller: &mut RecipeFormController) {
        let form = controller.form_mut();
        form.fields.name = "Chili Verde".to_string();
        form.fields.description = "Pork shoulder braised in tomatillo salsa".to_string();
        form.fields.prep_time = 25;
        form.fields.cook_time = 150;
        form.fields.difficulty = Difficulty::Medium;
        form.fields.ingredients = vec!["3 lb pork shoulder".to_string()];
        form.fields.steps = vec!["Brown the pork".to_string()];
        form.fields.tags = vec!["mexican".to_string()];
    }

    #[test]
    fn test_add_ingredient_clears_draft() {
        let (_, mut c) = controller(FormMode::Create);
        c.form_mut().ingredient_draft = "2 cups flour".to_string();

        c.add_ingredient().unwrap();

        assert_eq!(c.form().fields.ingredients, vec!["2 cups flour"]);
        assert_eq!(c.form().ingredient_draft, "");
        assert_eq!(c.state(), FormState::Editing);
    }

    #[test]
    fn test_blank_entries_refused() {
        let (_, mut c) = controller(FormMode::Create);

        c.form_mut().ingredient_draft = "   ".to_string();
        assert_eq!(c.add_ingredient(), Err(FormWarning::NoIngredient));
        assert!(c.form().fields.ingredients.is_empty());

        c.form_mut().instruction_draft = "\t".to_string();
        assert_eq!(c.add_instruction(), Err(FormWarning::NoInstruction));
        assert!(c.form().fields.steps.is_empty());

        c.form_mut().tag_draft = "  ".to_string();
        assert_eq!(c.add_tag(), Err(FormWarning::Tag(TagError::Empty)));
        assert!(c.form().fields.tags.is_empty());
    }

    #[test]
    fn test_remove_ingredient_out_of_range_ignored() {
        let (_, mut c) = controller(FormMode::Create);
        c.form_mut().fields.ingredients = vec!["salt".to_string(), "pepper".to_string()];

        c.remove_ingredient(5);
        assert_eq!(c.form().fields.ingredients.len(), 2);

        c.remove_ingredient(0);
        assert_eq!(c.form().fields.ingredients, vec!["pepper"]);
    }

    #[test]
    fn test_instructions_append_and_pop() {
        let (_, mut c) = controller(FormMode::Create);

        c.remove_last_instruction();
        assert!(c.form().fields.steps.is_empty());

        for step in ["Roast", "Braise"] {
            c.form_mut().instruction_draft = step.to_string();
            c.add_instruction().unwrap();
        }
        c.remove_last_instruction();

        assert_eq!(c.form().fields.steps, vec!["Roast"]);
    }

    #[test]
    fn test_duplicate_tag_refused() {
        let (_, mut c) = controller(FormMode::Create);
        with_tags(&mut c, &["mexican", "spicy"]);
        c.form_mut().tag_draft = "mexican".to_string();

        let warning = c.add_tag().unwrap_err();

        assert_eq!(warning.to_string(), "Tag already exists");
        assert_eq!(c.form().fields.tags, vec!["mexican", "spicy"]);
    }

    #[test]
    fn test_tag_limits() {
        let (_, mut c) = controller(FormMode::Create);
        with_tags(&mut c, &["a", "b"]);

        c.form_mut().tag_draft = "an-extremely-long-tag".to_string();
        assert_eq!(c.add_tag().unwrap_err().to_string(), "Tag must be 15 characters or fewer");

        c.form_mut().tag_draft = " c ".to_string();
        c.add_tag().unwrap();
        assert_eq!(c.form().fields.tags, vec!["a", "b", "c"]);
        assert_eq!(c.form().tag_draft, "");

        c.form_mut().tag_draft = "d".to_string();
        assert_eq!(c.add_tag().unwrap_err().to_string(), "Maximum of 3 tags");
        assert_eq!(c.form().fields.tags.len(), 3);
    }

    #[test]
    fn test_tag_set_stays_bounded_and_unique() {
        let (_, mut c) = controller(FormMode::Create);
        for raw in ["x", "y", "x", "", "z", "w", "y", "v"] {
            c.form_mut().tag_draft = raw.to_string();
            let _ = c.add_tag();

            let tags = &c.form().fields.tags;
            assert!(tags.len() <= 3);
            let mut unique = tags.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), tags.len());
        }
        assert_eq!(c.form().fields.tags, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_last_tag_cannot_be_deleted() {
        let (_, mut c) = controller(FormMode::Create);
        with_tags(&mut c, &["mexican"]);

        let warning = c.delete_tag(0).unwrap_err();

        assert_eq!(warning.to_string(), "Recipe must have at least one tag");
        assert_eq!(c.form().fields.tags, vec!["mexican"]);
    }

    #[test]
    fn test_delete_tag_by_index() {
        let (_, mut c) = controller(FormMode::Create);
        with_tags(&mut c, &["mexican", "spicy", "stew"]);

        c.delete_tag(1).unwrap();
        assert_eq!(c.form().fields.tags, vec!["mexican", "stew"]);
    }

    #[tokio::test]
    async fn test_incomplete_create_sends_nothing() {
        let (api, mut c) = controller(FormMode::Create);
        fill_complete(&mut c);
        c.form_mut().fields.description.clear();

        let err = c.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Warning(FormWarning::Incomplete)));
        assert_eq!(err.to_string(), "Please fill in all fields");
        assert!(api.calls().await.is_empty());
        assert_eq!(c.state(), FormState::Editing);
        assert_eq!(c.navigation(), None);
    }

    #[tokio::test]
    async fn test_each_required_field_checked() {
        let clears: [fn(&mut RecipeForm); 6] = [
            |f| f.fields.name = " ".to_string(),
            |f| f.fields.prep_time = 0,
            |f| f.fields.ingredients.clear(),
            |f| f.fields.steps.clear(),
            |f| f.fields.tags.clear(),
            |f| f.fields.description.clear(),
        ];
        for clear in clears {
            let (api, mut c) = controller(FormMode::Create);
            fill_complete(&mut c);
            clear(c.form_mut());

            assert!(c.submit().await.is_err());
            assert!(api.calls().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_create_submits_and_goes_home() {
        let (api, mut c) = controller(FormMode::Create);
        fill_complete(&mut c);

        let recipe = c.submit().await.unwrap();

        assert_eq!(recipe.slug, "chili-verde");
        assert_eq!(c.state(), FormState::Finished);
        assert!(!c.is_loading());
        assert_eq!(c.navigation(), Some(&Navigation::Home));

        let calls = api.calls().await;
        let Call::CreateRecipe { token, upload } = &calls[0] else {
            panic!("expected a create call, got {:?}", calls);
        };
        assert_eq!(recipi_core::decode_unverified(token).unwrap().username, "osman");
        assert_eq!(upload.field(NAME), Some("Chili Verde"));
        assert_eq!(upload.field(INGREDIENTS), Some(r#"["3 lb pork shoulder"]"#));
    }

    #[tokio::test]
    async fn test_second_submit_refused() {
        let (api, mut c) = controller(FormMode::Create);
        fill_complete(&mut c);
        c.submit().await.unwrap();

        assert!(matches!(
            c.submit().await,
            Err(SubmitError::AlreadySubmitted)
        ));
        assert_eq!(api.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_session_token() {
        let api = Arc::new(MockApi::new());
        let mut c = RecipeFormController::new(
            api.clone(),
            Session::new("http://localhost:3000"),
            FormMode::Create,
        );
        fill_complete(&mut c);

        assert!(matches!(
            c.submit().await,
            Err(SubmitError::Api(ApiError::Unauthenticated))
        ));
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_surfaced_and_still_finishes() {
        let (api, mut c) = controller(FormMode::Create);
        fill_complete(&mut c);
        api.fail_with(500, ErrorResponse::new("Internal server error"))
            .await;

        let err = c.submit().await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Api(ApiError::Status { status: 500, .. })
        ));
        assert_eq!(c.state(), FormState::Finished);
        assert_eq!(c.navigation(), Some(&Navigation::Home));
    }

    #[tokio::test]
    async fn test_load_for_edit_populates_fields() {
        let (api, mut c) = controller(FormMode::Create);
        api.insert_recipe(chili_verde()).await;

        c.load_for_edit("chili-verde").await.unwrap();

        let fields = &c.form().fields;
        assert_eq!(fields.name, "Chili Verde");
        assert_eq!(fields.description, "Pork shoulder braised in tomatillo salsa");
        assert_eq!(fields.prep_time, 25);
        assert_eq!(fields.cook_time, 150);
        assert_eq!(fields.difficulty, Difficulty::Medium);
        assert_eq!(
            fields.ingredients,
            vec!["3 lb pork shoulder", "1 lb tomatillos", "2 poblano peppers"]
        );
        assert_eq!(
            fields.steps,
            vec!["Roast the tomatillos and peppers", "Brown the pork"]
        );
        assert_eq!(fields.tags, vec!["mexican", "spicy"]);
        assert_eq!(fields.servings, Some(6));
        assert_eq!(fields.notes.as_deref(), Some("Better the next day"));
        assert_eq!(
            c.mode(),
            &FormMode::Edit {
                slug: "chili-verde".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_load_leaves_form_unchanged() {
        let (_, mut c) = controller(FormMode::Create);
        c.form_mut().fields.name = "Draft".to_string();
        let before = c.form().clone();

        let err = c.load_for_edit("missing").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(c.form(), &before);
        assert_eq!(c.mode(), &FormMode::Create);
    }

    #[tokio::test]
    async fn test_undecodable_ingredients_leave_form_unchanged() {
        let (api, mut c) = controller(FormMode::Create);
        let mut recipe = chili_verde();
        recipe.ingredients = "pork, tomatillos".to_string();
        api.insert_recipe(recipe).await;

        assert!(matches!(
            c.load_for_edit("chili-verde").await,
            Err(ApiError::Decode(_))
        ));
        assert_eq!(c.form(), &RecipeForm::default());
    }

    fn assert_untouched(recipe: &RecipeResponse, stored: &RecipeResponse) {
        assert_eq!(recipe.description, stored.description);
        assert_eq!(recipe.cook_time, stored.cook_time);
        assert_eq!(recipe.difficulty, stored.difficulty);
        assert_eq!(recipe.servings, stored.servings);
        assert_eq!(recipe.notes, stored.notes);
        assert_eq!(recipe.ingredients, stored.ingredients);
        assert_eq!(recipe.steps, stored.steps);
        assert_eq!(recipe.tags, stored.tags);
    }

    #[tokio::test]
    async fn test_edit_submits_partial_form() {
        let (api, mut c) = controller(FormMode::Edit {
            slug: "chili-verde".to_string(),
        });
        let stored = chili_verde();
        api.insert_recipe(stored.clone()).await;
        let form = c.form_mut();
        form.fields.name = "Chili Verde, Fast".to_string();
        form.fields.prep_time = 10;

        let recipe = c.submit().await.unwrap();

        assert_eq!(recipe.slug, "chili-verde");
        assert_eq!(recipe.name, "Chili Verde, Fast");
        assert_eq!(recipe.prep_time, 10);
        assert_untouched(&recipe, &stored);
        assert_eq!(recipe.cook_time, 150);
        assert_eq!(recipe.difficulty, Difficulty::Medium);

        let calls = api.calls().await;
        let Call::UpdateRecipe { slug, upload, .. } = &calls[0] else {
            panic!("expected an update call, got {:?}", calls);
        };
        assert_eq!(slug, "chili-verde");
        assert_eq!(upload.field(PREP_TIME), Some("10"));
        assert_eq!(upload.field(COOK_TIME), None);
        assert_eq!(upload.field(DIFFICULTY), None);
        assert_eq!(upload.field(SERVINGS), None);
    }

    #[tokio::test]
    async fn test_edit_name_only() {
        let (api, mut c) = controller(FormMode::Edit {
            slug: "chili-verde".to_string(),
        });
        let stored = chili_verde();
        api.insert_recipe(stored.clone()).await;
        c.form_mut().fields.name = "Chile Verde".to_string();

        let recipe = c.submit().await.unwrap();

        assert_eq!(recipe.name, "Chile Verde");
        assert_eq!(recipe.prep_time, stored.prep_time);
        assert_untouched(&recipe, &stored);

        let calls = api.calls().await;
        let Call::UpdateRecipe { upload, .. } = &calls[0] else {
            panic!("expected an update call, got {:?}", calls);
        };
        assert_eq!(
            upload.fields,
            vec![(NAME.to_string(), "Chile Verde".to_string())]
        );
    }

    #[tokio::test]
    async fn test_loaded_edit_sends_only_changes() {
        let (api, mut c) = controller(FormMode::Create);
        let stored = chili_verde();
        api.insert_recipe(stored.clone()).await;
        c.load_for_edit("chili-verde").await.unwrap();
        c.form_mut().fields.difficulty = Difficulty::Easy;

        let recipe = c.submit().await.unwrap();

        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.name, stored.name);
        assert_eq!(recipe.prep_time, stored.prep_time);
        assert_eq!(recipe.cook_time, stored.cook_time);

        let calls = api.calls().await;
        let Call::UpdateRecipe { upload, .. } = &calls[1] else {
            panic!("expected an update call, got {:?}", calls);
        };
        assert_eq!(
            upload.fields,
            vec![(DIFFICULTY.to_string(), "easy".to_string())]
        );
    }

    #[test]
    fn test_entries_keep_their_text() {
        let (_, mut c) = controller(FormMode::Create);

        c.form_mut().ingredient_draft = " 2 cups flour, sifted ".to_string();
        c.add_ingredient().unwrap();
        c.form_mut().instruction_draft = "  Whisk well".to_string();
        c.add_instruction().unwrap();

        assert_eq!(c.form().fields.ingredients, vec![" 2 cups flour, sifted "]);
        assert_eq!(c.form().fields.steps, vec!["  Whisk well"]);
        assert_eq!(c.form().instruction_draft, "");
    }
}
