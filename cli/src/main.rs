use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use recipi_cli::{
    FormMode, HttpApi, Navigation, ProfileController, ProfileState, RecipeFormController, RecipiApi, Session,
    SessionStore,
};
use recipi_core::{
    ingredients, Difficulty, ImageFile, LoginRequest, ProfilePatch, RecipeResponse, SignupRequest,
};

#[derive(Parser)]
#[command(name = "recipi")]
#[command(about = "Recipi CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "RECIPI_SERVER", default_value = "http://localhost:3000", global = true)]
    server: String,

    /// Bearer token; overrides the saved session
    #[arg(long, env = "RECIPI_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and save the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// List all recipes
    Recipes,
    /// Work with a single recipe
    #[command(subcommand)]
    Recipe(RecipeCommand),
    /// Work with user profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// Show a recipe
    Show { slug: String },
    /// Create a recipe
    Create(RecipeArgs),
    /// Edit a recipe; only the given fields change
    Edit {
        slug: String,
        #[command(flatten)]
        fields: RecipeArgs,
    },
    /// Delete one of your recipes
    Delete { slug: String },
}

#[derive(Args)]
struct RecipeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Preparation time in minutes
    #[arg(long)]
    prep_time: Option<u32>,
    /// Cooking time in minutes
    #[arg(long)]
    cook_time: Option<u32>,
    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    servings: Option<u32>,
    #[arg(long)]
    notes: Option<String>,
    /// Repeat for each ingredient; replaces the whole list
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    /// Repeat for each step; replaces the whole list
    #[arg(long = "step")]
    steps: Vec<String>,
    /// Repeat for each tag (1 to 3); replaces the whole list
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Image to attach
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show a user's profile and recipes
    Show { username: String },
    /// Update your profile; only the given fields change
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Profile image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Permanently delete your account and all your recipes
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SessionStore::default_location()?;
    let session = load_session(&store, &cli)?;
    let api: Arc<dyn RecipiApi> = Arc::new(HttpApi::new(session.server.clone()));

    match cli.command {
        Commands::Signup {
            username,
            email,
            password,
        } => {
            let response = api
                .signup(SignupRequest {
                    username: username.clone(),
                    email,
                    password,
                })
                .await
                .context("Failed to sign up")?;
            store.save(&session.with_token(response.token))?;
            println!("Signed up as {}", username);
        }
        Commands::Login { username, password } => {
            let response = api
                .login(LoginRequest {
                    username: username.clone(),
                    password,
                })
                .await
                .context("Failed to login")?;
            store.save(&session.with_token(response.token))?;
            println!("Signed in as {}", username);
        }
        Commands::Logout => {
            store.clear()?;
            println!("Signed out");
        }
        Commands::Recipes => {
            let recipes = api.list_recipes().await.context("Failed to list recipes")?;
            if recipes.is_empty() {
                println!("No recipes yet");
            }
            for recipe in recipes {
                println!(
                    "{:<30} {} ({}, {} min) by {}",
                    recipe.slug,
                    recipe.name,
                    recipe.difficulty,
                    recipe.prep_time + recipe.cook_time,
                    recipe.author
                );
            }
        }
        Commands::Recipe(command) => recipe_command(api, session, command).await?,
        Commands::Profile(command) => profile_command(api, session, &store, command).await?,
    }

    Ok(())
}

fn load_session(store: &SessionStore, cli: &Cli) -> Result<Session> {
    let mut session = store
        .load()
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .unwrap_or_default();
    session.server = cli.server.clone();
    if let Some(token) = &cli.token {
        session.set_token(token.clone());
    }
    if session.is_expired() {
        tracing::warn!("saved session has expired; run `recipi login` again");
    }
    Ok(session)
}

async fn read_image(path: &Path) -> Result<ImageFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(ImageFile::new(file_name, bytes))
}

/// Copy the given arguments into the form, going through the controller's
/// list operations so the same rules apply as in any other front end.
async fn fill_form(controller: &mut RecipeFormController, args: RecipeArgs) -> Result<()> {
    let image = match &args.image {
        Some(path) => Some(read_image(path).await?),
        None => None,
    };

    let form = controller.form_mut();
    if let Some(name) = args.name {
        form.fields.name = name;
    }
    if let Some(description) = args.description {
        form.fields.description = description;
    }
    if let Some(prep_time) = args.prep_time {
        form.fields.prep_time = prep_time;
    }
    if let Some(cook_time) = args.cook_time {
        form.fields.cook_time = cook_time;
    }
    if let Some(difficulty) = args.difficulty {
        form.fields.difficulty = difficulty;
    }
    if args.servings.is_some() {
        form.fields.servings = args.servings;
    }
    if args.notes.is_some() {
        form.fields.notes = args.notes;
    }
    if image.is_some() {
        form.image = image;
    }

    if !args.ingredients.is_empty() {
        controller.form_mut().fields.ingredients.clear();
        for ingredient in args.ingredients {
            controller.form_mut().ingredient_draft = ingredient;
            controller.add_ingredient()?;
        }
    }
    if !args.steps.is_empty() {
        controller.form_mut().fields.steps.clear();
        for step in args.steps {
            controller.form_mut().instruction_draft = step;
            controller.add_instruction()?;
        }
    }
    if !args.tags.is_empty() {
        controller.form_mut().fields.tags.clear();
        for tag in args.tags {
            controller.form_mut().tag_draft = tag;
            controller.add_tag()?;
        }
    }

    Ok(())
}

fn print_recipe(recipe: &RecipeResponse) -> Result<()> {
    println!("{} [{}]", recipe.name, recipe.slug);
    println!("by {}", recipe.author);
    println!();
    println!("{}", recipe.description);
    println!();
    println!(
        "Prep {} min, cook {} min, {}",
        recipe.prep_time, recipe.cook_time, recipe.difficulty
    );
    if let Some(servings) = recipe.servings {
        println!("Serves {}", servings);
    }
    println!("Tags: {}", recipe.tags.join(", "));
    println!();
    println!("Ingredients:");
    for ingredient in ingredients::decode(&recipe.ingredients)? {
        println!("  - {}", ingredient);
    }
    println!();
    println!("Steps:");
    for step in &recipe.steps {
        println!("  {}. {}", step.position, step.instruction);
    }
    if let Some(notes) = &recipe.notes {
        println!();
        println!("Notes: {}", notes);
    }
    Ok(())
}

async fn recipe_command(
    api: Arc<dyn RecipiApi>,
    session: Session,
    command: RecipeCommand,
) -> Result<()> {
    match command {
        RecipeCommand::Show { slug } => {
            let recipe = api
                .get_recipe(&slug)
                .await
                .with_context(|| format!("Failed to fetch recipe {}", slug))?;
            print_recipe(&recipe)?;
        }
        RecipeCommand::Create(args) => {
            let mut controller = RecipeFormController::new(api, session, FormMode::Create);
            fill_form(&mut controller, args).await?;
            let recipe = controller.submit().await?;
            println!("Created recipe: {}", recipe.slug);
        }
        RecipeCommand::Edit { slug, fields } => {
            let mut controller = RecipeFormController::new(api, session, FormMode::Create);
            controller
                .load_for_edit(&slug)
                .await
                .with_context(|| format!("Failed to load recipe {}", slug))?;
            fill_form(&mut controller, fields).await?;
            let recipe = controller.submit().await?;
            println!("Updated recipe: {}", recipe.slug);
        }
        RecipeCommand::Delete { slug } => {
            let token = session.require_token()?;
            api.delete_recipe(token, &slug)
                .await
                .with_context(|| format!("Failed to delete recipe {}", slug))?;
            println!("Deleted recipe: {}", slug);
        }
    }
    Ok(())
}

async fn profile_command(
    api: Arc<dyn RecipiApi>,
    session: Session,
    store: &SessionStore,
    command: ProfileCommand,
) -> Result<()> {
    let mut controller = ProfileController::new(api, session);

    match command {
        ProfileCommand::Show { username } => {
            match controller.load_profile(&username).await {
                ProfileState::Loaded(profile) => {
                    println!("{}", profile.username);
                    if !profile.bio.is_empty() {
                        println!("{}", profile.bio);
                    }
                    println!();
                    for recipe in &profile.recipes {
                        println!("{:<30} {}", recipe.slug, recipe.name);
                    }
                }
                ProfileState::Failed(message) => bail!("{}", message),
                ProfileState::Idle | ProfileState::Loading => {}
            }
            if controller.is_owner() {
                println!();
                println!("This is you. Use `recipi profile update` to change it.");
            }
        }
        ProfileCommand::Update {
            username,
            bio,
            email,
            image,
        } => {
            let image = match &image {
                Some(path) => Some(read_image(path).await?),
                None => None,
            };
            let patch = ProfilePatch {
                username,
                bio,
                email,
                image,
            };
            match controller.update_profile(patch).await {
                Ok(navigation) => {
                    store.save(controller.session())?;
                    match navigation {
                        Navigation::Reload { path } => println!("Profile updated: {}", path),
                        Navigation::Home => println!("Profile updated"),
                    }
                }
                Err(e) => bail!("{}", e.toast()),
            }
        }
        ProfileCommand::Delete { yes } => {
            if !yes {
                bail!("This deletes your account and every recipe you own. Re-run with --yes to confirm.");
            }
            controller.delete_profile().await.context("Failed to delete account")?;
            store.clear()?;
            println!("Account deleted");
        }
    }
    Ok(())
}
