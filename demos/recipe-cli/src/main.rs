//! Command-line front end: generate recipes from ingredients, then browse,
//! rescale, save and rate them.

mod render;

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use recipe_forge::adapters::{GeminiAdapter, GeminiConfig};
use recipe_forge::config::AppConfig;
use recipe_forge::kernel::{
    CookingTime, DifficultyFilter, RecipeFilter, RecipeGenerator, ServingScaler,
};
use recipe_forge::memory::{Favorites, FileStore};
use recipe_forge::primitives::selection::IngredientCategory;
use recipe_forge::primitives::{
    DietaryPreference, DietarySelection, IngredientSelection, Rating, RecipeId,
};
use recipe_forge::telemetry::{TelemetryConfig, init_tracing};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "recipe-cli")]
#[command(about = "Generate recipes from the ingredients you have", long_about = None)]
struct Cli {
    /// JSON configuration file; `RECIPE_*` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model for recipes using the given ingredients
    Generate {
        /// Ingredients to cook with
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Dietary preference (vegetarian, vegan, non-vegetarian, gluten-free); repeatable
        #[arg(long = "diet")]
        diets: Vec<DietaryPreference>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the last generated batch again
    Show {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Save or unsave a recipe from the last batch
    Save {
        /// Position in the last batch, starting at 1
        position: NonZeroU32,
    },
    /// Rate a recipe from the last batch, saving it if needed
    Rate {
        /// Position in the last batch, starting at 1
        position: NonZeroU32,
        /// Stars, 0 to 5
        stars: u8,
    },
    /// Manage saved recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// List quick-pick ingredients by category
    Catalog,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved recipes
    List,
    /// Remove a saved recipe by id
    Remove {
        /// Recipe id as printed by `favorites list`
        id: RecipeId,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Servings to scale ingredient quantities to
    #[arg(long)]
    servings: Option<NonZeroU32>,
    /// Cooking time bucket: all, quick, medium, slow
    #[arg(long, default_value = "all")]
    cooking_time: CookingTime,
    /// Difficulty: all, easy, medium, hard
    #[arg(long, default_value = "all")]
    difficulty: DifficultyFilter,
}

struct App {
    config: AppConfig,
    favorites: Favorites<FileStore>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&TelemetryConfig::new(config.log_filter.clone()))?;
    debug!(?config.data_dir, model = %config.model, "configuration loaded");

    let store = FileStore::open(&config.data_dir)
        .await
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let app = App {
        config,
        favorites: Favorites::new(store),
    };

    match cli.command {
        Commands::Generate {
            ingredients,
            diets,
            view,
        } => return app.generate(ingredients, &diets, &view).await,
        Commands::Show { view } => app.show(&view).await?,
        Commands::Save { position } => app.toggle_save(position).await?,
        Commands::Rate { position, stars } => app.rate(position, stars).await?,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => app.list_favorites().await?,
            FavoritesAction::Remove { id } => app.remove_favorite(id).await?,
        },
        Commands::Catalog => print_catalog(),
    }
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let base = match path {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    Ok(base.with_overrides(|key| std::env::var(key).ok())?)
}

impl App {
    async fn generate(
        &self,
        ingredients: Vec<String>,
        diets: &[DietaryPreference],
        view: &ViewArgs,
    ) -> Result<ExitCode> {
        let selection: IngredientSelection = ingredients.into_iter().collect();
        let mut dietary = DietarySelection::new();
        for diet in diets {
            if !dietary.contains(*diet) {
                dietary.toggle(*diet, &selection)?;
            }
        }

        let generator = RecipeGenerator::new(Arc::new(self.adapter()?));
        let batch = match generator
            .generate(selection.items(), dietary.preferences())
            .await
        {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, category = ?err.category(), "generation failed");
                eprintln!("{}", err.user_message());
                return Ok(ExitCode::FAILURE);
            }
        };

        self.favorites.remember_batch(&batch).await?;
        let batch = self.favorites.hydrate(batch).await?;
        self.print_batch(&batch, view);
        Ok(ExitCode::SUCCESS)
    }

    async fn show(&self, view: &ViewArgs) -> Result<()> {
        let batch = self.favorites.last_batch().await?;
        if batch.is_empty() {
            println!("No recipes yet. Run `generate` first.");
            return Ok(());
        }
        self.print_batch(&batch, view);
        Ok(())
    }

    async fn toggle_save(&self, position: NonZeroU32) -> Result<()> {
        let recipe = self.favorites.batch_entry(index(position)?).await?;
        let updated = self.favorites.toggle_save(&recipe).await?;
        let verb = if updated.is_saved() { "Saved" } else { "Removed" };
        println!("{verb} \"{}\"", updated.title());
        Ok(())
    }

    async fn rate(&self, position: NonZeroU32, stars: u8) -> Result<()> {
        let rating = Rating::new(stars)?;
        let recipe = self.favorites.batch_entry(index(position)?).await?;
        let updated = self.favorites.rate(&recipe, rating).await?;
        println!("Rated \"{}\" {}", updated.title(), updated.rating());
        Ok(())
    }

    async fn list_favorites(&self) -> Result<()> {
        let favorites = self.favorites.list().await?;
        if favorites.is_empty() {
            println!("No favorite recipes yet.");
            return Ok(());
        }
        for recipe in &favorites {
            println!("{}", render::favorite_line(recipe));
        }
        Ok(())
    }

    async fn remove_favorite(&self, id: RecipeId) -> Result<()> {
        if !self.favorites.remove(id).await? {
            bail!("no favorite with id {id}");
        }
        println!("Removed {id}");
        Ok(())
    }

    fn adapter(&self) -> Result<GeminiAdapter> {
        let mut gemini = GeminiConfig::new(self.config.model.clone())
            .with_base_url(&self.config.base_url)?
            .with_timeout(self.config.timeout())
            .with_json_response(self.config.json_response);
        if let Some(key) = &self.config.api_key {
            gemini = gemini.with_api_key(key.clone());
        }
        if let Some(endpoint) = &self.config.endpoint {
            gemini = gemini.with_endpoint(endpoint)?;
        }
        Ok(GeminiAdapter::new(gemini)?)
    }

    fn print_batch(&self, batch: &[recipe_forge::primitives::Recipe], view: &ViewArgs) {
        let filter = RecipeFilter::new(view.cooking_time, view.difficulty);
        let scaler = ServingScaler::new(self.config.serving_baseline());
        let servings = view.servings.unwrap_or(scaler.original());

        let mut shown = 0;
        for (position, recipe) in batch.iter().enumerate() {
            if !filter.matches(recipe) {
                continue;
            }
            let ingredients = scaler.scale(recipe.ingredients(), servings);
            println!("{}", render::recipe_block(position + 1, recipe, &ingredients, servings));
            shown += 1;
        }
        if shown == 0 {
            println!("No recipes match the current filters.");
        }
    }
}

fn index(position: NonZeroU32) -> Result<usize> {
    usize::try_from(position.get() - 1).context("position out of range")
}

fn print_catalog() {
    for category in IngredientCategory::ALL {
        println!("{category:?}: {}", category.ingredients().join(", "));
    }
}
