/// Cook Me - command-line recipe client
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use cookme_client::{AppState, ClientSettings, ListKind, Route, SearchQuery};
use cookme_core::{Category, ImageAsset, Recipe, RecipeDraft, RecipeId};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cookme")]
#[command(about = "Cook Me recipe client", long_about = None)]
struct Cli {
    /// Settings file (defaults to cookme.toml when present)
    #[arg(short, long, global = true, env = "COOKME_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Edit profile fields
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Replace the profile picture
    Avatar {
        /// Image file path
        path: String,
    },
    /// Show one of the recipe lists
    List {
        #[arg(value_enum)]
        kind: ListArg,
    },
    /// Search recipes
    Search {
        /// Search text
        #[arg(default_value = "")]
        text: String,
        /// Category filter (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
    /// Add a recipe to favorites
    Favorite { id: String },
    /// Remove a recipe from favorites
    Unfavorite { id: String },
    /// Comment on a recipe
    Comment { id: String, text: String },
    /// Delete one of your recipes
    Delete { id: String },
    /// Create or update a recipe from a draft file
    Publish {
        /// Draft JSON file
        draft: PathBuf,
    },
    /// Resolve a recipe deep link
    OpenLink { url: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListArg {
    Recommended,
    Trending,
    Recent,
    Mine,
    Favorites,
}

impl From<ListArg> for ListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Recommended => ListKind::Recommended,
            ListArg::Trending => ListKind::Trending,
            ListArg::Recent => ListKind::Recent,
            ListArg::Mine => ListKind::Mine,
            ListArg::Favorites => ListKind::Favorites,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cookme=info,cookme_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = ClientSettings::load_from(cli.settings.as_deref())
        .context("Failed to load settings")?;
    tracing::debug!(api_url = %settings.api_url, "Settings loaded");

    let state = AppState::open(settings).await?;
    let result = run(&state, cli.command, cli.json).await;
    state.dispose().await;
    result
}

async fn run(state: &AppState, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let outcome = state.session.sign_in(&username, &password).await;
            report(outcome.status, &outcome.message)?;
        }
        Commands::Register {
            username,
            password,
            first_name,
            last_name,
        } => {
            let outcome = state
                .session
                .sign_up(&username, &password, &first_name, &last_name)
                .await;
            report(outcome.status, &outcome.message)?;
        }
        Commands::Logout => {
            state.sign_out().await?;
            println!("Signed out");
        }
        Commands::Whoami => {
            require_user(state).await?;
            let user = state.session.refresh_profile().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} ({})", user.full_name(), user.username);
                if let Some(bio) = &user.bio {
                    println!("{}", bio);
                }
                println!(
                    "{} recipes, {} favorites",
                    user.recipes.len(),
                    user.favorites.len()
                );
            }
        }
        Commands::Profile {
            first_name,
            last_name,
            bio,
        } => {
            require_user(state).await?;
            state.session.update_profile(first_name, last_name, bio).await;
            let user = state.session.submit_profile_update().await?;
            println!("Profile updated for {}", user.full_name());
        }
        Commands::Avatar { path } => {
            require_user(state).await?;
            state.session.update_avatar(&ImageAsset::from_uri(path)).await?;
            println!("Avatar updated");
        }
        Commands::List { kind } => {
            let kind = ListKind::from(kind);
            state.lists.refresh(kind).await?;
            print_recipes(&state.lists.get(kind).await, json)?;
        }
        Commands::Search { text, categories } => {
            let query = SearchQuery::new(text, parse_categories(&categories));
            state.lists.search(query).await?;
            print_recipes(&state.lists.get(ListKind::Search).await, json)?;
        }
        Commands::Favorite { id } => {
            require_user(state).await?;
            state.lists.add_favorite(&RecipeId::new(id)).await?;
            println!("Added to favorites");
        }
        Commands::Unfavorite { id } => {
            require_user(state).await?;
            state.lists.remove_favorite(&RecipeId::new(id)).await?;
            println!("Removed from favorites");
        }
        Commands::Comment { id, text } => {
            state.lists.add_comment(&RecipeId::new(id), &text).await?;
            println!("Comment posted");
        }
        Commands::Delete { id } => {
            require_user(state).await?;
            state.lists.delete_recipe(&RecipeId::new(id)).await?;
            println!("Recipe deleted");
        }
        Commands::Publish { draft } => {
            publish(state, &draft).await?;
        }
        Commands::OpenLink { url } => {
            open_link(state, &url).await?;
        }
    }

    Ok(())
}

async fn publish(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    let draft = RecipeDraft::from_json(&text)?;

    let mut phases = state.orchestrator.subscribe();
    let watcher = tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            let phase = *phases.borrow_and_update();
            tracing::info!(phase = ?phase, "Upload phase");
        }
    });

    let result = state.orchestrator.submit(&draft).await;
    watcher.abort();
    let report = result?;

    println!("Saved recipe {}", report.recipe_id);
    println!(
        "{} step image(s) uploaded, cover {}",
        report.step_uploads,
        if report.cover_uploaded { "uploaded" } else { "unchanged" }
    );
    for error in &report.reconcile_errors {
        eprintln!("warning: refresh after save failed: {}", error);
    }
    Ok(())
}

async fn open_link(state: &AppState, url: &str) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel(4);
    let dispatched = state.deep_links.dispatch(url, &tx).await;
    drop(tx);

    if dispatched == 0 {
        bail!("Not a recipe link: {}", url);
    }

    while let Some(route) = rx.recv().await {
        match route {
            Route::Search => {
                let count = state.lists.search(SearchQuery::default()).await?;
                println!("Search ({} recipes)", count);
            }
            Route::RecipeDetail { id } => {
                let recipe = state
                    .lists
                    .get(ListKind::Search)
                    .await
                    .into_iter()
                    .find(|r| r.id == id);
                match recipe {
                    Some(recipe) => print_recipe(&recipe),
                    None => println!("Recipe {}", id),
                }
            }
        }
    }
    Ok(())
}

async fn require_user(state: &AppState) -> anyhow::Result<()> {
    if !state.session.is_authenticated().await {
        bail!("Not signed in; run `cookme login` first");
    }
    Ok(())
}

fn report(ok: bool, message: &str) -> anyhow::Result<()> {
    if ok {
        println!("{}", message);
        Ok(())
    } else {
        bail!("{}", message)
    }
}

fn print_recipes(recipes: &[Recipe], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes");
    }
    for recipe in recipes {
        println!("{}  {}", recipe.id, recipe.title);
    }
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.title);
    if !recipe.info.is_empty() {
        println!("{}", recipe.info);
    }
    println!();
    for ingredient in &recipe.ingredients {
        if ingredient.is_section {
            println!("{}:", ingredient.value);
        } else {
            println!("  - {}", ingredient.value);
        }
    }
    println!();
    for (n, method) in recipe.ordered_methods().into_iter().enumerate() {
        println!("{}. {}", n + 1, method.value);
    }
}

/// Category flags, matched case-insensitively against the known set.
fn parse_categories(values: &[String]) -> Vec<Category> {
    values
        .iter()
        .filter_map(|value| value.parse::<Category>().ok())
        .collect()
}
