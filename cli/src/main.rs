mod commands;
mod image;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chefgenie_core::voice::{recognizer_from_env, VoiceInput};
use chefgenie_core::{ChefClient, Cookbook, FileStore, MealType, RecipeRequest, VoiceError};
use clap::{Parser, Subcommand};

use crate::commands::CreateOptions;

#[derive(Parser)]
#[command(name = "chefgenie")]
#[command(about = "Recipes from whatever is in your fridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new recipe
    Create {
        /// Breakfast, Brunch, Lunch, Dinner, Snack, Dessert or "Surprise Me"
        #[arg(long, default_value = "Dinner")]
        meal_type: MealType,
        /// Ingredients you have on hand, free text
        #[arg(long, default_value = "")]
        ingredients: String,
        /// Dietary restrictions, free text
        #[arg(long)]
        diet: Option<String>,
        /// Number of servings, clamped to 1..=12
        #[arg(long, default_value_t = 2)]
        servings: u32,
        /// Dictate the ingredients instead of typing them
        #[arg(long)]
        dictate: bool,
        /// Skip the photo
        #[arg(long)]
        no_image: bool,
        /// Save the result to the cookbook
        #[arg(long)]
        save: bool,
    },
    /// List saved recipes
    List {
        /// Only show titles or meal types containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a saved recipe
    Show {
        title: String,
        /// Write the saved photo to this file
        #[arg(long)]
        export_image: Option<PathBuf>,
    },
    /// Generate and store a new photo for a saved recipe
    SaveImage { title: String },
    /// Rate a saved recipe from 1 to 5 stars (0 clears the rating)
    Rate { title: String, stars: u8 },
    /// Replace the notes on a saved recipe
    Note { title: String, text: String },
    /// Delete a saved recipe
    Delete {
        title: String,
        /// Don't ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Ask the chef a question about a saved recipe
    Ask { title: String, question: String },
    /// Revise a saved recipe from feedback
    Tweak {
        title: String,
        feedback: String,
        /// Save the revision to the cookbook
        #[arg(long)]
        save: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn chef() -> Result<Arc<ChefClient>> {
    let client = ChefClient::from_env().context("Failed to configure the recipe model")?;
    Ok(Arc::new(client))
}

/// Replace `ingredients` with a dictated transcript, if dictation works here.
async fn dictate(ingredients: &mut String) -> Result<()> {
    let input = VoiceInput::new(recognizer_from_env());
    eprintln!("Listening... say your ingredients.");
    match input.dictate_into(ingredients).await {
        Ok(true) => eprintln!("Heard: {}", ingredients),
        Ok(false) => eprintln!("Didn't catch that, keeping the typed ingredients."),
        Err(VoiceError::Unsupported) => eprintln!(
            "Voice input isn't available on this system. Set CHEFGENIE_DICTATION_CMD to a \
             dictation program to enable it."
        ),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let store = FileStore::from_env();
    tracing::debug!(dir = %store.dir().display(), "Opening cookbook");
    let cookbook = Cookbook::new(store);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Create {
            meal_type,
            mut ingredients,
            diet,
            servings,
            dictate: use_voice,
            no_image,
            save,
        } => {
            if use_voice {
                dictate(&mut ingredients).await?;
            }
            if ingredients.trim().is_empty() {
                anyhow::bail!("Tell the chef what you have: pass --ingredients or --dictate");
            }
            let request = RecipeRequest::new(meal_type, ingredients, diet, servings);
            let options = CreateOptions {
                with_image: !no_image,
                save,
            };
            commands::create(chef()?, &cookbook, &request, options, &mut out).await?;
        }
        Commands::List { search } => {
            commands::list(&cookbook, search.as_deref(), &mut out)?;
        }
        Commands::Show {
            title,
            export_image,
        } => {
            commands::show(&cookbook, &title, export_image.as_deref(), &mut out)?;
        }
        Commands::SaveImage { title } => {
            commands::save_image(chef()?.as_ref(), &cookbook, &title, &mut out).await?;
        }
        Commands::Rate { title, stars } => {
            commands::rate(&cookbook, &title, stars, &mut out)?;
        }
        Commands::Note { title, text } => {
            commands::note(&cookbook, &title, &text, &mut out)?;
        }
        Commands::Delete { title, yes } => {
            if !yes && !confirm(&format!("Delete \"{}\" from your cookbook?", title))? {
                writeln!(out, "Kept \"{}\".", title)?;
                return Ok(());
            }
            commands::delete(&cookbook, &title, &mut out)?;
        }
        Commands::Ask { title, question } => {
            commands::ask(chef()?, &cookbook, &title, &question, &mut out).await?;
        }
        Commands::Tweak {
            title,
            feedback,
            save,
        } => {
            commands::tweak(chef()?, &cookbook, &title, &feedback, save, &mut out).await?;
        }
    }

    Ok(())
}
