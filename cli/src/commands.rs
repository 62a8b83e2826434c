//! The `chefgenie` subcommands, written against the core traits so they run
//! the same over Gemini and a file cookbook as over fakes in tests.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chefgenie_core::session::GENERATION_FAILED_MESSAGE;
use chefgenie_core::{
    search, ActiveRecipe, Cookbook, KeyValueStore, Rating, RecipeGenerator, RecipeRequest,
    SavedRecipe, Session, StoreError,
};

use crate::image::decode_data_uri;
use crate::render;

/// Turn a storage failure into something a user can act on.
pub fn store_error(e: StoreError) -> anyhow::Error {
    match e {
        StoreError::QuotaExceeded { needed, limit } => anyhow!(
            "Couldn't save: the cookbook would need {} bytes but storage is limited to {} bytes. \
             Recipe photos are stored inline and take most of the space. Delete a few saved \
             recipes or raise CHEFGENIE_STORAGE_QUOTA_BYTES.",
            needed,
            limit
        ),
        other => anyhow::Error::new(other).context("Couldn't update the cookbook"),
    }
}

fn find_saved<S: KeyValueStore>(cookbook: &Cookbook<S>, title: &str) -> Result<SavedRecipe> {
    cookbook.find(title).ok_or_else(|| {
        anyhow!(
            "No saved recipe titled \"{}\". Run `chefgenie list` to see your cookbook.",
            title
        )
    })
}

pub struct CreateOptions {
    pub with_image: bool,
    pub save: bool,
}

pub async fn create<G, S>(
    chef: Arc<G>,
    cookbook: &Cookbook<S>,
    request: &RecipeRequest,
    options: CreateOptions,
    out: &mut impl Write,
) -> Result<()>
where
    G: RecipeGenerator + 'static,
    S: KeyValueStore,
{
    let mut session = Session::new(chef);
    let Some(ticket) = session.create_recipe(request).await else {
        bail!("{}", session.error().unwrap_or(GENERATION_FAILED_MESSAGE));
    };

    // Without a photo the ticket is dropped and its result ignored
    if options.with_image {
        session.await_image(ticket).await;
    }

    let Some(active) = session.active() else {
        bail!(GENERATION_FAILED_MESSAGE);
    };
    let title = active.recipe().title.clone();
    write!(out, "{}", render::recipe_card(active.recipe(), None))?;
    if let Some(line) = render::photo_line(session.image()) {
        writeln!(out, "\n{}", line)?;
    }

    if options.save {
        if let Some(saved) = session.save_active(cookbook, None, None).map_err(store_error)? {
            writeln!(out, "\nSaved \"{}\" to your cookbook.", saved.title())?;
        }
    } else if cookbook.find(&title).is_some() {
        writeln!(out, "\n\"{}\" is already in your cookbook.", title)?;
    }

    Ok(())
}

pub fn list<S: KeyValueStore>(
    cookbook: &Cookbook<S>,
    term: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let entries = cookbook.list_saved();
    if entries.is_empty() {
        writeln!(out, "Your cookbook is empty.")?;
        return Ok(());
    }

    let matches = search(&entries, term.unwrap_or(""));
    if matches.is_empty() {
        writeln!(out, "No saved recipes match \"{}\".", term.unwrap_or(""))?;
        return Ok(());
    }

    for saved in matches {
        writeln!(out, "{}", render::list_line(saved))?;
    }
    Ok(())
}

pub fn show<S: KeyValueStore>(
    cookbook: &Cookbook<S>,
    title: &str,
    export_image: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let saved = find_saved(cookbook, title)?;
    write!(out, "{}", render::recipe_card(&saved.recipe, Some(&saved)))?;

    let Some(path) = export_image else {
        return Ok(());
    };
    let uri = saved
        .image_url
        .as_deref()
        .with_context(|| format!("\"{}\" has no saved photo", title))?;
    let image = decode_data_uri(uri)?;
    let path = match path.extension() {
        Some(_) => path.to_path_buf(),
        None => path.with_extension(image.extension()),
    };
    std::fs::write(&path, &image.bytes)
        .with_context(|| format!("Failed to write image: {}", path.display()))?;

    writeln!(
        out,
        "\nExported photo to: {} ({}, {} bytes)",
        path.display(),
        image.mime_type,
        image.bytes.len()
    )?;
    Ok(())
}

/// Generate a fresh photo for a saved recipe and store it.
pub async fn save_image<G, S>(
    chef: &G,
    cookbook: &Cookbook<S>,
    title: &str,
    out: &mut impl Write,
) -> Result<()>
where
    G: RecipeGenerator,
    S: KeyValueStore,
{
    let saved = find_saved(cookbook, title)?;
    let Some(image) = chef
        .generate_recipe_image(&saved.recipe.title, &saved.recipe.description)
        .await
    else {
        bail!("No photo could be generated for \"{}\". Try again later.", title);
    };

    let (rating, notes) = (saved.rating, saved.notes.clone());
    cookbook
        .save(saved, Some(image), rating, notes)
        .map_err(store_error)?;
    writeln!(out, "Saved a new photo for \"{}\".", title)?;
    Ok(())
}

pub fn rate<S: KeyValueStore>(
    cookbook: &Cookbook<S>,
    title: &str,
    stars: u8,
    out: &mut impl Write,
) -> Result<()> {
    let rating = Rating::from_stars(stars).map_err(anyhow::Error::msg)?;
    let saved = find_saved(cookbook, title)?;
    cookbook
        .update_rating_or_notes(title, rating, saved.notes)
        .map_err(store_error)?;
    writeln!(out, "{}  {}", render::stars(rating), title)?;
    Ok(())
}

pub fn note<S: KeyValueStore>(
    cookbook: &Cookbook<S>,
    title: &str,
    text: &str,
    out: &mut impl Write,
) -> Result<()> {
    let saved = find_saved(cookbook, title)?;
    cookbook
        .update_rating_or_notes(title, saved.rating, Some(text.to_string()))
        .map_err(store_error)?;
    if text.trim().is_empty() {
        writeln!(out, "Cleared notes for \"{}\".", title)?;
    } else {
        writeln!(out, "Updated notes for \"{}\".", title)?;
    }
    Ok(())
}

pub fn delete<S: KeyValueStore>(
    cookbook: &Cookbook<S>,
    title: &str,
    out: &mut impl Write,
) -> Result<()> {
    if !cookbook.delete(title).map_err(store_error)? {
        bail!("No saved recipe titled \"{}\".", title);
    }
    writeln!(out, "Deleted \"{}\".", title)?;
    Ok(())
}

pub async fn ask<G, S>(
    chef: Arc<G>,
    cookbook: &Cookbook<S>,
    title: &str,
    question: &str,
    out: &mut impl Write,
) -> Result<()>
where
    G: RecipeGenerator + 'static,
    S: KeyValueStore,
{
    let mut session = Session::new(chef);
    session.select_saved(find_saved(cookbook, title)?);
    let answer = session.ask(question).await.unwrap_or_default();
    writeln!(out, "{}", answer)?;
    Ok(())
}

/// Revise a saved recipe. The revision is only stored with `save`.
pub async fn tweak<G, S>(
    chef: Arc<G>,
    cookbook: &Cookbook<S>,
    title: &str,
    feedback: &str,
    save: bool,
    out: &mut impl Write,
) -> Result<()>
where
    G: RecipeGenerator + 'static,
    S: KeyValueStore,
{
    let mut session = Session::new(chef);
    session.select_saved(find_saved(cookbook, title)?);
    session
        .tweak(feedback)
        .await
        .with_context(|| format!("Couldn't revise \"{}\"", title))?;

    if let Some(ActiveRecipe::Fresh(revised)) = session.active() {
        write!(out, "{}", render::recipe_card(revised, None))?;
    }

    if save {
        if let Some(saved) = session.save_active(cookbook, None, None).map_err(store_error)? {
            writeln!(out, "\nSaved \"{}\" to your cookbook.", saved.title())?;
        }
    }
    Ok(())
}
