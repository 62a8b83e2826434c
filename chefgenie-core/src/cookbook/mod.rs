//! The cookbook: saved recipes kept in a key-value store.
//!
//! The whole collection lives under a single key as a JSON array, newest
//! first. Titles are the natural key: saving a recipe whose title is already
//! present replaces that entry and moves it to the front.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, DEFAULT_QUOTA_BYTES};

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Rating, Recipe, SavedRecipe};

/// Storage key holding the serialized collection.
pub const COOKBOOK_KEY: &str = "chefGenie_cookbook";

/// Something that can be saved: a fresh recipe or one already in the cookbook.
#[derive(Debug, Clone)]
pub enum Saveable {
    Fresh(Recipe),
    Saved(SavedRecipe),
}

impl Saveable {
    pub fn recipe(&self) -> &Recipe {
        match self {
            Saveable::Fresh(recipe) => recipe,
            Saveable::Saved(saved) => &saved.recipe,
        }
    }
}

impl From<Recipe> for Saveable {
    fn from(recipe: Recipe) -> Self {
        Saveable::Fresh(recipe)
    }
}

impl From<SavedRecipe> for Saveable {
    fn from(saved: SavedRecipe) -> Self {
        Saveable::Saved(saved)
    }
}

/// Saved recipes on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct Cookbook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Cookbook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full collection, newest first.
    ///
    /// Missing or unreadable data is treated as an empty cookbook.
    pub fn list_saved(&self) -> Vec<SavedRecipe> {
        let raw = match self.store.get(COOKBOOK_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read cookbook: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!("Failed to parse cookbook, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Exact title lookup.
    pub fn find(&self, title: &str) -> Option<SavedRecipe> {
        self.list_saved().into_iter().find(|r| r.title() == title)
    }

    /// Save a recipe with its image, rating and notes.
    ///
    /// A fresh recipe gets a new id and timestamp; an already saved one keeps
    /// its own. Any entry with the same title is replaced and the result goes
    /// to the front.
    pub fn save(
        &self,
        recipe: impl Into<Saveable>,
        image_url: Option<String>,
        rating: Option<Rating>,
        notes: Option<String>,
    ) -> Result<SavedRecipe, StoreError> {
        let (recipe, id, saved_at) = match recipe.into() {
            // Stored with millisecond precision
            Saveable::Fresh(recipe) => (
                recipe,
                Uuid::new_v4().to_string(),
                Utc::now().trunc_subsecs(3),
            ),
            Saveable::Saved(saved) => (saved.recipe, saved.id, saved.saved_at),
        };

        let entry = SavedRecipe {
            recipe,
            id,
            saved_at,
            image_url,
            rating,
            notes: normalize_notes(notes),
        };

        let mut recipes = self.list_saved();
        recipes.retain(|r| r.title() != entry.title());
        recipes.insert(0, entry.clone());
        self.write(&recipes)?;

        tracing::debug!(title = %entry.title(), id = %entry.id, "Saved recipe");
        Ok(entry)
    }

    /// Overwrite rating and notes of the entry with this title, in place.
    ///
    /// Returns `false` if no entry has the title.
    pub fn update_rating_or_notes(
        &self,
        title: &str,
        rating: Option<Rating>,
        notes: Option<String>,
    ) -> Result<bool, StoreError> {
        let mut recipes = self.list_saved();
        let Some(entry) = recipes.iter_mut().find(|r| r.title() == title) else {
            return Ok(false);
        };

        entry.rating = rating;
        entry.notes = normalize_notes(notes);
        self.write(&recipes)?;
        Ok(true)
    }

    /// Remove the entry with this title. Returns `false` if there was none.
    pub fn delete(&self, title: &str) -> Result<bool, StoreError> {
        let mut recipes = self.list_saved();
        let before = recipes.len();
        recipes.retain(|r| r.title() != title);
        if recipes.len() == before {
            return Ok(false);
        }
        self.write(&recipes)?;
        tracing::debug!(title = title, "Deleted recipe");
        Ok(true)
    }

    fn write(&self, recipes: &[SavedRecipe]) -> Result<(), StoreError> {
        let json = serde_json::to_string(recipes)?;
        self.store.set(COOKBOOK_KEY, &json)
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}

/// Entries whose title or meal type contains `term`, ignoring case.
///
/// An empty term matches everything.
pub fn search<'a>(recipes: &'a [SavedRecipe], term: &str) -> Vec<&'a SavedRecipe> {
    let needle = term.to_lowercase();
    recipes
        .iter()
        .filter(|r| {
            r.title().to_lowercase().contains(&needle)
                || r.recipe.meal_type.to_lowercase().contains(&needle)
        })
        .collect()
}
