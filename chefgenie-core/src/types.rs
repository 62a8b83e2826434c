//! Recipe request and recipe types shared by the generator, cookbook and front ends.
//!
//! Field names serialize in camelCase so the same shapes work for the model's
//! structured output and for the stored cookbook.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Smallest serving count the request form accepts.
pub const MIN_SERVINGS: u32 = 1;

/// Largest serving count the request form accepts.
pub const MAX_SERVINGS: u32 = 12;

/// Kind of meal the user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Brunch,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    #[serde(rename = "Surprise Me")]
    SurpriseMe,
}

impl MealType {
    pub const ALL: [MealType; 7] = [
        MealType::Breakfast,
        MealType::Brunch,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Dessert,
        MealType::SurpriseMe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Brunch => "Brunch",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Dessert => "Dessert",
            MealType::SurpriseMe => "Surprise Me",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if normalized.eq_ignore_ascii_case("surprise") {
            return Ok(MealType::SurpriseMe);
        }
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| {
                let options: Vec<&str> = MealType::ALL.iter().map(|m| m.as_str()).collect();
                format!("Unknown meal type '{}'. Expected one of: {}", s, options.join(", "))
            })
    }
}

/// What the user asked for. Built per submission and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub meal_type: MealType,
    pub available_ingredients: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    pub servings: u32,
}

impl RecipeRequest {
    /// Build a request, clamping `servings` into the accepted range.
    pub fn new(
        meal_type: MealType,
        available_ingredients: impl Into<String>,
        dietary_restrictions: Option<String>,
        servings: u32,
    ) -> Self {
        Self {
            meal_type,
            available_ingredients: available_ingredients.into(),
            dietary_restrictions: dietary_restrictions.filter(|d| !d.trim().is_empty()),
            servings: servings.clamp(MIN_SERVINGS, MAX_SERVINGS),
        }
    }

    /// Step the serving count up or down, staying within the accepted range.
    pub fn adjust_servings(&mut self, delta: i32) {
        let next = i64::from(self.servings) + i64::from(delta);
        self.servings = next.clamp(i64::from(MIN_SERVINGS), i64::from(MAX_SERVINGS)) as u32;
    }
}

impl Default for RecipeRequest {
    fn default() -> Self {
        Self::new(MealType::Dinner, "", None, 2)
    }
}

/// Difficulty rating the model is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [&'static str; 3] = ["Easy", "Medium", "Hard"];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Quantity and unit, free text (e.g. "2 cups").
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A generated recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub meal_type: String,
    pub servings: u32,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_serving: Option<u32>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub chef_tips: Vec<String>,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl Recipe {
    /// Parse model output into a recipe, rejecting anything incomplete.
    pub fn from_model_json(text: &str) -> Result<Self, GenerationError> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        let recipe: Recipe = serde_json::from_str(body)
            .map_err(|e| GenerationError::InvalidJson(e.to_string()))?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Check the fields a usable recipe cannot do without.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.title.trim().is_empty() {
            return Err(GenerationError::InvalidRecipe("title is empty".to_string()));
        }
        if self.ingredients.is_empty() {
            return Err(GenerationError::InvalidRecipe(
                "recipe has no ingredients".to_string(),
            ));
        }
        if self.instructions.is_empty() {
            return Err(GenerationError::InvalidRecipe(
                "recipe has no instructions".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }
}

/// Models sometimes wrap JSON in a ```json fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    /// A star count of 0 means "not rated".
    pub fn from_stars(stars: u8) -> Result<Option<Self>, String> {
        match stars {
            0 => Ok(None),
            1..=Self::MAX => Ok(Some(Self(stars))),
            _ => Err(format!("Rating must be between 1 and {}, got {}", Self::MAX, stars)),
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::from_stars(value)?.ok_or_else(|| "Rating of 0 is not a valid star count".to_string())
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A recipe kept in the cookbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SavedRecipe {
    pub fn title(&self) -> &str {
        &self.recipe.title
    }
}
