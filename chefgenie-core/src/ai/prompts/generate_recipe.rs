//! Prompt for generating a new recipe from what the user has on hand.

use crate::types::RecipeRequest;

/// Prompt name for logs.
pub const GENERATE_RECIPE_PROMPT_NAME: &str = "generate_recipe";

/// Render the recipe generation prompt for a request.
pub fn render_generate_recipe_prompt(request: &RecipeRequest) -> String {
    let dietary = request
        .dietary_restrictions
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("None");

    format!(
        r#"Create a unique, complete meal recipe for {meal_type}.
Context: The user has the following ingredients available (try to use them but you can add others): "{ingredients}".
Dietary restrictions: "{dietary}".
Scale the recipe exactly for {servings} serving(s).

The recipe should be creative but practical.
Return the response in JSON format."#,
        meal_type = request.meal_type,
        ingredients = request.available_ingredients.trim(),
        dietary = dietary,
        servings = request.servings
    )
}
