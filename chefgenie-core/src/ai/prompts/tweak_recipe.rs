//! Prompt for rewriting a recipe according to user feedback.

/// Prompt name for logs.
pub const TWEAK_RECIPE_PROMPT_NAME: &str = "tweak_recipe";

/// Render the tweak prompt. `recipe_json` is the full current recipe.
pub fn render_tweak_recipe_prompt(recipe_json: &str, feedback: &str) -> String {
    format!(
        r#"The user wants to modify the following recipe.
Original Recipe JSON: {recipe_json}
User Feedback: "{feedback}"
Return the FULL updated recipe as JSON."#,
        recipe_json = recipe_json,
        feedback = feedback.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let recipe = r#"{"title": "Chicken Stir Fry"}"#;
        let prompt = render_tweak_recipe_prompt(recipe, "make it vegan ");
        assert!(prompt.contains(r#"Original Recipe JSON: {"title": "Chicken Stir Fry"}"#));
        assert!(prompt.contains("User Feedback: \"make it vegan\""));
        assert!(prompt.contains("FULL updated recipe"));
    }
}
