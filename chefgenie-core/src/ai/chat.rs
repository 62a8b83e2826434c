//! Conversational help for a recipe: questions and tweaks.

use crate::ai::prompts::ask_chef::{render_ask_chef_prompt, ASK_CHEF_PROMPT_NAME};
use crate::ai::prompts::recipe_schema;
use crate::ai::prompts::tweak_recipe::{render_tweak_recipe_prompt, TWEAK_RECIPE_PROMPT_NAME};
use crate::ai::{AiClient, ChatMessage, ChatRequest};
use crate::error::GenerationError;
use crate::types::Recipe;

/// Answer shown when the chef cannot be reached.
pub const CHAT_FALLBACK_ANSWER: &str = "I'm having trouble thinking of an answer right now.";

/// Ask a free-form question about a recipe.
///
/// Never fails: remote errors and empty answers become [`CHAT_FALLBACK_ANSWER`].
pub async fn ask_chef_about_recipe(
    ai_client: &dyn AiClient,
    recipe: &Recipe,
    question: &str,
) -> String {
    let request = ChatRequest {
        messages: vec![ChatMessage::user(render_ask_chef_prompt(recipe, question))],
        ..Default::default()
    };

    match ai_client.complete(ASK_CHEF_PROMPT_NAME, request).await {
        Ok(response) if !response.content.trim().is_empty() => response.content,
        Ok(_) => CHAT_FALLBACK_ANSWER.to_string(),
        Err(e) => {
            tracing::warn!(recipe = %recipe.title, "Chef chat failed: {}", e);
            CHAT_FALLBACK_ANSWER.to_string()
        }
    }
}

/// Rewrite a recipe according to user feedback.
///
/// The model gets the complete recipe and must return a complete replacement
/// under the same schema.
pub async fn tweak_recipe(
    ai_client: &dyn AiClient,
    recipe: &Recipe,
    feedback: &str,
) -> Result<Recipe, GenerationError> {
    let recipe_json =
        serde_json::to_string(recipe).map_err(|e| GenerationError::InvalidJson(e.to_string()))?;

    let request = ChatRequest {
        messages: vec![ChatMessage::user(render_tweak_recipe_prompt(
            &recipe_json,
            feedback,
        ))],
        response_schema: Some(recipe_schema()),
        ..Default::default()
    };

    let response = ai_client.complete(TWEAK_RECIPE_PROMPT_NAME, request).await?;

    Recipe::from_model_json(&response.content)
}
