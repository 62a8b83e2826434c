//! Recipe generation and recipe photos.

use crate::ai::prompts::generate_recipe::{
    render_generate_recipe_prompt, GENERATE_RECIPE_PROMPT_NAME,
};
use crate::ai::prompts::recipe_image::{render_recipe_image_prompt, RECIPE_IMAGE_PROMPT_NAME};
use crate::ai::prompts::recipe_schema;
use crate::ai::{AiClient, ChatMessage, ChatRequest};
use crate::error::GenerationError;
use crate::types::{Recipe, RecipeRequest};

/// Generate a recipe for the request.
///
/// The model is constrained to the recipe schema and its output is validated;
/// anything unusable is an error. No retry.
pub async fn generate_recipe(
    ai_client: &dyn AiClient,
    request: &RecipeRequest,
) -> Result<Recipe, GenerationError> {
    let prompt = render_generate_recipe_prompt(request);
    let chat_request = ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        response_schema: Some(recipe_schema()),
        ..Default::default()
    };

    let response = ai_client
        .complete(GENERATE_RECIPE_PROMPT_NAME, chat_request)
        .await?;

    Recipe::from_model_json(&response.content)
}

/// Generate a food photo for a recipe, as a `data:` URI.
///
/// Best effort: any failure is logged and reported as `None`.
pub async fn generate_recipe_image(
    ai_client: &dyn AiClient,
    title: &str,
    description: &str,
) -> Option<String> {
    let prompt = render_recipe_image_prompt(title, description);

    match ai_client
        .generate_image(RECIPE_IMAGE_PROMPT_NAME, &prompt)
        .await
    {
        Ok(Some(image)) => Some(image.to_data_uri()),
        Ok(None) => {
            tracing::debug!(title = title, "Image model returned no image part");
            None
        }
        Err(e) => {
            tracing::warn!(title = title, "Image generation failed: {}", e);
            None
        }
    }
}
