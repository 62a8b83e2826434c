//! The four model-backed recipe operations behind one seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ai::{self, AiClient, AiError, GeminiClient};
use crate::error::GenerationError;
use crate::types::{Recipe, RecipeRequest};

/// Everything the front ends need from the generative model.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate_recipe(&self, request: &RecipeRequest) -> Result<Recipe, GenerationError>;

    /// Best effort; `None` when no image is available.
    async fn generate_recipe_image(&self, title: &str, description: &str) -> Option<String>;

    /// Best effort; falls back to a fixed answer.
    async fn ask_chef_about_recipe(&self, recipe: &Recipe, question: &str) -> String;

    async fn tweak_recipe(&self, recipe: &Recipe, feedback: &str)
        -> Result<Recipe, GenerationError>;
}

/// [`RecipeGenerator`] over any [`AiClient`].
#[derive(Clone)]
pub struct ChefClient {
    ai_client: Arc<dyn AiClient>,
}

impl ChefClient {
    pub fn new(ai_client: Arc<dyn AiClient>) -> Self {
        Self { ai_client }
    }

    /// Client talking to Gemini, configured from the environment.
    pub fn from_env() -> Result<Self, AiError> {
        Ok(Self::new(Arc::new(GeminiClient::from_env()?)))
    }
}

impl std::fmt::Debug for ChefClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChefClient")
            .field("model", &self.ai_client.model_name())
            .finish()
    }
}

#[async_trait]
impl RecipeGenerator for ChefClient {
    async fn generate_recipe(&self, request: &RecipeRequest) -> Result<Recipe, GenerationError> {
        ai::generate_recipe(self.ai_client.as_ref(), request).await
    }

    async fn generate_recipe_image(&self, title: &str, description: &str) -> Option<String> {
        ai::generate_recipe_image(self.ai_client.as_ref(), title, description).await
    }

    async fn ask_chef_about_recipe(&self, recipe: &Recipe, question: &str) -> String {
        ai::ask_chef_about_recipe(self.ai_client.as_ref(), recipe, question).await
    }

    async fn tweak_recipe(
        &self,
        recipe: &Recipe,
        feedback: &str,
    ) -> Result<Recipe, GenerationError> {
        ai::tweak_recipe(self.ai_client.as_ref(), recipe, feedback).await
    }
}
