//! AI client module for Gemini integration.
//!
//! This module provides:
//! - `AiClient` trait for abstracting the generative model
//! - `GeminiClient` implementation over the Gemini REST API
//! - `FakeAiClient` for deterministic tests
//! - Prompt templates and the recipe response schema
//! - The recipe operations built on top: generation, image, chat and tweak
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `GEMINI_API_KEY` (required): Your Gemini API key
//! - `CHEFGENIE_TEXT_MODEL` (optional): Model for recipes and chat
//! - `CHEFGENIE_IMAGE_MODEL` (optional): Model for recipe photos
//! - `CHEFGENIE_AI_BASE_URL` (optional): API base URL
//!
//! # Example
//!
//! ```ignore
//! use chefgenie_core::ai::{generate_recipe, GeminiClient};
//! use chefgenie_core::types::{MealType, RecipeRequest};
//!
//! let client = GeminiClient::from_env()?;
//! let request = RecipeRequest::new(MealType::Dinner, "chicken, rice", None, 4);
//! let recipe = generate_recipe(&client, &request).await?;
//! println!("{}", recipe.title);
//! ```

mod chat;
mod client;
mod config;
mod fake;
mod generate;
pub mod prompts;
mod types;

pub use chat::{ask_chef_about_recipe, tweak_recipe, CHAT_FALLBACK_ANSWER};
pub use client::{AiClient, AiError, GeminiClient};
pub use config::{AiConfig, ConfigError};
pub use fake::FakeAiClient;
pub use generate::{generate_recipe, generate_recipe_image};
pub use types::{ChatMessage, ChatRequest, ChatResponse, InlineImage, Role, Usage};
