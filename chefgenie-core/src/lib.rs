pub mod ai;
pub mod cookbook;
pub mod error;
pub mod generator;
pub mod session;
pub mod types;
pub mod voice;

pub use cookbook::{search, Cookbook, FileStore, KeyValueStore, MemoryStore, Saveable};
pub use error::{GenerationError, StoreError, VoiceError};
pub use generator::{ChefClient, RecipeGenerator};
pub use session::{ActiveRecipe, ImageState, ImageTicket, Session, View};
pub use types::{
    Difficulty, Ingredient, MealType, Rating, Recipe, RecipeRequest, SavedRecipe, MAX_SERVINGS,
    MIN_SERVINGS,
};
