//! AI prompt templates.

pub mod ask_chef;
pub mod generate_recipe;
pub mod recipe_image;
pub mod schema;
pub mod tweak_recipe;

pub use ask_chef::render_ask_chef_prompt;
pub use generate_recipe::render_generate_recipe_prompt;
pub use recipe_image::render_recipe_image_prompt;
pub use schema::recipe_schema;
pub use tweak_recipe::render_tweak_recipe_prompt;
