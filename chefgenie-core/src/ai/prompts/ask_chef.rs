//! Prompt for a single question about the current recipe.

use crate::types::Recipe;

pub const ASK_CHEF_PROMPT_NAME: &str = "ask_chef";

pub fn render_ask_chef_prompt(recipe: &Recipe, question: &str) -> String {
    format!(
        r#"You are a helpful, knowledgeable chef assistant.
Current Recipe Context: {title}.
User Question: "{question}"
Answer concisely."#,
        title = recipe.title,
        question = question.trim()
    )
}
