//! Prompt for a food photo of a generated recipe.

pub const RECIPE_IMAGE_PROMPT_NAME: &str = "recipe_image";

pub fn render_recipe_image_prompt(title: &str, description: &str) -> String {
    format!(
        "A professional, appetizing food photography shot of {title}. {description}. \
         High resolution, culinary magazine style, beautiful lighting, photorealistic.",
        title = title.trim(),
        description = description.trim().trim_end_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_recipe_image_prompt("Shakshuka", "Eggs poached in spiced tomato.");
        assert!(prompt.starts_with("A professional, appetizing food photography shot of Shakshuka."));
        assert!(prompt.contains("Eggs poached in spiced tomato. High resolution"));
        assert!(!prompt.contains(".."));
    }
}
