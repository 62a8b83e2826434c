//! Plain-text rendering of recipes for the terminal.

use chefgenie_core::{ImageState, Rating, Recipe, SavedRecipe};

use crate::image::approximate_size;

pub fn stars(rating: Option<Rating>) -> String {
    let filled = rating.map(|r| r.stars()).unwrap_or(0);
    (1..=Rating::MAX)
        .map(|i| if i <= filled { '★' } else { '☆' })
        .collect()
}

/// Full recipe card. Saved recipes also show rating, date and notes.
pub fn recipe_card(recipe: &Recipe, saved: Option<&SavedRecipe>) -> String {
    let mut lines = vec![recipe.title.clone(), recipe.description.clone(), String::new()];

    let mut facts = vec![
        recipe.meal_type.clone(),
        format!("Serves {}", recipe.servings),
        format!("Prep {} min", recipe.prep_time_minutes),
        format!("Cook {} min", recipe.cook_time_minutes),
        format!("Total {} min", recipe.total_time_minutes()),
        recipe.difficulty.to_string(),
    ];
    if let Some(calories) = recipe.calories_per_serving {
        facts.push(format!("{} kcal/serving", calories));
    }
    facts.retain(|f| !f.is_empty());
    lines.push(facts.join(" | "));

    if let Some(saved) = saved {
        lines.push(format!("Rating: {}", stars(saved.rating)));
        lines.push(format!("Saved: {}", saved.saved_at.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.push(String::new());
    lines.push("Ingredients".to_string());
    lines.extend(recipe.ingredients.iter().map(|ingredient| match &ingredient.notes {
        Some(notes) => format!("  - {} {} ({})", ingredient.amount, ingredient.name, notes),
        None => format!("  - {} {}", ingredient.amount, ingredient.name),
    }));

    lines.push(String::new());
    lines.push("Instructions".to_string());
    lines.extend(
        recipe
            .instructions
            .iter()
            .enumerate()
            .map(|(i, step)| format!("  {}. {}", i + 1, step)),
    );

    if !recipe.chef_tips.is_empty() {
        lines.push(String::new());
        lines.push("Chef's tips".to_string());
        lines.extend(recipe.chef_tips.iter().map(|tip| format!("  * {}", tip)));
    }

    if let Some(notes) = saved.and_then(|s| s.notes.as_deref()) {
        lines.push(String::new());
        lines.push("Notes".to_string());
        lines.push(format!("  {}", notes));
    }

    let mut card = lines.join("\n");
    card.push('\n');
    card
}

pub fn photo_line(image: &ImageState) -> Option<String> {
    match image {
        ImageState::None => None,
        ImageState::Pending => Some("Photo: still plating".to_string()),
        ImageState::Ready(uri) => Some(format!("Photo: ready ({} KB)", approximate_size(uri) / 1024)),
        ImageState::Unavailable => Some("Photo: unavailable for this recipe".to_string()),
    }
}

/// One line per cookbook entry.
pub fn list_line(saved: &SavedRecipe) -> String {
    let photo = if saved.image_url.is_some() { " [photo]" } else { "" };
    format!(
        "{}  {}  ({}, {}){}",
        stars(saved.rating),
        saved.title(),
        saved.recipe.meal_type,
        saved.saved_at.format("%Y-%m-%d"),
        photo
    )
}
