//! End-to-end flow: generate a recipe, keep it in a cookbook on disk, rate it,
//! delete it.
//!
//! Uses `FakeAiClient` in place of the live model and a `FileStore` in a temp
//! directory.

use std::sync::Arc;

use chefgenie_core::ai::FakeAiClient;
use chefgenie_core::{
    ChefClient, Cookbook, FileStore, GenerationError, MealType, Rating, RecipeGenerator,
    RecipeRequest, StoreError,
};
use tempfile::TempDir;

/// What the model sends back for the chicken and rice request.
const CHICKEN_RICE: &str = r#"{
    "title": "One-Pan Chicken and Rice",
    "description": "Golden chicken thighs baked over garlicky rice.",
    "mealType": "Dinner",
    "servings": 4,
    "prepTimeMinutes": 15,
    "cookTimeMinutes": 45,
    "caloriesPerServing": 610,
    "difficulty": "Easy",
    "ingredients": [
        {"name": "chicken thighs", "amount": "8 pieces"},
        {"name": "long-grain rice", "amount": "1.5 cups", "notes": "rinsed"},
        {"name": "chicken stock", "amount": "3 cups"}
    ],
    "instructions": [
        "Brown the chicken skin-side down.",
        "Toast the rice in the drippings.",
        "Add stock, nestle chicken on top and bake for 35 minutes."
    ],
    "chefTips": ["Let it rest 10 minutes before fluffing the rice."]
}"#;

fn generator(client: FakeAiClient) -> ChefClient {
    ChefClient::new(Arc::new(client))
}

#[tokio::test]
async fn test_generate_save_rate_delete() {
    let temp_dir = TempDir::new().unwrap();
    let cookbook = Cookbook::new(FileStore::new(temp_dir.path()));
    let chef = generator(
        FakeAiClient::with_response("chicken, rice", CHICKEN_RICE).with_image("image/png", "AAAA"),
    );

    let request = RecipeRequest::new(MealType::Dinner, "chicken, rice", None, 4);
    let recipe = chef.generate_recipe(&request).await.unwrap();
    assert_eq!(recipe.servings, 4);

    let image = chef
        .generate_recipe_image(&recipe.title, &recipe.description)
        .await;

    let saved = cookbook.save(recipe.clone(), image, None, None).unwrap();
    let listed = cookbook.list_saved();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title(), "One-Pan Chicken and Rice");
    assert_eq!(listed[0].id, saved.id);
    assert!(!saved.id.is_empty());
    assert_eq!(
        listed[0].image_url.as_deref(),
        Some("data:image/png;base64,AAAA")
    );

    let four_stars = Rating::from_stars(4).unwrap();
    assert!(cookbook
        .update_rating_or_notes(&recipe.title, four_stars, None)
        .unwrap());
    let listed = cookbook.list_saved();
    assert_eq!(listed[0].rating.map(|r| r.stars()), Some(4));
    assert_eq!(listed[0].id, saved.id);
    assert_eq!(listed[0].saved_at, saved.saved_at);

    assert!(cookbook.delete(&recipe.title).unwrap());
    assert!(cookbook.list_saved().is_empty());
}

#[tokio::test]
async fn test_cookbook_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let chef = generator(FakeAiClient::with_response("chicken", CHICKEN_RICE));
    let request = RecipeRequest::new(MealType::Dinner, "chicken, rice", None, 4);
    let recipe = chef.generate_recipe(&request).await.unwrap();

    let saved = Cookbook::new(FileStore::new(temp_dir.path()))
        .save(recipe, None, None, Some("double the garlic".to_string()))
        .unwrap();

    let reopened = Cookbook::new(FileStore::new(temp_dir.path()));
    let found = reopened.find("One-Pan Chicken and Rice").unwrap();
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_generation_never_returns_partial_recipe() {
    let mut no_steps: serde_json::Value = serde_json::from_str(CHICKEN_RICE).unwrap();
    no_steps["instructions"] = serde_json::json!([]);
    let no_steps = no_steps.to_string();

    let replies: [&str; 4] = [
        "",
        "not json at all",
        r#"{"title": "Only a title"}"#,
        &no_steps,
    ];

    for reply in replies {
        let chef = generator(FakeAiClient::with_response("chicken", reply));
        let request = RecipeRequest::new(MealType::Dinner, "chicken, rice", None, 4);
        match chef.generate_recipe(&request).await {
            Ok(recipe) => panic!("expected an error, got {:?}", recipe.title),
            Err(
                GenerationError::EmptyResponse
                | GenerationError::InvalidJson(_)
                | GenerationError::InvalidRecipe(_),
            ) => {}
            Err(other) => panic!("unexpected error kind: {}", other),
        }
    }
}

#[tokio::test]
async fn test_quota_exceeded_by_image() {
    let temp_dir = TempDir::new().unwrap();
    let cookbook = Cookbook::new(FileStore::new(temp_dir.path()).with_quota(Some(4096)));
    let chef = generator(FakeAiClient::with_response("chicken", CHICKEN_RICE));
    let recipe = chef
        .generate_recipe(&RecipeRequest::new(MealType::Dinner, "chicken", None, 4))
        .await
        .unwrap();

    let big_image = format!("data:image/png;base64,{}", "A".repeat(8192));
    let err = cookbook.save(recipe, Some(big_image), None, None).unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    assert!(cookbook.list_saved().is_empty());
}
