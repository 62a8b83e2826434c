//! Structured-output schema for recipe responses.

use serde_json::{json, Value};

use crate::types::Difficulty;

/// The object schema every recipe response is constrained to.
///
/// Uses the OpenAPI subset Gemini accepts for `responseSchema`.
pub fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "mealType": { "type": "STRING" },
            "servings": { "type": "INTEGER" },
            "prepTimeMinutes": { "type": "INTEGER" },
            "cookTimeMinutes": { "type": "INTEGER" },
            "caloriesPerServing": { "type": "INTEGER" },
            "difficulty": { "type": "STRING", "enum": Difficulty::ALL },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "amount": { "type": "STRING", "description": "Quantity and unit" },
                        "notes": { "type": "STRING", "nullable": true }
                    },
                    "required": ["name", "amount"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "chefTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "title",
            "description",
            "ingredients",
            "instructions",
            "servings",
            "prepTimeMinutes",
            "cookTimeMinutes"
        ]
    })
}
