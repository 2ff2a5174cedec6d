//! Response parsing for consumers of the generation endpoint.
//!
//! The streamed body is one opaque text blob that is only parseable once
//! the stream ends. Models occasionally wrap their JSON in Markdown code
//! fences despite being told not to, so those are stripped first.

use crate::models::{DetectedIngredient, DetectedItem, Recipe, RecipeCard};
use crate::Result;

/// Trim the assembled body and remove Markdown code-fence markers.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decode an ingredient-detection response into confirmation-screen items.
///
/// Items get sequential `item-{idx}` ids and start selected.
pub fn parse_detected_items(body: &str) -> Result<Vec<DetectedItem>> {
    let ingredients: Vec<DetectedIngredient> = serde_json::from_str(&strip_code_fences(body))?;

    Ok(ingredients
        .into_iter()
        .enumerate()
        .map(|(idx, ingredient)| DetectedItem {
            id: format!("item-{}", idx),
            name: ingredient.name,
            confidence: ingredient.confidence,
            selected: true,
        })
        .collect())
}

/// Decode a recipe-generation response into display cards with
/// sequential `recipe-{idx}` ids.
pub fn parse_recipe_cards(body: &str) -> Result<Vec<RecipeCard>> {
    let recipes: Vec<Recipe> = serde_json::from_str(&strip_code_fences(body))?;

    Ok(recipes
        .into_iter()
        .enumerate()
        .map(|(idx, recipe)| RecipeCard {
            id: format!("recipe-{}", idx),
            recipe,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("  [1,2]  "), "[1,2]");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_fenced_output_parses_after_stripping() {
        let stripped = strip_code_fences("```json\n[1,2]\n```");
        let values: Vec<i32> = serde_json::from_str(&stripped).unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_parse_detected_items_decorates_ids_and_selection() {
        let body = r#"[
            {"name": "Tomato", "confidence": 0.9},
            {"name": "Basil", "confidence": 0.75}
        ]"#;

        let items = parse_detected_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "item-0");
        assert_eq!(items[0].name, "Tomato");
        assert_eq!(items[0].confidence, 0.9);
        assert!(items[0].selected);
        assert_eq!(items[1].id, "item-1");
    }

    #[test]
    fn test_parse_detected_items_from_fenced_body() {
        let body = "```json\n[{\"name\":\"Tomato\",\"confidence\":0.9}]\n```";
        let items = parse_detected_items(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tomato");
    }

    #[test]
    fn test_parse_recipe_cards() {
        let body = r#"[{
            "title": "Tomato Soup",
            "description": "A simple soup",
            "prepTime": "10 min",
            "cookTime": "25 min",
            "servings": 4,
            "difficulty": "Medium",
            "ingredients": ["4 tomatoes"],
            "instructions": ["Chop", "Simmer"],
            "matchPercentage": 92
        }]"#;

        let cards = parse_recipe_cards(body).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "recipe-0");
        assert_eq!(cards[0].recipe.title, "Tomato Soup");
        assert_eq!(cards[0].recipe.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_prose_output_is_a_parse_error() {
        assert!(parse_detected_items("Here are your ingredients!").is_err());
    }
}
