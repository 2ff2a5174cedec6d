pub const INGREDIENT_DETECTION: &str = include_str!("../data/prompts/ingredient_detection.txt");
pub const RECIPE_GENERATION: &str = include_str!("../data/prompts/recipe_generation.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Render the recipe-generation prompt for a confirmed ingredient list.
pub fn recipe_generation(ingredients: &[String]) -> String {
    render(
        RECIPE_GENERATION,
        &[("ingredients", ingredients.join(", ").as_str())],
    )
}
