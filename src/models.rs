//! Data models and structures
//!
//! Defines the request/response shapes for the generation endpoint, the
//! ingredient and recipe types produced by the prompt contracts, and the
//! environment-derived configuration.

use serde::{Deserialize, Serialize};

/// Body of a `POST /api/generate` call.
///
/// Both fields are optional; a request with neither produces an empty-parts
/// provider call rather than a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Data-URL-encoded image (`data:<mime>;base64,...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// JSON error body returned by the endpoint before any bytes are streamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    /// Seconds the caller should wait; only set for rate-limit responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Wire shape the ingredient-detection prompt asks the model to emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
}

/// A detected ingredient decorated for the confirmation screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedItem {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Wire shape the recipe-generation prompt asks the model to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// How well the recipe uses the available ingredients, 0-100.
    pub match_percentage: u8,
}

/// A recipe decorated with a synthetic identifier for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub id: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Generic("GEMINI_API_KEY not set".to_string()))?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-lite".to_string()),
        })
    }
}
