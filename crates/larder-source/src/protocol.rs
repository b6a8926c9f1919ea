use serde::{Deserialize, Serialize};

use larder_core::{RecipeRecord, RecipeSummary};

/// Response body of the provider's search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub recipes: Vec<WireSummary>,
    /// Set by the provider instead of `recipes` when it refuses a query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSummary {
    pub recipe_id: String,
    pub title: String,
    pub image_url: String,
    pub publisher: String,
}

impl From<WireSummary> for RecipeSummary {
    fn from(w: WireSummary) -> Self {
        Self {
            id: w.recipe_id,
            title: w.title,
            image_url: w.image_url,
            publisher: w.publisher,
        }
    }
}

/// Response body of the provider's recipe endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub recipe: WireRecipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecipe {
    pub recipe_id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    pub source_url: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl From<WireRecipe> for RecipeRecord {
    fn from(w: WireRecipe) -> Self {
        Self {
            id: w.recipe_id,
            title: w.title,
            publisher: w.publisher,
            image_url: w.image_url,
            source_url: w.source_url,
            ingredients: w.ingredients,
        }
    }
}
