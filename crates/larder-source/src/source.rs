use std::future::Future;
use std::time::Duration;

use larder_core::{FetchError, RecipeRecord, RecipeSummary};

use crate::protocol::{GetResponse, SearchResponse};

/// The recipe catalog.
pub trait RecipeSource: Send + Sync {
    /// Search the catalog. Results come back in the provider's order.
    fn search_recipes(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RecipeSummary>, FetchError>> + Send;

    /// Fetch one recipe by id.
    fn get_recipe(&self, id: &str) -> impl Future<Output = Result<RecipeRecord, FetchError>> + Send;
}

/// HTTP client for the provider's JSON API.
pub struct HttpRecipeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecipeSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client with a per-request timeout enforced by reqwest.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl RecipeSource for HttpRecipeSource {
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, FetchError> {
        let response: SearchResponse = self.get_json("search", &[("q", query)]).await?;

        if let Some(error) = &response.error {
            tracing::warn!("Provider returned no recipes for {:?}: {}", query, error);
        }
        tracing::debug!(
            "Search {:?} returned {} of {} recipes",
            query,
            response.recipes.len(),
            response.count
        );

        Ok(response.recipes.into_iter().map(Into::into).collect())
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeRecord, FetchError> {
        let response: GetResponse = self.get_json("get", &[("rId", id)]).await?;
        Ok(response.recipe.into())
    }
}
