use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::api::RecipeApi;
use crate::config::Settings;
use crate::error::ForkifyError;
use crate::model::{Ingredient, Recipe, SearchResult};
use crate::upload::NewRecipe;

/// HTTP client for the Forkify recipes API
pub struct ForkifyClient {
    client: Client,
    base_url: String,
    key: Option<String>,
    timeout_secs: u64,
}

impl ForkifyClient {
    /// Create a client from settings
    pub fn new(settings: &Settings) -> Result<Self, ForkifyError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent("forkify/0.1")
            .build()?;

        Ok(ForkifyClient {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            key: settings.api_key.clone(),
            timeout_secs: settings.timeout_secs,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, key: Option<String>, timeout: Duration) -> Self {
        ForkifyClient {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
            timeout_secs: timeout.as_secs(),
        }
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ForkifyError> {
        let response = self
            .with_key(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        debug!("API responded {} ({} bytes)", status, body.len());

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ForkifyError::Api {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() || envelope.status != "success" {
            return Err(ForkifyError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("API returned status '{}'", envelope.status)),
            });
        }

        envelope
            .data
            .ok_or_else(|| ForkifyError::MalformedPayload("response has no data".to_string()))
    }

    /// `{base_url}/{id}`, with `id` escaped as a single path segment
    fn recipe_url(&self, id: &str) -> Result<Url, ForkifyError> {
        let invalid = || ForkifyError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ForkifyError {
        if err.is_timeout() {
            ForkifyError::Timeout(self.timeout_secs)
        } else {
            ForkifyError::Fetch(err)
        }
    }
}

#[async_trait]
impl RecipeApi for ForkifyClient {
    async fn get_recipe(&self, id: &str) -> Result<Recipe, ForkifyError> {
        let url = self.recipe_url(id)?;
        debug!("GET {}", url);

        let data: RecipeData = self.send(self.client.get(url)).await?;
        Ok(data.recipe.into())
    }

    async fn get_search_results(&self, query: &str) -> Result<Vec<SearchResult>, ForkifyError> {
        debug!("GET {}?search={}", self.base_url, query);

        let data: SearchData = self
            .send(self.client.get(&self.base_url).query(&[("search", query)]))
            .await?;
        Ok(data.recipes.into_iter().map(Into::into).collect())
    }

    async fn post_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, ForkifyError> {
        debug!("POST {} ({})", self.base_url, recipe.title);

        let data: RecipeData = self
            .send(self.client.post(&self.base_url).json(recipe))
            .await?;
        Ok(data.recipe.into())
    }
}

/// `{ "status": ..., "message": ..., "data": ... }`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RecipeData {
    recipe: RecipeDto,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    recipes: Vec<SearchResultDto>,
}

#[derive(Debug, Deserialize)]
struct RecipeDto {
    id: String,
    title: String,
    #[serde(default)]
    publisher: String,
    #[serde(default)]
    source_url: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    servings: u32,
    #[serde(default)]
    cooking_time: u32,
    #[serde(default)]
    ingredients: Vec<IngredientDto>,
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientDto {
    quantity: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResultDto {
    id: String,
    title: String,
    #[serde(default)]
    publisher: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    key: Option<String>,
}

impl From<RecipeDto> for Recipe {
    fn from(dto: RecipeDto) -> Self {
        Recipe {
            id: dto.id,
            title: dto.title,
            publisher: dto.publisher,
            source_url: dto.source_url,
            image_url: dto.image_url,
            servings: dto.servings.max(1),
            cooking_time: dto.cooking_time,
            ingredients: dto
                .ingredients
                .into_iter()
                .map(|ing| Ingredient {
                    quantity: ing.quantity,
                    unit: ing.unit.unwrap_or_default(),
                    description: ing.description.unwrap_or_default(),
                })
                .collect(),
            key: dto.key,
            bookmarked: false,
        }
    }
}

impl From<SearchResultDto> for SearchResult {
    fn from(dto: SearchResultDto) -> Self {
        SearchResult {
            id: dto.id,
            title: dto.title,
            publisher: dto.publisher,
            image_url: dto.image_url,
            key: dto.key,
        }
    }
}
