mod forkify;

pub use forkify::ForkifyClient;

use async_trait::async_trait;

use crate::error::ForkifyError;
use crate::model::{Recipe, SearchResult};
use crate::upload::NewRecipe;

/// Remote source of recipes
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Fetch a single recipe by id
    async fn get_recipe(&self, id: &str) -> Result<Recipe, ForkifyError>;

    /// Search recipes by free-text query
    async fn get_search_results(&self, query: &str) -> Result<Vec<SearchResult>, ForkifyError>;

    /// Upload a new recipe, returning it as stored by the API (with its new id)
    async fn post_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, ForkifyError>;
}
