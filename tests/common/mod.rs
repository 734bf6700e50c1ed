#![allow(dead_code)]

use async_trait::async_trait;
use forkify::{
    ForkifyError, Ingredient, KeyValueStore, MemoryStore, NewRecipe, Pagination, Recipe,
    RecipeApi, SearchResult, Store, Views,
};
use forkify::views::{
    AddRecipeView, BookmarksView, Navigator, PaginationView, RecipeView, ResultsView, View,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn recipe(id: &str, servings: u32) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Pizza {id}"),
        publisher: "Closet Cooking".to_string(),
        source_url: format!("https://example.com/{id}"),
        image_url: format!("https://example.com/{id}.jpg"),
        servings,
        cooking_time: 30,
        ingredients: vec![
            Ingredient {
                quantity: Some(2.0),
                unit: "cups".to_string(),
                description: "flour".to_string(),
            },
            Ingredient {
                quantity: Some(0.5),
                unit: "tsp".to_string(),
                description: "yeast".to_string(),
            },
            Ingredient {
                quantity: None,
                unit: String::new(),
                description: "salt".to_string(),
            },
        ],
        key: None,
        bookmarked: false,
    }
}

pub fn search_results(n: usize) -> Vec<SearchResult> {
    (0..n)
        .map(|i| SearchResult {
            id: format!("r{i}"),
            title: format!("Pizza number {i}"),
            publisher: "Closet Cooking".to_string(),
            image_url: String::new(),
            key: None,
        })
        .collect()
}

/// In-memory API with optional per-recipe latency
#[derive(Default)]
pub struct MockApi {
    pub recipes: HashMap<String, Recipe>,
    pub results: Vec<SearchResult>,
    pub delays: HashMap<String, Duration>,
    pub search_delays: HashMap<String, Duration>,
    pub fail_search: bool,
    pub posted: Mutex<Vec<NewRecipe>>,
}

impl MockApi {
    pub fn with_recipes(ids: &[&str]) -> Self {
        MockApi {
            recipes: ids.iter().map(|id| (id.to_string(), recipe(id, 4))).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RecipeApi for MockApi {
    async fn get_recipe(&self, id: &str) -> Result<Recipe, ForkifyError> {
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        self.recipes
            .get(id)
            .cloned()
            .ok_or_else(|| ForkifyError::Api {
                status: 400,
                message: format!("Invalid _id: {id}"),
            })
    }

    async fn get_search_results(&self, query: &str) -> Result<Vec<SearchResult>, ForkifyError> {
        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_search {
            return Err(ForkifyError::Timeout(10));
        }
        let query = query.to_lowercase();
        Ok(self
            .results
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn post_recipe(&self, new_recipe: &NewRecipe) -> Result<Recipe, ForkifyError> {
        self.posted.lock().unwrap().push(new_recipe.clone());
        Ok(Recipe {
            id: "uploaded-1".to_string(),
            title: new_recipe.title.clone(),
            publisher: new_recipe.publisher.clone(),
            source_url: new_recipe.source_url.clone(),
            image_url: new_recipe.image_url.clone(),
            servings: new_recipe.servings,
            cooking_time: new_recipe.cooking_time,
            ingredients: new_recipe.ingredients.clone(),
            key: Some("test-key".to_string()),
            bookmarked: false,
        })
    }
}

/// Storage whose writes always fail
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> std::io::Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }

    fn remove(&mut self, _key: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Storage that serves what it was seeded with and refuses every change
pub struct ReadOnlyStore(MemoryStore);

impl ReadOnlyStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut inner = MemoryStore::new();
        inner.set(key, value).unwrap();
        ReadOnlyStore(inner)
    }
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> std::io::Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn remove(&mut self, _key: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
    }
}

pub fn store_with(api: MockApi, results_per_page: usize) -> Store {
    Store::new(Arc::new(api), Box::new(MemoryStore::new()), results_per_page)
}

/// Shared log of everything the views were asked to do
pub type RenderLog = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: RenderLog,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, entry));
    }
}

impl View for Recorder {
    fn render_spinner(&mut self) {
        self.push("spinner".to_string());
    }

    fn render_error(&mut self, message: Option<&str>) {
        self.push(format!("error:{}", message.unwrap_or("default")));
    }
}

impl RecipeView for Recorder {
    fn render(&mut self, recipe: &Recipe) {
        self.push(format!("render:{}", recipe.id));
    }

    fn update(&mut self, recipe: &Recipe) {
        self.push(format!("update:{}:{}:{}", recipe.id, recipe.servings, recipe.bookmarked));
    }
}

impl ResultsView for Recorder {
    fn render(&mut self, results: &[SearchResult], active_id: Option<&str>) {
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        self.push(format!("render:{}:{}", ids.join(","), active_id.unwrap_or("-")));
    }

    fn update(&mut self, results: &[SearchResult], active_id: Option<&str>) {
        self.push(format!("update:{}:{}", results.len(), active_id.unwrap_or("-")));
    }
}

impl PaginationView for Recorder {
    fn render(&mut self, pagination: &Pagination) {
        self.push(format!("render:{}/{}", pagination.current_page, pagination.num_pages));
    }
}

impl BookmarksView for Recorder {
    fn render(&mut self, bookmarks: &[Recipe], _active_id: Option<&str>) {
        let ids: Vec<&str> = bookmarks.iter().map(|r| r.id.as_str()).collect();
        self.push(format!("render:{}", ids.join(",")));
    }

    fn update(&mut self, bookmarks: &[Recipe], active_id: Option<&str>) {
        self.push(format!("update:{}:{}", bookmarks.len(), active_id.unwrap_or("-")));
    }
}

struct RecordingAddRecipe {
    recorder: Recorder,
    open: bool,
}

impl View for RecordingAddRecipe {
    fn render_spinner(&mut self) {
        self.recorder.render_spinner();
    }

    fn render_error(&mut self, message: Option<&str>) {
        self.recorder.render_error(message);
    }
}

impl AddRecipeView for RecordingAddRecipe {
    fn render_message(&mut self, _message: Option<&str>) {
        self.recorder.push("message".to_string());
    }

    fn open_window(&mut self) {
        self.open = true;
        self.recorder.push("open".to_string());
    }

    fn close_window(&mut self) {
        self.open = false;
        self.recorder.push("close".to_string());
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Navigator for Recorder {
    fn push_location(&mut self, id: &str) {
        self.push(format!("push:{}", id));
    }
}

/// Views that append to a shared log instead of drawing anything
pub fn recording_views() -> (Views, RenderLog) {
    let log: RenderLog = Arc::new(Mutex::new(Vec::new()));
    let recorder = |name| Recorder {
        name,
        log: Arc::clone(&log),
    };
    let views = Views {
        recipe: Box::new(recorder("recipe")),
        results: Box::new(recorder("results")),
        pagination: Box::new(recorder("pagination")),
        bookmarks: Box::new(recorder("bookmarks")),
        add_recipe: Box::new(RecordingAddRecipe {
            recorder: recorder("add"),
            open: false,
        }),
        navigator: Box::new(recorder("nav")),
    };
    (views, log)
}

pub fn entries(log: &RenderLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
