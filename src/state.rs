use log::{debug, info, warn};
use std::sync::Arc;

use crate::api::RecipeApi;
use crate::error::ForkifyError;
use crate::model::{BookmarkSet, Pagination, Recipe, SearchResult, SearchState};
use crate::storage::KeyValueStore;
use crate::upload::UploadForm;

/// Storage key the bookmark set is persisted under
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Kind of remote load a ticket was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Recipe,
    Search,
    Upload,
}

/// Sequence number handed out when a load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    kind: RequestKind,
    seq: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct RequestSequence {
    recipe: u64,
    search: u64,
    upload: u64,
}

impl RequestSequence {
    fn counter(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Recipe => &mut self.recipe,
            RequestKind::Search => &mut self.search,
            RequestKind::Upload => &mut self.upload,
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        let counter = self.counter(kind);
        *counter += 1;
        RequestTicket {
            kind,
            seq: *counter,
        }
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        let latest = match ticket.kind {
            RequestKind::Recipe => self.recipe,
            RequestKind::Search => self.search,
            RequestKind::Upload => self.upload,
        };
        latest == ticket.seq
    }
}

/// Whether a completed load was applied or discarded as superseded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Everything the views render from
#[derive(Debug, Clone)]
pub struct AppState {
    pub recipe: Option<Recipe>,
    pub search: SearchState,
    pub bookmarks: BookmarkSet,
}

/// Owner of the application state.
///
/// One store exists per session. Loads go through the [`RecipeApi`], bookmark
/// changes are written through to the [`KeyValueStore`].
pub struct Store {
    state: AppState,
    api: Arc<dyn RecipeApi>,
    storage: Box<dyn KeyValueStore + Send>,
    requests: RequestSequence,
}

impl Store {
    pub fn new(
        api: Arc<dyn RecipeApi>,
        storage: Box<dyn KeyValueStore + Send>,
        results_per_page: usize,
    ) -> Self {
        Store {
            state: AppState {
                recipe: None,
                search: SearchState::new(results_per_page),
                bookmarks: BookmarkSet::new(),
            },
            api,
            storage,
            requests: RequestSequence::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.state.recipe.as_ref()
    }

    pub fn search(&self) -> &SearchState {
        &self.state.search
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.state.bookmarks
    }

    /// Shared handle to the API client, for loads running outside the store
    pub fn api(&self) -> Arc<dyn RecipeApi> {
        Arc::clone(&self.api)
    }

    /// Read the persisted bookmark set. A corrupt value is logged and ignored.
    pub fn restore_bookmarks(&mut self) -> Result<usize, ForkifyError> {
        let Some(raw) = self.storage.get(BOOKMARKS_KEY)? else {
            return Ok(0);
        };

        match serde_json::from_str::<BookmarkSet>(&raw) {
            Ok(bookmarks) => {
                info!("Restored {} bookmarks", bookmarks.len());
                self.state.bookmarks = bookmarks;
                Ok(self.state.bookmarks.len())
            }
            Err(e) => {
                warn!("Ignoring unreadable bookmarks: {}", e);
                Ok(0)
            }
        }
    }

    /// Start a load of `kind`; any earlier ticket of the same kind becomes stale
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.requests.issue(kind)
    }

    /// Fetch the recipe `id` and make it the current recipe
    pub async fn load_recipe(&mut self, id: &str) -> Result<Applied, ForkifyError> {
        let ticket = self.begin(RequestKind::Recipe);
        let result = self.api.get_recipe(id).await;
        self.apply_recipe(ticket, result)
    }

    /// Apply the outcome of a recipe fetch started with `ticket`
    pub fn apply_recipe(
        &mut self,
        ticket: RequestTicket,
        result: Result<Recipe, ForkifyError>,
    ) -> Result<Applied, ForkifyError> {
        if !self.requests.is_current(ticket) {
            debug!("Discarding stale recipe response");
            return Ok(Applied::Stale);
        }

        let mut recipe = result?;
        recipe.bookmarked = self.state.bookmarks.contains(&recipe.id);
        info!("Loaded recipe {} ({})", recipe.id, recipe.title);
        self.state.recipe = Some(recipe);
        Ok(Applied::Current)
    }

    /// Trim `query` and reject it if nothing is left
    pub fn validate_query(query: &str) -> Result<String, ForkifyError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ForkifyError::EmptyQuery);
        }
        Ok(query.to_string())
    }

    /// Run a search and reset the page cursor
    pub async fn load_search_results(&mut self, query: &str) -> Result<Applied, ForkifyError> {
        let query = Self::validate_query(query)?;
        let ticket = self.begin(RequestKind::Search);
        let result = self.api.get_search_results(&query).await;
        self.apply_search_results(ticket, query, result)
    }

    /// Apply the outcome of a search started with `ticket`
    pub fn apply_search_results(
        &mut self,
        ticket: RequestTicket,
        query: String,
        result: Result<Vec<SearchResult>, ForkifyError>,
    ) -> Result<Applied, ForkifyError> {
        if !self.requests.is_current(ticket) {
            debug!("Discarding stale search response for '{}'", query);
            return Ok(Applied::Stale);
        }

        let results = result?;
        info!("Search '{}' returned {} results", query, results.len());
        let search = &mut self.state.search;
        search.query = query;
        search.results = results;
        search.page = 1;
        Ok(Applied::Current)
    }

    /// Results on `page`, or on the stored page when `page` is `None`.
    ///
    /// A page that exists becomes the stored page. Pages past the end (and
    /// page 0) give an empty slice and leave the stored page alone.
    pub fn search_results_page(&mut self, page: Option<usize>) -> &[SearchResult] {
        let search = &mut self.state.search;
        let page = page.unwrap_or(search.page);
        if (1..=search.num_pages()).contains(&page) {
            search.page = page;
        }
        search.page_slice(page)
    }

    pub fn pagination(&self) -> Pagination {
        self.state.search.pagination()
    }

    /// Rescale the current recipe to `new_servings`
    pub fn update_servings(&mut self, new_servings: u32) -> Result<(), ForkifyError> {
        if new_servings < 1 {
            return Err(ForkifyError::InvalidServings(new_servings));
        }
        let recipe = self
            .state
            .recipe
            .as_mut()
            .ok_or(ForkifyError::NoRecipeLoaded)?;
        debug!("Servings {} -> {}", recipe.servings, new_servings);
        recipe.scale_to(new_servings);
        Ok(())
    }

    /// Save `recipe` to bookmarks unless its id is already there
    pub fn add_bookmark(&mut self, recipe: Recipe) -> Result<(), ForkifyError> {
        let id = recipe.id.clone();
        let mut bookmarks = self.state.bookmarks.clone();
        if bookmarks.insert(Recipe {
            bookmarked: true,
            ..recipe
        }) {
            self.persist(&bookmarks)?;
            self.state.bookmarks = bookmarks;
            info!("Bookmarked {}", id);
        }
        self.sync_bookmarked_flag(&id);
        Ok(())
    }

    /// Remove the bookmark `id` if present
    pub fn delete_bookmark(&mut self, id: &str) -> Result<(), ForkifyError> {
        let mut bookmarks = self.state.bookmarks.clone();
        if bookmarks.remove(id).is_some() {
            self.persist(&bookmarks)?;
            self.state.bookmarks = bookmarks;
            info!("Removed bookmark {}", id);
        }
        self.sync_bookmarked_flag(id);
        Ok(())
    }

    /// Drop every bookmark and the persisted copy
    pub fn clear_bookmarks(&mut self) -> Result<(), ForkifyError> {
        self.storage.remove(BOOKMARKS_KEY)?;
        self.state.bookmarks.clear();
        if let Some(recipe) = self.state.recipe.as_mut() {
            recipe.bookmarked = false;
        }
        Ok(())
    }

    /// Validate `form`, upload it, and make the result the current bookmarked recipe
    pub async fn upload_recipe(&mut self, form: UploadForm) -> Result<Applied, ForkifyError> {
        let new_recipe = form.into_new_recipe()?;
        let ticket = self.begin(RequestKind::Upload);
        let result = self.api.post_recipe(&new_recipe).await;
        self.apply_upload(ticket, result)
    }

    /// Apply the outcome of an upload started with `ticket`
    pub fn apply_upload(
        &mut self,
        ticket: RequestTicket,
        result: Result<Recipe, ForkifyError>,
    ) -> Result<Applied, ForkifyError> {
        if !self.requests.is_current(ticket) {
            debug!("Discarding stale upload response");
            return Ok(Applied::Stale);
        }

        let recipe = result?;
        info!("Uploaded recipe {} ({})", recipe.id, recipe.title);
        // Current recipe only changes once the bookmark is stored
        self.add_bookmark(recipe.clone())?;
        self.state.recipe = Some(Recipe {
            bookmarked: true,
            ..recipe
        });
        Ok(Applied::Current)
    }

    fn persist(&mut self, bookmarks: &BookmarkSet) -> Result<(), ForkifyError> {
        let json = serde_json::to_string(bookmarks)?;
        self.storage.set(BOOKMARKS_KEY, &json)?;
        Ok(())
    }

    fn sync_bookmarked_flag(&mut self, id: &str) {
        let bookmarked = self.state.bookmarks.contains(id);
        if let Some(recipe) = self.state.recipe.as_mut().filter(|r| r.id == id) {
            recipe.bookmarked = bookmarked;
        }
    }
}
