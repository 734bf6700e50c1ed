use log::{debug, error, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error::ForkifyError;
use crate::model::{Recipe, SearchResult};
use crate::state::{Applied, RequestKind, RequestTicket, Store};
use crate::upload::UploadForm;
use crate::views::Views;

/// Something the user did in one of the views
#[derive(Debug, Clone)]
pub enum Event {
    RecipeSelected(String),
    SearchSubmitted(String),
    PageRequested(usize),
    NextPageRequested,
    PrevPageRequested,
    ServingsChanged(u32),
    /// Bookmark the current recipe, or remove it if already bookmarked
    BookmarkToggled,
    BookmarksRequested,
    AddRecipeOpened,
    RecipeSubmitted(UploadForm),
    AddRecipeDismissed,
    Shutdown,
}

/// Result of work the controller started in the background
enum Completion {
    Recipe {
        ticket: RequestTicket,
        result: Result<Recipe, ForkifyError>,
    },
    Search {
        ticket: RequestTicket,
        query: String,
        result: Result<Vec<SearchResult>, ForkifyError>,
    },
    Upload {
        ticket: RequestTicket,
        result: Result<Recipe, ForkifyError>,
    },
    AutoClose,
}

/// Routes view events to the store and renders the outcome.
///
/// Events and background completions are handled one at a time on the task
/// that drives [`Controller::run`]. Network calls run in spawned tasks so a
/// slow response never holds up the next event.
pub struct Controller {
    store: Store,
    views: Views,
    modal_close_delay: Duration,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    in_flight: usize,
    auto_close: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(store: Store, views: Views, modal_close_delay: Duration) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Controller {
            store,
            views,
            modal_close_delay,
            completions_tx,
            completions_rx,
            in_flight: 0,
            auto_close: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Number of loads started but not yet handled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Process events until `Shutdown` arrives or every sender is dropped
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(Event::Shutdown) | None => break,
                    Some(event) => self.handle_event(event),
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        self.cancel_auto_close();
        info!("Controller stopped");
    }

    /// Wait for every load in flight and handle its completion
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => self.handle_completion(completion),
                None => break,
            }
        }
    }

    /// Handle completions that are already waiting, without blocking
    pub fn process_ready(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.handle_completion(completion);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        debug!("Event: {:?}", event);
        match event {
            Event::RecipeSelected(id) => self.control_recipe(id),
            Event::SearchSubmitted(query) => self.control_search_results(&query),
            Event::PageRequested(page) => self.control_pagination(page),
            Event::NextPageRequested => {
                if let Some(page) = self.store.pagination().next_page() {
                    self.control_pagination(page);
                }
            }
            Event::PrevPageRequested => {
                if let Some(page) = self.store.pagination().prev_page() {
                    self.control_pagination(page);
                }
            }
            Event::ServingsChanged(servings) => self.control_servings(servings),
            Event::BookmarkToggled => self.control_add_bookmark(),
            Event::BookmarksRequested => self.render_bookmarks(),
            Event::AddRecipeOpened => {
                self.cancel_auto_close();
                self.views.add_recipe.open_window();
            }
            Event::RecipeSubmitted(form) => self.control_add_recipe(form),
            Event::AddRecipeDismissed => {
                self.cancel_auto_close();
                self.views.add_recipe.close_window();
            }
            Event::Shutdown => {}
        }
    }

    fn control_recipe(&mut self, id: String) {
        let id = id.trim().to_string();
        if id.is_empty() {
            return;
        }
        self.views.recipe.render_spinner();

        // 0) Mark the selected search result
        let page = self.store.search_results_page(None);
        self.views.results.update(page, Some(&id));

        // 1) Mark the selected bookmark
        self.views
            .bookmarks
            .update(self.store.bookmarks().as_slice(), Some(&id));

        // 2) Load in the background
        let ticket = self.store.begin(RequestKind::Recipe);
        let api = self.store.api();
        self.spawn_load(async move {
            let result = api.get_recipe(&id).await;
            Completion::Recipe { ticket, result }
        });
    }

    fn control_search_results(&mut self, query: &str) {
        self.views.results.render_spinner();

        let query = match Store::validate_query(query) {
            Ok(query) => query,
            Err(e) => {
                log_failure("Search rejected", &e);
                self.views.results.render_error(Some(&e.to_string()));
                return;
            }
        };

        let ticket = self.store.begin(RequestKind::Search);
        let api = self.store.api();
        self.spawn_load(async move {
            let result = api.get_search_results(&query).await;
            Completion::Search {
                ticket,
                query,
                result,
            }
        });
    }

    fn control_pagination(&mut self, page: usize) {
        let active_id = self.active_id();
        let results = self.store.search_results_page(Some(page));
        self.views.results.render(results, active_id.as_deref());
        self.views.pagination.render(&self.store.pagination());
    }

    fn control_servings(&mut self, servings: u32) {
        if let Err(e) = self.store.update_servings(servings) {
            log_failure("Ignoring servings change", &e);
            return;
        }
        if let Some(recipe) = self.store.recipe() {
            self.views.recipe.update(recipe);
        }
    }

    fn control_add_bookmark(&mut self) {
        let Some(recipe) = self.store.recipe().cloned() else {
            warn!("No recipe to bookmark");
            return;
        };

        // 1) Add or remove
        let result = if recipe.bookmarked {
            self.store.delete_bookmark(&recipe.id)
        } else {
            self.store.add_bookmark(recipe)
        };
        if let Err(e) = result {
            log_failure("Failed to update bookmarks", &e);
            self.views.bookmarks.render_error(Some(&e.to_string()));
            return;
        }

        // 2) Update recipe view
        if let Some(recipe) = self.store.recipe() {
            self.views.recipe.update(recipe);
        }

        // 3) Render bookmarks
        self.render_bookmarks();
    }

    fn control_add_recipe(&mut self, form: UploadForm) {
        self.views.add_recipe.render_spinner();

        let new_recipe = match form.into_new_recipe() {
            Ok(new_recipe) => new_recipe,
            Err(e) => {
                log_failure("Upload rejected", &e);
                self.views.add_recipe.render_error(Some(&e.to_string()));
                return;
            }
        };

        let ticket = self.store.begin(RequestKind::Upload);
        let api = self.store.api();
        self.spawn_load(async move {
            let result = api.post_recipe(&new_recipe).await;
            Completion::Upload { ticket, result }
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Recipe { ticket, result } => {
                self.in_flight -= 1;
                match self.store.apply_recipe(ticket, result) {
                    Ok(Applied::Current) => {
                        if let Some(recipe) = self.store.recipe() {
                            self.views.recipe.render(recipe);
                        }
                    }
                    Ok(Applied::Stale) => {}
                    Err(e) => {
                        log_failure("Failed to load recipe", &e);
                        self.views.recipe.render_error(None);
                    }
                }
            }
            Completion::Search {
                ticket,
                query,
                result,
            } => {
                self.in_flight -= 1;
                match self.store.apply_search_results(ticket, query, result) {
                    Ok(Applied::Current) => {
                        let active_id = self.active_id();
                        let results = self.store.search_results_page(None);
                        self.views.results.render(results, active_id.as_deref());
                        self.views.pagination.render(&self.store.pagination());
                    }
                    Ok(Applied::Stale) => {}
                    Err(e) => {
                        log_failure("Search failed", &e);
                        self.views.results.render_error(Some(&e.to_string()));
                    }
                }
            }
            Completion::Upload { ticket, result } => {
                self.in_flight -= 1;
                match self.store.apply_upload(ticket, result) {
                    Ok(Applied::Current) => self.finish_upload(),
                    Ok(Applied::Stale) => {}
                    Err(e) => {
                        log_failure("Upload failed", &e);
                        self.views.add_recipe.render_error(Some(&e.to_string()));
                    }
                }
            }
            Completion::AutoClose => {
                self.auto_close = None;
                if self.views.add_recipe.is_open() {
                    self.views.add_recipe.close_window();
                }
            }
        }
    }

    fn finish_upload(&mut self) {
        let Some(recipe) = self.store.recipe() else {
            return;
        };
        let id = recipe.id.clone();

        self.views.recipe.render(recipe);
        self.views.add_recipe.render_message(None);
        self.render_bookmarks();
        self.views.navigator.push_location(&id);
        self.schedule_auto_close();
    }

    fn render_bookmarks(&mut self) {
        let active_id = self.active_id();
        self.views
            .bookmarks
            .render(self.store.bookmarks().as_slice(), active_id.as_deref());
    }

    fn active_id(&self) -> Option<String> {
        self.store.recipe().map(|recipe| recipe.id.clone())
    }

    fn spawn_load<F>(&mut self, load: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the controller does
            let _ = tx.send(load.await);
        });
    }

    fn schedule_auto_close(&mut self) {
        self.cancel_auto_close();
        let tx = self.completions_tx.clone();
        let delay = self.modal_close_delay;
        self.auto_close = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Completion::AutoClose);
        }));
    }

    fn cancel_auto_close(&mut self) {
        if let Some(handle) = self.auto_close.take() {
            debug!("Cancelling form auto-close");
            handle.abort();
        }
    }
}

/// Bad input is the user's to fix; anything else is a real failure
fn log_failure(context: &str, err: &ForkifyError) {
    if err.is_invalid_input() {
        warn!("{}: {}", context, err);
    } else {
        error!("{}: {}", context, err);
    }
}
