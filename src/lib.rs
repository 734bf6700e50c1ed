pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod state;
pub mod storage;
pub mod upload;
pub mod views;

use log::debug;
use std::sync::Arc;

// Re-export commonly used types
pub use api::{ForkifyClient, RecipeApi};
pub use config::Settings;
pub use controller::{Controller, Event};
pub use error::ForkifyError;
pub use model::{BookmarkSet, Ingredient, Pagination, Recipe, SearchResult, SearchState};
pub use state::{Applied, Store};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use upload::{NewRecipe, UploadForm};
pub use views::Views;

/// Build a store backed by the HTTP API and file storage, with bookmarks restored
///
/// # Example
/// ```no_run
/// # use forkify::{build_store, Settings};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = build_store(&Settings::default())?;
/// store.load_search_results("pizza").await?;
/// println!("{} results", store.search().results.len());
/// # Ok(())
/// # }
/// ```
pub fn build_store(settings: &Settings) -> Result<Store, ForkifyError> {
    let api = ForkifyClient::new(settings)?;
    let storage = FileStore::new(&settings.storage_dir);
    debug!("Bookmarks stored in {}", storage.dir().display());

    let mut store = Store::new(
        Arc::new(api),
        Box::new(storage),
        settings.results_per_page,
    );
    store.restore_bookmarks()?;
    Ok(store)
}

/// Build a controller rendering to the terminal
pub fn build_terminal_controller(settings: &Settings) -> Result<Controller, ForkifyError> {
    let store = build_store(settings)?;
    Ok(Controller::new(
        store,
        Views::terminal(),
        settings.modal_close_delay(),
    ))
}
