use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application settings
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Base URL of the recipes collection endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Developer key sent with every request; recipes uploaded with it are returned in searches
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of search results per page
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,
    /// Delay before the add-recipe window closes itself after a successful upload
    #[serde(default = "default_modal_close_secs")]
    pub modal_close_secs: f64,
    /// Directory holding persisted bookmarks
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            results_per_page: default_results_per_page(),
            modal_close_secs: default_modal_close_secs(),
            storage_dir: default_storage_dir(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://forkify-api.jonas.io/api/v2/recipes".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_results_per_page() -> usize {
    10
}

fn default_modal_close_secs() -> f64 {
    2.5
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".forkify")
}

impl Settings {
    /// Load settings from file and environment variables
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FORKIFY__ prefix
    /// 2. forkify.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FORKIFY__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_settings()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn modal_close_delay(&self) -> Duration {
        Duration::from_secs_f64(self.modal_close_secs.max(0.0))
    }
}

/// Load settings from file and environment variables
pub fn load_settings() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("forkify").required(false))
        // Use double underscore for nested keys: FORKIFY__API_KEY
        .add_source(
            Environment::with_prefix("FORKIFY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;
    if settings.results_per_page == 0 {
        settings.results_per_page = default_results_per_page();
    }
    Ok(settings)
}
