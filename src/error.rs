use thiserror::Error;

/// Errors that can occur while loading, mutating or persisting application state
#[derive(Error, Debug)]
pub enum ForkifyError {
    /// Transport failure talking to the recipe API
    #[error("Failed to fetch: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The request did not complete in time
    #[error("Request took too long! Timeout after {0} seconds")]
    Timeout(u64),

    /// The API answered with a failure envelope or a non-success status
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    /// The API answered with something that is not a recipe payload
    #[error("Malformed API payload: {0}")]
    MalformedPayload(String),

    /// The configured API URL cannot carry a recipe id path segment
    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),

    /// Search was submitted without a query
    #[error("Search query cannot be empty")]
    EmptyQuery,

    /// An ingredient line did not have the `quantity,unit,description` shape
    #[error("Wrong ingredient format: '{0}'. Please use 'quantity,unit,description'")]
    InvalidIngredient(String),

    /// A numeric form field could not be parsed
    #[error("Invalid value for {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    /// Servings must be at least one
    #[error("Servings must be at least 1, got {0}")]
    InvalidServings(u32),

    /// An operation needed the current recipe but none is loaded
    #[error("No recipe is loaded")]
    NoRecipeLoaded,

    /// Reading or writing local storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<serde_json::Error> for ForkifyError {
    fn from(err: serde_json::Error) -> Self {
        ForkifyError::MalformedPayload(err.to_string())
    }
}

impl ForkifyError {
    /// Whether the error was caused by user input rather than the network or storage
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ForkifyError::EmptyQuery
                | ForkifyError::InvalidIngredient(_)
                | ForkifyError::InvalidField { .. }
                | ForkifyError::InvalidServings(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        assert!(ForkifyError::EmptyQuery.is_invalid_input());
        assert!(ForkifyError::InvalidServings(0).is_invalid_input());
        assert!(ForkifyError::InvalidIngredient("kg,flour".to_string()).is_invalid_input());
        assert!(!ForkifyError::NoRecipeLoaded.is_invalid_input());
        assert!(!ForkifyError::Timeout(10).is_invalid_input());
    }

    #[test]
    fn test_api_error_message() {
        let err = ForkifyError::Api {
            status: 400,
            message: "Invalid _id: nope".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid _id: nope (400)");
    }

    #[test]
    fn test_json_error_becomes_malformed_payload() {
        let err: ForkifyError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ForkifyError::MalformedPayload(_)));
    }
}
