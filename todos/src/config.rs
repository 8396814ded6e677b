//! Configuration for the HTTP API client.
//!
//! Configuration values should be provided by the application, not
//! hardcoded; `from_env` covers the common deployment case.

/// Environment variable consulted by [`ApiConfig::from_env`].
const BASE_URL_VAR: &str = "TODOS_API_URL";

/// Default API base URL (the local dev server).
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// HTTP API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the API server (e.g., `"https://api.example.com"`).
    ///
    /// Endpoints are formatted as `{base_url}/fakeApi/todos`; a trailing
    /// slash on the base is not expected.
    pub base_url: String,
}

impl ApiConfig {
    /// Create a configuration with an explicit base URL.
    #[must_use]
    pub const fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Read the configuration from the environment.
    ///
    /// Uses `TODOS_API_URL` when set, otherwise the local default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
