//! Default API configuration with environment overrides.

use std::env;

/// Default base URL of the catalog service.
pub const DEFAULT_CATALOG_URL: &str = "https://ac.cnstrc.com";

/// Default base URL of the ingestion-events service.
pub const DEFAULT_EVENTS_URL: &str = "https://ac.cnstrc.com";

/// Base URLs used by the API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Catalog upload endpoint base URL.
    pub catalog_base_url: String,
    /// Ingestion-event reporting base URL.
    pub events_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            events_base_url: DEFAULT_EVENTS_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Build a config from the environment, falling back to the defaults.
    /// Reads `CATALOG_API_URL` and `INGESTION_EVENTS_URL`; a `.env` file is
    /// honored when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            catalog_base_url: env::var("CATALOG_API_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string()),
            events_base_url: env::var("INGESTION_EVENTS_URL")
                .unwrap_or_else(|_| DEFAULT_EVENTS_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ApiConfig::default();
        assert_eq!(config.catalog_base_url, "https://ac.cnstrc.com");
        assert_eq!(config.events_base_url, "https://ac.cnstrc.com");
    }
}
