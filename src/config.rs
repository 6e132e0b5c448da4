//! Configuration for the Talk2Kap client
//!
//! Backend coordinates (classifier endpoint, record store endpoint, project
//! key) are externalized: load them from the environment or pass them in
//! explicitly. Nothing here is ever embedded as a literal.

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Backend endpoint coordinates for a Talk2Kap deployment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the complaint classification service
    pub classifier_url: Url,
    /// Base URL of the realtime record store
    pub database_url: Url,
    /// Project API key appended to store requests, if the deployment requires one
    pub api_key: Option<String>,
}

impl Config {
    /// Create a new configuration, validating both endpoint URLs
    pub fn new(classifier_url: &str, database_url: &str) -> Result<Self> {
        Ok(Self {
            classifier_url: Url::parse(classifier_url)?,
            database_url: Url::parse(database_url)?,
            api_key: None,
        })
    }

    /// Attach a project API key
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Load the configuration from environment variables
    ///
    /// Reads `TALK2KAP_CLASSIFIER_URL`, `TALK2KAP_DATABASE_URL` and the
    /// optional `TALK2KAP_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let classifier_url = std::env::var("TALK2KAP_CLASSIFIER_URL")
            .map_err(|_| Error::config("TALK2KAP_CLASSIFIER_URL environment variable not found"))?;
        let database_url = std::env::var("TALK2KAP_DATABASE_URL")
            .map_err(|_| Error::config("TALK2KAP_DATABASE_URL environment variable not found"))?;
        let mut config = Self::new(&classifier_url, &database_url)?;
        if let Ok(key) = std::env::var("TALK2KAP_API_KEY") {
            config.api_key = Some(key);
        }
        Ok(config)
    }
}

/// Client behavior options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout applied to classifier and store requests
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_urls() {
        assert!(Config::new("not a url", "https://db.example.com").is_err());
        assert!(Config::new("https://api.example.com", "").is_err());
    }

    #[test]
    fn default_timeout_is_enforced() {
        let options = ClientOptions::default();
        assert_eq!(options.request_timeout, Some(Duration::from_secs(10)));
    }
}
