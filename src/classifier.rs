//! Classification service client
//!
//! The classifier is an opaque HTTP JSON endpoint: `POST /classify` with
//! `{"message": ...}` returns `{"message", "label", "type"}`. Label and
//! type are normalized to lowercase on receipt so the rest of the pipeline
//! never sees server casing.

use log::{debug, warn};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::models::Classification;

/// Client for the complaint classification endpoint
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ClassifierClient {
    pub fn new(base_url: Url, http_client: Client, timeout: Option<Duration>) -> Self {
        Self {
            base_url,
            http_client,
            timeout,
        }
    }

    /// Classify a free-text complaint message
    ///
    /// The message is trimmed before dispatch. Non-2xx responses surface the
    /// body as opaque error text; transport failures and elapsed timeouts
    /// abort the attempt with no retry.
    pub async fn classify(&self, message: &str) -> Result<Classification> {
        let message = message.trim();
        let url = self.base_url.join("classify")?;
        debug!("classifying message ({} chars)", message.len());

        let mut request = self
            .http_client
            .post(url)
            .json(&json!({ "message": message }));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::Http(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            warn!("classifier rejected request: {} {}", status, text);
            return Err(Error::classifier(format!("{}: {}", status, text)));
        }

        let mut classification = response.json::<Classification>().await?;
        classification.label = normalize(&classification.label);
        classification.kind = normalize(&classification.kind);
        Ok(classification)
    }
}

/// Lowercase and trim a classifier tag. Idempotent.
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
