//! REST implementation of the record store
//!
//! Talks to the hosted realtime database's REST surface: a JSON document
//! lives at `{base}/{path}.json`, `POST` generates a child key and returns
//! `{"name": key}`, `PATCH` merges fields. Subscriptions use the
//! `text/event-stream` streaming GET; on every change event the full
//! snapshot is re-read so subscribers always see complete collections,
//! never deltas.

use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

use super::{RecordStore, StorePath, Subscription};
use crate::error::{Error, Result};

/// Record store backed by the hosted realtime database
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: Url,
    api_key: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl RestStore {
    pub fn new(
        base_url: Url,
        api_key: Option<String>,
        http_client: Client,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_url,
            api_key,
            http_client,
            timeout,
        }
    }

    fn endpoint(&self, path: &StorePath) -> Result<Url> {
        let mut url = self.base_url.join(&format!("{}.json", path))?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("auth", key);
        }
        Ok(url)
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await?;
            Err(Error::store(format!("{}: {}", status, text)))
        }
    }
}

async fn fetch_snapshot(client: &Client, url: &Url) -> Result<Value> {
    let response = client.get(url.clone()).send().await?;
    let response = RestStore::check(response).await?;
    Ok(response.json::<Value>().await?)
}

#[async_trait::async_trait]
impl RecordStore for RestStore {
    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("store set {}", path);
        let response = self
            .apply_timeout(self.http_client.put(url).json(&value))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let url = self.endpoint(path)?;
        debug!("store push under {}", path);
        let response = self
            .apply_timeout(self.http_client.post(url).json(&value))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body = response.json::<Value>().await?;
        body.get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::store("push response missing generated key"))
    }

    async fn update(&self, path: &StorePath, patch: Value) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("store update {}", path);
        let response = self
            .apply_timeout(self.http_client.patch(url).json(&patch))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        let url = self.endpoint(path)?;
        let snapshot = fetch_snapshot(&self.http_client, &url).await?;
        Ok(match snapshot {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        let url = self.endpoint(path)?;
        debug!("store subscribe {}", path);

        // No request timeout here: the event stream is long-lived.
        let response = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = Self::check(response).await?;

        let (tx, rx) = mpsc::unbounded_channel();

        // Initial full snapshot, delivered before any change event.
        let initial = fetch_snapshot(&self.http_client, &url).await?;
        if tx.send(initial).is_err() {
            return Err(Error::store("subscriber dropped before first snapshot"));
        }

        let client = self.http_client.clone();
        let topic = path.to_string();
        let task = tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut event = String::new();

            while let Some(chunk) = stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("store stream for {} failed: {}", topic, e);
                        break;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim_end_matches('\r').to_string();
                    buffer.drain(..=newline);

                    if let Some(name) = line.strip_prefix("event:") {
                        event = name.trim().to_string();
                    } else if line.starts_with("data:") && (event == "put" || event == "patch") {
                        // The event payload is a delta; re-read the full
                        // value so subscribers get complete snapshots.
                        match fetch_snapshot(&client, &url).await {
                            Ok(snapshot) => {
                                if tx.send(snapshot).is_err() {
                                    debug!("subscriber for {} gone, stopping stream", topic);
                                    return;
                                }
                            }
                            Err(e) => warn!("snapshot refresh for {} failed: {}", topic, e),
                        }
                    }
                }
            }
            debug!("store stream for {} ended", topic);
        });

        Ok(Subscription::new(rx, Some(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RestStore {
        let base = Url::parse("https://talk2kap.example-rtdb.test/").unwrap();
        RestStore::new(base, Some("k3y".to_string()), Client::new(), None)
    }

    #[test]
    fn endpoint_appends_json_suffix_and_auth() {
        let url = store()
            .endpoint(&StorePath::user_complaints("uid-1"))
            .unwrap();
        assert_eq!(url.path(), "/users/uid-1/userComplaints.json");
        assert_eq!(url.query(), Some("auth=k3y"));
    }
}
