//! Officials feedback
//!
//! Star ratings and comments per official plus free-text general feedback,
//! written under `generalFeedback/{timestamp}`. The officials list is
//! read-once reference data.

use chrono::Utc;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::Official;
use crate::session::Session;
use crate::store::{RecordStore, StorePath};

/// One feedback submission under construction
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedbackSubmission {
    /// Star ratings per official key, clamped to 1..=5
    pub ratings: BTreeMap<String, u8>,
    /// Comments per official key
    pub comments: BTreeMap<String, String>,
    /// Free-text general feedback
    pub general: String,
}

impl FeedbackSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate an official; stars are clamped into 1..=5
    pub fn rate(mut self, official: &str, stars: u8) -> Self {
        self.ratings
            .insert(official.to_string(), stars.clamp(1, 5));
        self
    }

    pub fn comment(mut self, official: &str, text: &str) -> Self {
        self.comments
            .insert(official.to_string(), text.to_string());
        self
    }

    pub fn general(mut self, text: &str) -> Self {
        self.general = text.to_string();
        self
    }

    /// A submission must carry at least one rating or some general text
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty() && self.general.trim().is_empty()
    }
}

/// Client for the officials feedback feature
pub struct FeedbackClient {
    store: Arc<dyn RecordStore>,
}

impl FeedbackClient {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// One-shot read of the officials reference list
    pub async fn officials(&self) -> Result<Vec<Official>> {
        let snapshot = self.store.get(&StorePath::officials()).await?;
        let mut officials: Vec<Official> = match snapshot {
            Some(Value::Object(map)) => map
                .into_iter()
                .filter_map(|(key, value)| {
                    let mut official: Official = serde_json::from_value(value).ok()?;
                    if official.id.is_empty() {
                        official.id = key;
                    }
                    Some(official)
                })
                .collect(),
            _ => Vec::new(),
        };
        officials.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(officials)
    }

    /// Persist one feedback submission, returning its timestamp key
    pub async fn submit(
        &self,
        session: &Session,
        feedback: &FeedbackSubmission,
    ) -> Result<String> {
        if feedback.is_empty() {
            return Err(Error::Validation(vec![
                "Rate at least one official or write some feedback".to_string(),
            ]));
        }

        let now = Utc::now();
        let key = now.timestamp_millis().to_string();
        let value = serde_json::json!({
            "userId": session.user_id,
            "ratings": feedback.ratings,
            "comments": feedback.comments,
            "feedback": feedback.general,
            "submittedAt": now,
        });

        self.store
            .set(&StorePath::general_feedback(&key), value)
            .await?;
        info!("feedback {} submitted by {}", key, session.user_id);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn client() -> (FeedbackClient, Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        (FeedbackClient::new(store.clone()), store, Session::new("uid-1"))
    }

    #[test]
    fn ratings_are_clamped() {
        let feedback = FeedbackSubmission::new().rate("captain", 9).rate("councilor1", 0);
        assert_eq!(feedback.ratings["captain"], 5);
        assert_eq!(feedback.ratings["councilor1"], 1);
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_without_a_write() {
        let (client, store, session) = client();
        let err = client
            .submit(&session, &FeedbackSubmission::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store
            .get(&StorePath::root().child("generalFeedback"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn submission_lands_under_timestamp_key() {
        let (client, store, session) = client();
        let feedback = FeedbackSubmission::new()
            .rate("captain", 4)
            .comment("captain", "responsive to road complaints")
            .general("more streetlights please");
        let key = client.submit(&session, &feedback).await.unwrap();

        let stored = store
            .get(&StorePath::general_feedback(&key))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["userId"], json!("uid-1"));
        assert_eq!(stored["ratings"]["captain"], json!(4));
        assert_eq!(stored["feedback"], json!("more streetlights please"));
    }

    #[tokio::test]
    async fn officials_list_decodes_and_sorts() {
        let (client, store, _session) = client();
        store
            .set(
                &StorePath::officials(),
                json!({
                    "councilor2": {"name": "B. Ramos", "role": "Councilor"},
                    "captain": {"name": "A. Santos", "role": "Barangay Captain"}
                }),
            )
            .await
            .unwrap();

        let officials = client.officials().await.unwrap();
        assert_eq!(officials.len(), 2);
        assert_eq!(officials[0].id, "captain");
        assert_eq!(officials[0].name, "A. Santos");
    }
}
