//! Complaint submission and feed
//!
//! The pipeline: validate the draft, classify the message, merge classifier
//! output with the form fields and client-local metadata, persist under the
//! owner's namespace. The store write happens strictly after a successful
//! classification; a write failure persists nothing and the classified
//! result is discarded, so a resubmission re-classifies.

pub mod form;

pub use form::ComplaintForm;

use chrono::Utc;
use log::{info, warn};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use crate::classifier::ClassifierClient;
use crate::error::{Error, Result};
use crate::models::{ComplaintDraft, ComplaintRecord, ComplaintStatus};
use crate::session::Session;
use crate::store::{RecordStore, StorePath, Subscription};
use crate::validate;

/// Client for filing complaints and following their lifecycle
pub struct ComplaintsClient {
    classifier: ClassifierClient,
    store: Arc<dyn RecordStore>,
    in_flight: Arc<AtomicBool>,
}

impl ComplaintsClient {
    pub fn new(classifier: ClassifierClient, store: Arc<dyn RecordStore>) -> Self {
        Self::with_guard(classifier, store, Arc::new(AtomicBool::new(false)))
    }

    /// Build a client over a shared in-flight guard, so every instance the
    /// entry point hands out enforces the same single-submission rule
    pub(crate) fn with_guard(
        classifier: ClassifierClient,
        store: Arc<dyn RecordStore>,
        in_flight: Arc<AtomicBool>,
    ) -> Self {
        Self {
            classifier,
            store,
            in_flight,
        }
    }

    /// Whether a submission is in flight on any client sharing this guard
    ///
    /// The submit control watches this to stay disabled for the duration of
    /// the request.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// File one complaint
    ///
    /// Validation runs first and blocks any network call; violations are
    /// collected, not fail-fast. While one submission is in flight a second
    /// call — on this instance or any other sharing its guard — fails fast
    /// with [`Error::Busy`] instead of issuing a duplicate classification
    /// request.
    pub async fn submit(
        &self,
        session: &Session,
        draft: &ComplaintDraft,
    ) -> Result<ComplaintRecord> {
        let violations = validate::violations(draft);
        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }
        let result = self.submit_inner(session, draft).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_inner(
        &self,
        session: &Session,
        draft: &ComplaintDraft,
    ) -> Result<ComplaintRecord> {
        let classification = self.classifier.classify(&draft.message).await?;

        let purok = if draft.purok.trim().is_empty() {
            session.purok.clone().unwrap_or_default()
        } else {
            draft.purok.trim().to_string()
        };

        let record = ComplaintRecord {
            id: next_complaint_id().to_string(),
            message: classification.message,
            label: classification.label,
            kind: classification.kind,
            timestamp: Utc::now(),
            location: draft.location.trim().to_string(),
            purok,
            status: ComplaintStatus::Pending,
            evidence_photo: draft.evidence_photo.as_ref().map(|p| p.to_data_uri()),
        };

        let path = StorePath::user_complaint(&session.user_id, &record.id);
        self.store.set(&path, serde_json::to_value(&record)?).await?;

        info!(
            "complaint {} filed (label: {}, type: {})",
            record.id, record.label, record.kind
        );
        Ok(record)
    }

    /// Follow the signed-in user's complaint collection
    pub async fn subscribe(&self, session: &Session) -> Result<ComplaintFeed> {
        let path = StorePath::user_complaints(&session.user_id);
        let subscription = self.store.subscribe(&path).await?;
        Ok(ComplaintFeed {
            subscription,
            records: Vec::new(),
        })
    }

    /// One-shot read of the user's complaints, newest first
    pub async fn list(&self, session: &Session) -> Result<Vec<ComplaintRecord>> {
        let path = StorePath::user_complaints(&session.user_id);
        let snapshot = self.store.get(&path).await?.unwrap_or(Value::Null);
        Ok(decode_snapshot(snapshot))
    }
}

/// Live view of the user's complaints
///
/// Rebuilds the whole ordered list from each full-collection snapshot; the
/// store sends complete values, not deltas. Dropping the feed tears down
/// the underlying subscription.
pub struct ComplaintFeed {
    subscription: Subscription,
    records: Vec<ComplaintRecord>,
}

impl ComplaintFeed {
    /// Await the next change and rebuild the list. `None` when the
    /// subscription has ended.
    pub async fn next_change(&mut self) -> Option<&[ComplaintRecord]> {
        let snapshot = self.subscription.next_snapshot().await?;
        self.records = decode_snapshot(snapshot);
        Some(&self.records)
    }

    /// Current list, newest first
    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    /// Explicit empty state, not an error
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Detail view lookup
    pub fn detail(&self, id: &str) -> Option<&ComplaintRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Rebuild the ordered record list from a full-collection snapshot
///
/// Records that fail to decode are skipped, not fatal; the order is
/// newest-first regardless of the store's iteration order.
pub(crate) fn decode_snapshot(snapshot: Value) -> Vec<ComplaintRecord> {
    let mut records: Vec<ComplaintRecord> = match snapshot {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("skipping undecodable complaint {}: {}", key, e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    records
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a creation-time-derived complaint id
///
/// Strictly monotonic even when two submissions land in the same
/// millisecond, so back-to-back identical submissions always produce two
/// distinct records.
pub(crate) fn next_complaint_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::SeqCst);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_unique_and_monotonic() {
        let a = next_complaint_id();
        let b = next_complaint_id();
        let c = next_complaint_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn snapshot_orders_newest_first() {
        let snapshot = json!({
            "1": {"id": "1", "message": "oldest", "timestamp": "2024-01-01T00:00:00Z"},
            "3": {"id": "3", "message": "newest", "timestamp": "2024-03-01T00:00:00Z"},
            "2": {"id": "2", "message": "middle", "timestamp": "2024-02-01T00:00:00Z"}
        });
        let records = decode_snapshot(snapshot);
        let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn snapshot_skips_undecodable_records() {
        let snapshot = json!({
            "good": {"id": "1", "message": "ok", "timestamp": "2024-01-01T00:00:00Z"},
            "bad": {"id": "2", "message": "no timestamp"}
        });
        assert_eq!(decode_snapshot(snapshot).len(), 1);
    }

    #[test]
    fn null_snapshot_is_empty_not_error() {
        assert!(decode_snapshot(Value::Null).is_empty());
    }
}
