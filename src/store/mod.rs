//! Record store abstraction
//!
//! The backend is a keyed, hierarchical document store with path-based
//! change subscriptions. Services talk to the narrow [`RecordStore`] trait;
//! [`RestStore`] is the hosted implementation and [`MemoryStore`] the
//! in-process fake, interchangeable behind the same contract: every change
//! notification delivers the full current value at the subscribed path.

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::error::Result;

/// A location in the hierarchical key space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a child segment. Embedded slashes split into segments.
    pub fn child(mut self, segment: &str) -> Self {
        self.segments
            .extend(segment.split('/').filter(|s| !s.is_empty()).map(String::from));
        self
    }

    /// `users/{uid}` — the profile document
    pub fn user(user_id: &str) -> Self {
        Self::root().child("users").child(user_id)
    }

    /// `users/{uid}/userComplaints` — the owner-scoped complaint collection
    pub fn user_complaints(user_id: &str) -> Self {
        Self::user(user_id).child("userComplaints")
    }

    /// `users/{uid}/userComplaints/{id}` — one complaint record
    pub fn user_complaint(user_id: &str, complaint_id: &str) -> Self {
        Self::user_complaints(user_id).child(complaint_id)
    }

    /// `officials` — the reference list of barangay officials
    pub fn officials() -> Self {
        Self::root().child("officials")
    }

    /// `generalFeedback/{ts}` — one feedback submission
    pub fn general_feedback(timestamp_key: &str) -> Self {
        Self::root().child("generalFeedback").child(timestamp_key)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether `self` is `other` or a descendant of it
    pub fn starts_with(&self, other: &StorePath) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// A live path subscription
///
/// Holds the snapshot receiver and tears down its listener when dropped, on
/// every exit path; snapshots can no longer be observed after that point.
pub struct Subscription {
    rx: UnboundedReceiver<Value>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(rx: UnboundedReceiver<Value>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    /// Await the next full snapshot of the subscribed path
    ///
    /// The first snapshot arrives immediately after subscribing. `None`
    /// means the stream has ended.
    pub async fn next_snapshot(&mut self) -> Option<Value> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// The narrow store interface every service depends on
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or replace the value at a fully-specified key
    async fn set(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Create a child under a store-generated key, returning that key
    async fn push(&self, path: &StorePath, value: Value) -> Result<String>;

    /// Merge the given fields into the value at the path
    async fn update(&self, path: &StorePath, patch: Value) -> Result<()>;

    /// Read the current value at the path, `None` when absent
    async fn get(&self, path: &StorePath) -> Result<Option<Value>>;

    /// Subscribe to changes under the path
    ///
    /// Delivers the full current value immediately and again after every
    /// change at or below the path.
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_hierarchically() {
        let path = StorePath::user_complaint("uid-1", "1700000000000");
        assert_eq!(path.to_string(), "users/uid-1/userComplaints/1700000000000");
    }

    #[test]
    fn prefix_matching() {
        let collection = StorePath::user_complaints("uid-1");
        let record = StorePath::user_complaint("uid-1", "42");
        assert!(record.starts_with(&collection));
        assert!(!collection.starts_with(&record));
        assert!(collection.starts_with(&collection));
    }

    #[test]
    fn child_splits_embedded_slashes() {
        let path = StorePath::root().child("users/uid-1");
        assert_eq!(path.segments(), ["users", "uid-1"]);
    }
}
