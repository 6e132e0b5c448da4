//! In-memory implementation of the record store
//!
//! The test fake, observably equivalent to the hosted store: hierarchical
//! JSON tree, generated push keys, and full-snapshot fan-out to every
//! subscriber whose path overlaps a mutation. Write failure is injectable
//! so the submission atomicity paths can be exercised.

use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::{RecordStore, StorePath, Subscription};
use crate::error::{Error, Result};

struct Listener {
    path: StorePath,
    tx: UnboundedSender<Value>,
}

#[derive(Default)]
struct Inner {
    root: Value,
    push_counter: u64,
    listeners: Vec<Listener>,
    fail_writes: bool,
}

/// In-process record store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a permission error
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::store("store lock poisoned"))
    }
}

fn node<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = current.get(segment)?;
    }
    Some(current)
}

fn node_mut<'a>(root: &'a mut Value, path: &StorePath) -> &'a mut Value {
    let mut current = root;
    for segment in path.segments() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
            _ => unreachable!(),
        };
    }
    current
}

impl Inner {
    fn reject_if_failing(&self) -> Result<()> {
        if self.fail_writes {
            Err(Error::store("permission denied"))
        } else {
            Ok(())
        }
    }

    /// Fan out full snapshots to every listener affected by a change at `changed`
    fn notify(&mut self, changed: &StorePath) {
        let root = self.root.clone();
        self.listeners.retain(|listener| {
            if changed.starts_with(&listener.path) || listener.path.starts_with(changed) {
                let snapshot = node(&root, &listener.path)
                    .cloned()
                    .unwrap_or(Value::Null);
                // A send failure means the subscription was dropped; prune it.
                listener.tx.send(snapshot).is_ok()
            } else {
                true
            }
        });
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        let mut inner = self.lock()?;
        inner.reject_if_failing()?;
        *node_mut(&mut inner.root, path) = value;
        inner.notify(path);
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let mut inner = self.lock()?;
        inner.reject_if_failing()?;
        inner.push_counter += 1;
        let key = format!("push-{:06}", inner.push_counter);
        let child = path.clone().child(&key);
        *node_mut(&mut inner.root, &child) = value;
        inner.notify(&child);
        Ok(key)
    }

    async fn update(&self, path: &StorePath, patch: Value) -> Result<()> {
        let fields = match patch {
            Value::Object(map) => map,
            _ => return Err(Error::store("update patch must be an object")),
        };
        let mut inner = self.lock()?;
        inner.reject_if_failing()?;
        let target = node_mut(&mut inner.root, path);
        if !target.is_object() {
            *target = Value::Object(Map::new());
        }
        if let Value::Object(existing) = target {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        inner.notify(path);
        Ok(())
    }

    async fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        let inner = self.lock()?;
        Ok(match node(&inner.root, path) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        })
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;
        let initial = node(&inner.root, path).cloned().unwrap_or(Value::Null);
        tx.send(initial)
            .map_err(|_| Error::store("subscriber dropped before first snapshot"))?;
        inner.listeners.push(Listener {
            path: path.clone(),
            tx,
        });
        Ok(Subscription::new(rx, None))
    }
}
