//! Record storage behind a backend-agnostic trait.
//!
//! Handlers talk to [`RecordStore`] only; the concrete backend is chosen
//! once at startup by [`build_store`]. Two backends ship in-tree: an
//! in-memory map for single-process deployments and tests, and a null
//! store for services that keep no state at all.

pub mod memory;
pub mod null;

pub use memory::MemoryStore;
pub use null::NullStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One stored record: a key, an arbitrary JSON value, and the time of the
/// last write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Backend-agnostic record persistence.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Stores a record, replacing any previous value under the same key.
    async fn put(&self, record: Record) -> anyhow::Result<()>;

    /// Fetches the record stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<Record>>;

    /// Removes the record stored under `key`. Removing an absent key is not
    /// an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Number of stored records.
    async fn len(&self) -> anyhow::Result<usize>;
}

/// Instantiates the store backend named in the configuration.
///
/// # Errors
///
/// Returns an error for an unknown backend name; startup must fail rather
/// than silently run with the wrong store.
pub fn build_store(backend: &str) -> anyhow::Result<Arc<dyn RecordStore>> {
    match backend {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "null" => Ok(Arc::new(NullStore)),
        other => anyhow::bail!("unknown store backend: {other}"),
    }
}
