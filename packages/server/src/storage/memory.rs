//! In-memory record store backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Record, RecordStore};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Record>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: Record) -> anyhow::Result<()> {
        self.records.insert(record.key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<Record>> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.records.remove(key);
        Ok(())
    }

    async fn len(&self) -> anyhow::Result<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let store = MemoryStore::new();
        store
            .put(Record::new("alpha", serde_json::json!({"n": 1})))
            .await
            .unwrap();

        let fetched = store.get("alpha").await.unwrap().unwrap();
        assert_eq!(fetched.value["n"], 1);
        assert_eq!(store.len().await.unwrap(), 1);

        store.remove("alpha").await.unwrap();
        assert!(store.get("alpha").await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn put_replaces_existing_value() {
        let store = MemoryStore::new();
        store
            .put(Record::new("alpha", serde_json::json!(1)))
            .await
            .unwrap();
        store
            .put(Record::new("alpha", serde_json::json!(2)))
            .await
            .unwrap();

        let fetched = store.get("alpha").await.unwrap().unwrap();
        assert_eq!(fetched.value, serde_json::json!(2));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn removing_an_absent_key_is_fine() {
        let store = MemoryStore::new();
        store.remove("missing").await.unwrap();
    }
}
