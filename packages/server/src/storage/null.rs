//! Store backend that persists nothing.

use async_trait::async_trait;

use super::{Record, RecordStore};

/// Accepts every write and remembers none of them. For services that carry
/// no state but still wire a store into their handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

#[async_trait]
impl RecordStore for NullStore {
    async fn put(&self, _record: Record) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> anyhow::Result<Option<Record>> {
        Ok(None)
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn len(&self) -> anyhow::Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_are_accepted_and_forgotten() {
        let store = NullStore;
        store
            .put(Record::new("alpha", serde_json::json!(1)))
            .await
            .unwrap();
        assert!(store.get("alpha").await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
