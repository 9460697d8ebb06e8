//! # Order Recorder
//!
//! Appends completed checkouts to the persisted order list.
//!
//! ## Record Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderRecorder::record                            │
//! │                                                                         │
//! │  1. LOAD   store.load()          "orders" blob ──► Vec<OrderRecord>     │
//! │            (missing blob ──► empty list)                                │
//! │                                                                         │
//! │  2. APPEND orders.push(order)    no duplicate-id check                  │
//! │                                                                         │
//! │  3. SAVE   store.save(&orders)   whole list re-serialized, replaces     │
//! │                                  the previous blob (last writer wins)   │
//! │                                                                         │
//! │  Any failure in 1 or 3 is returned to the caller unchanged.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lost Updates
//! Steps 1 and 3 are not atomic. Two recorders that both load before either
//! saves will each write back their own list, and the first append is lost.

use std::future::Future;

use storefront_core::{OrderRecord, ORDERS_STORAGE_KEY};
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

// =============================================================================
// Order Store
// =============================================================================

/// Whole-list persistence for order records.
pub trait OrderStore {
    /// All persisted orders in insertion order; empty when nothing is stored.
    fn load(&self) -> impl Future<Output = StoreResult<Vec<OrderRecord>>> + Send;

    /// Replaces the persisted list with `orders`.
    fn save(&self, orders: &[OrderRecord]) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Keeps the order list as one JSON array under a single key.
#[derive(Debug, Clone)]
pub struct JsonOrderStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> JsonOrderStore<K> {
    /// Uses the shared `"orders"` key.
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, ORDERS_STORAGE_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        JsonOrderStore {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }
}

impl<K: KeyValueStore + Sync> OrderStore for JsonOrderStore<K> {
    async fn load(&self) -> StoreResult<Vec<OrderRecord>> {
        let Some(blob) = self.kv.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };
        // A stored `null` reads as an empty list, like a missing key.
        let orders: Option<Vec<OrderRecord>> = serde_json::from_str(&blob)?;
        Ok(orders.unwrap_or_default())
    }

    async fn save(&self, orders: &[OrderRecord]) -> StoreResult<()> {
        let blob = serde_json::to_string(orders)?;
        self.kv.set_item(&self.key, blob).await
    }
}

// =============================================================================
// Recorder
// =============================================================================

/// Appends orders through an injected [`OrderStore`].
#[derive(Debug, Clone)]
pub struct OrderRecorder<S> {
    store: S,
}

impl<S: OrderStore> OrderRecorder<S> {
    pub fn new(store: S) -> Self {
        OrderRecorder { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends `order` to the persisted list.
    ///
    /// Duplicate ids are accepted; both records are kept.
    pub async fn record(&self, order: OrderRecord) -> StoreResult<()> {
        let mut orders = self.store.load().await?;
        debug!(existing = orders.len(), id = %order.id, "Loaded order list");

        let id = order.id.clone();
        orders.push(order);
        self.store.save(&orders).await?;

        info!(id = %id, total_orders = orders.len(), "Order recorded");
        Ok(())
    }

    /// All recorded orders, oldest first.
    pub async fn orders(&self) -> StoreResult<Vec<OrderRecord>> {
        self.store.load().await
    }

    /// Every record carrying `id`, oldest first.
    pub async fn find(&self, id: &str) -> StoreResult<Vec<OrderRecord>> {
        let orders = self.store.load().await?;
        Ok(orders.into_iter().filter(|order| order.id == id).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::kv::{FileKeyValueStore, MemoryKeyValueStore};
    use storefront_core::OrderStatus;

    fn order(id: &str, client: &str) -> OrderRecord {
        OrderRecord {
            id: id.to_string(),
            client: client.to_string(),
            phone: "098123456".to_string(),
            address: "Calle 1".to_string(),
            products: "Remera Retro x1".to_string(),
            total: "US$ 25.00".to_string(),
            status: OrderStatus::EnProceso,
        }
    }

    fn memory_recorder() -> (MemoryKeyValueStore, OrderRecorder<JsonOrderStore<MemoryKeyValueStore>>) {
        let kv = MemoryKeyValueStore::new();
        let recorder = OrderRecorder::new(JsonOrderStore::new(kv.clone()));
        (kv, recorder)
    }

    /// Backend whose reads or writes always fail.
    struct BrokenStore {
        fail_reads: bool,
    }

    impl KeyValueStore for BrokenStore {
        async fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
            if self.fail_reads {
                return Err(StoreError::Backend("quota exceeded".to_string()));
            }
            Ok(None)
        }

        async fn set_item(&self, _key: &str, _value: String) -> StoreResult<()> {
            Err(StoreError::Backend("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sequential_records_keep_insertion_order() {
        let (_, recorder) = memory_recorder();

        recorder.record(order("o-1", "Ana")).await.unwrap();
        recorder.record(order("o-2", "Bruno")).await.unwrap();

        let orders = recorder.orders().await.unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o-1", "o-2"]);
    }

    #[tokio::test]
    async fn test_blob_is_a_json_array_under_orders_key() {
        let (kv, recorder) = memory_recorder();
        recorder.record(order("o-1", "Ana")).await.unwrap();

        let blob = kv.get_item("orders").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value[0]["id"], "o-1");
        assert_eq!(value[0]["status"], "En Proceso");
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_list() {
        let (kv, recorder) = memory_recorder();
        assert!(recorder.orders().await.unwrap().is_empty());

        kv.set_item("orders", "null".to_string()).await.unwrap();
        assert!(recorder.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_kept() {
        let (_, recorder) = memory_recorder();
        recorder.record(order("o-1", "Ana")).await.unwrap();
        recorder.record(order("o-1", "Ana otra vez")).await.unwrap();

        let found = recorder.find("o-1").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].client, "Ana otra vez");
        assert!(recorder.find("o-9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_existing_orders_written_elsewhere_are_preserved() {
        let (kv, recorder) = memory_recorder();
        let existing = serde_json::to_string(&vec![order("legacy", "Carla")]).unwrap();
        kv.set_item("orders", existing).await.unwrap();

        recorder.record(order("o-1", "Ana")).await.unwrap();

        let ids: Vec<_> = recorder
            .orders()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["legacy", "o-1"]);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let (kv, recorder) = memory_recorder();
        kv.set_item("orders", "{not json".to_string()).await.unwrap();

        let err = recorder.record(order("o-1", "Ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
        // Nothing was overwritten.
        assert_eq!(kv.get_item("orders").await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_persistence_failures_propagate() {
        let write_fails = OrderRecorder::new(JsonOrderStore::new(BrokenStore { fail_reads: false }));
        let err = write_fails.record(order("o-1", "Ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        let read_fails = OrderRecorder::new(JsonOrderStore::new(BrokenStore { fail_reads: true }));
        assert!(read_fails.record(order("o-1", "Ana")).await.is_err());
    }

    #[tokio::test]
    async fn test_interleaved_writers_lose_an_update() {
        let kv = MemoryKeyValueStore::new();
        let first = JsonOrderStore::new(kv.clone());
        let second = JsonOrderStore::new(kv.clone());

        // Both checkouts read before either writes.
        let mut seen_by_first = first.load().await.unwrap();
        let mut seen_by_second = second.load().await.unwrap();

        seen_by_first.push(order("o-1", "Ana"));
        first.save(&seen_by_first).await.unwrap();

        seen_by_second.push(order("o-2", "Bruno"));
        second.save(&seen_by_second).await.unwrap();

        let survivors = OrderRecorder::new(JsonOrderStore::new(kv)).orders().await.unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, "o-2");
    }

    #[tokio::test]
    async fn test_custom_key() {
        let kv = MemoryKeyValueStore::new();
        let recorder = OrderRecorder::new(JsonOrderStore::with_key(kv.clone(), "orders-test"));
        recorder.record(order("o-1", "Ana")).await.unwrap();

        assert!(kv.get_item("orders").await.unwrap().is_none());
        assert!(kv.get_item("orders-test").await.unwrap().is_some());
        assert_eq!(recorder.store().key(), "orders-test");
    }

    #[tokio::test]
    async fn test_file_backed_orders_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let recorder = OrderRecorder::new(JsonOrderStore::new(FileKeyValueStore::new(dir.path())));
        recorder.record(order("o-1", "Ana")).await.unwrap();
        recorder.record(order("o-2", "Bruno")).await.unwrap();

        let reopened = OrderRecorder::new(JsonOrderStore::new(FileKeyValueStore::new(dir.path())));
        let orders = reopened.orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1], order("o-2", "Bruno"));
    }
}
