//! # storefront-store: Persistence Layer for the Storefront
//!
//! Persists completed orders as one JSON list under a single key, in the same
//! shape the web UI keeps in browser local storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Recording Flow                             │
//! │                                                                         │
//! │  Checkout completed (external)                                         │
//! │       │  OrderRecord                                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-store (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │ OrderRecorder │───►│ JsonOrderStore │───►│ KeyValueStore│  │   │
//! │  │   │  (orders.rs)  │    │  "orders" blob │    │  (kv.rs)     │  │   │
//! │  │   └───────────────┘    └────────────────┘    │ Memory/File  │  │   │
//! │  │                                              └──────────────┘  │   │
//! │  │   StoreConfig (config.rs): data dir, key, currency             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`orders`] - Order store trait, JSON list store, recorder
//! - [`kv`] - Key-value backends (in-memory, file)
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_store::{open_file_recorder, StoreConfig};
//!
//! let config = StoreConfig::load(None)?;
//! let recorder = open_file_recorder(&config);
//! recorder.record(order).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod kv;
pub mod orders;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use orders::{JsonOrderStore, OrderRecorder, OrderStore};

/// Recorder backed by files in the configured data directory.
pub type FileOrderRecorder = OrderRecorder<JsonOrderStore<FileKeyValueStore>>;

/// Builds the file-backed recorder described by `config`.
pub fn open_file_recorder(config: &StoreConfig) -> FileOrderRecorder {
    let kv = FileKeyValueStore::new(config.data_dir());
    OrderRecorder::new(JsonOrderStore::with_key(kv, config.orders_key()))
}
