//! # Store Configuration
//!
//! Where the order list lives and which currency the checkout totals use.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_DATA_DIR=/var/lib/storefront                            │
//! │     STOREFRONT_ORDERS_KEY=orders                                       │
//! │     STOREFRONT_CURRENCY=UYU                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.shop/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, key "orders", USD                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! data_dir = "/var/lib/storefront"
//! orders_key = "orders"
//!
//! [checkout]
//! currency = "UYU"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_core::{cart_total, CartLine, Currency, ORDERS_STORAGE_KEY};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv;

pub const ENV_DATA_DIR: &str = "STOREFRONT_DATA_DIR";
pub const ENV_ORDERS_KEY: &str = "STOREFRONT_ORDERS_KEY";
pub const ENV_CURRENCY: &str = "STOREFRONT_CURRENCY";

// =============================================================================
// Storage Settings
// =============================================================================

/// Where and under which key orders are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for the file-backed key-value store.
    /// `None` means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Key the order list is stored under.
    #[serde(default = "default_orders_key")]
    pub orders_key: String,
}

fn default_orders_key() -> String {
    ORDERS_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            orders_key: default_orders_key(),
        }
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Currency used when totalling carts.
    #[serde(default)]
    pub currency: Currency,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let key = &self.storage.orders_key;
        if key.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "orders_key must not be empty".into(),
            ));
        }

        kv::validate_key(key).map_err(|_| {
            StoreError::InvalidConfig(format!(
                "orders_key may only use letters, digits, '-', '_' and '.' and must not start with '.', got: '{}'",
                key
            ))
        })?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup(ENV_ORDERS_KEY) {
            debug!(orders_key = %key, "Overriding orders key from environment");
            self.storage.orders_key = key;
        }

        if let Some(currency) = lookup(ENV_CURRENCY) {
            match currency.parse() {
                Ok(parsed) => self.checkout.currency = parsed,
                Err(e) => warn!(currency = %currency, "Ignoring currency override: {}", e),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "storefront", "shop")
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved data directory: configured, else platform data dir, else `./data`.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn orders_key(&self) -> &str {
        &self.storage.orders_key
    }

    pub fn currency(&self) -> Currency {
        self.checkout.currency
    }

    /// Cart total in the checkout currency, formatted like an order's `total`.
    pub fn format_cart_total(&self, lines: &[CartLine<'_>]) -> String {
        let currency = self.currency();
        cart_total(lines, currency).display_in(currency)
    }
}
