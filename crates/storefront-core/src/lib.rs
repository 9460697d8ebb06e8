//! # storefront-core: Pure Checkout Logic for the Storefront
//!
//! This crate holds the storefront's checkout rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (external)                            │   │
//! │  │   Catalog ──► Product page ──► Cart ──► Checkout form           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ normalize │  │ validation│  │   │
//! │  │   │  Product  │  │final_price│  │ products  │  │ cart form │  │   │
//! │  │   │  Order    │  │cart_total │  │ tipos     │  │  fields   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-store (Persistence Layer)               │   │
//! │  │              order list under the "orders" key                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, reference tables, OrderRecord)
//! - [`money`] - Money in integer cents and the Currency selector
//! - [`pricing`] - Effective price resolution and cart totals
//! - [`normalize`] - Product and product-type normalization
//! - [`validation`] - Checkout form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{final_price, Currency, Product};
//!
//! let product = Product {
//!     price_usd: 25.0,
//!     discount_price_usd: Some(19.99),
//!     ..Product::default()
//! };
//! assert_eq!(final_price(&product, Currency::Usd), 19.99);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod normalize;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FieldError};
pub use money::{Currency, Money};
pub use normalize::{get_tipos, normalize_product, normalize_products, normalize_tipo};
pub use pricing::{cart_total, final_price, unit_price, CartEntry, CartLine};
pub use types::*;
pub use validation::{validate_cart_form, CartField, CartFormData, ValidationResult};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the order list is persisted under.
///
/// Shared with the web UI, which reads the same key from browser storage.
pub const ORDERS_STORAGE_KEY: &str = "orders";
