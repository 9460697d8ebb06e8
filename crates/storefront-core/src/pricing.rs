//! # Pricing Module
//!
//! Resolves the price actually charged for a product and totals a cart.
//!
//! ## Price Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product                                 Currency::Usd                  │
//! │  ├── priceUSD          25.00  ─┐                                        │
//! │  ├── discountPriceUSD  19.99  ─┴──► discount present? ──► 19.99         │
//! │  ├── priceUYU        1000.00  ─┐                                        │
//! │  └── discountPriceUYU   null  ─┴──► discount absent ────► 1000.00       │
//! │                                          Currency::Uyu                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount price, when present, is authoritative for its currency even
//! if it is higher than the base price. No positivity checks are made here.

use serde::{Deserialize, Serialize};

use crate::money::{Currency, Money};
use crate::types::Product;

/// Returns the effective unit price of `product` in `currency`.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Currency;
/// use storefront_core::pricing::final_price;
/// use storefront_core::types::Product;
///
/// let product = Product {
///     price_usd: 25.0,
///     discount_price_usd: Some(19.99),
///     price_uyu: 1000.0,
///     ..Product::default()
/// };
/// assert_eq!(final_price(&product, Currency::Usd), 19.99);
/// assert_eq!(final_price(&product, Currency::Uyu), 1000.0);
/// ```
pub fn final_price(product: &Product, currency: Currency) -> f64 {
    let (base, discount) = match currency {
        Currency::Usd => (product.price_usd, product.discount_price_usd),
        Currency::Uyu => (product.price_uyu, product.discount_price_uyu),
    };
    discount.unwrap_or(base)
}

/// [`final_price`] converted to cents.
pub fn unit_price(product: &Product, currency: Currency) -> Money {
    Money::from_amount(final_price(product, currency))
}

// =============================================================================
// Cart Totals
// =============================================================================

/// A product with the quantity the shopper put in the cart.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl<'a> CartLine<'a> {
    pub fn new(product: &'a Product, quantity: u32) -> Self {
        CartLine { product, quantity }
    }

    /// Effective unit price × quantity.
    pub fn line_total(&self, currency: Currency) -> Money {
        unit_price(self.product, currency).multiply_quantity(self.quantity)
    }
}

/// An owned cart line as the checkout screen saves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl CartEntry {
    pub fn line(&self) -> CartLine<'_> {
        CartLine::new(&self.product, self.quantity)
    }
}

/// Sums all line totals in `currency`.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Currency;
/// use storefront_core::pricing::{cart_total, CartLine};
/// use storefront_core::types::Product;
///
/// let remera = Product { price_usd: 25.0, discount_price_usd: Some(20.0), ..Product::default() };
/// let buzo = Product { price_usd: 40.5, ..Product::default() };
///
/// let total = cart_total(&[CartLine::new(&remera, 2), CartLine::new(&buzo, 1)], Currency::Usd);
/// assert_eq!(total.display_in(Currency::Usd), "US$ 80.50");
/// ```
pub fn cart_total(lines: &[CartLine<'_>], currency: Currency) -> Money {
    lines.iter().map(|line| line.line_total(currency)).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
