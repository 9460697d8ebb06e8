//! # Domain Types
//!
//! Core domain types shared by the checkout flow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ ReferenceEntry  │   │  OrderRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id, client     │       │
//! │  │  priceUSD/UYU   │   │  name (es/en)   │   │  products       │       │
//! │  │  category ──────┼──►│                 │   │  total, status  │       │
//! │  │  subcategory    │   └─────────────────┘   └─────────────────┘       │
//! │  └────────┬────────┘                                                    │
//! │           │ normalize_product()                                         │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │NormalizedProduct│   │    NamedRef     │   │  OrderStatus    │       │
//! │  │  category ──────┼──►│  id, name       │   │  En Proceso     │       │
//! │  │  subcategory    │   │  (plain string) │   │  Cancelado ...  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Untrusted Shapes
//! Product JSON comes from a document store that never enforced a schema.
//! Fields that have shown up in more than one shape are modelled as untagged
//! enums with a catch-all `Unrecognized` variant, so deserialization of the
//! field itself never fails and the normalizer can fall back to empty values.
//! Reference table ids are read the same way: anything but a string becomes `""`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Reference Field (category / subcategory on a product)
// =============================================================================

/// How a product points at its category or subcategory.
///
/// Older products store the raw id, newer ones embed the whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceField {
    /// `"category": "remeras"`
    Id(String),
    /// `"category": { "id": "remeras", "name": ... }`
    Embedded(EmbeddedReference),
    /// Anything else (numbers, arrays, objects with a non-string id).
    Unrecognized(Value),
}

/// An embedded reference object. Only `id` is read; the rest is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddedReference {
    #[serde(default)]
    pub id: Option<String>,
}

impl ReferenceField {
    /// The referenced id, if one can be read.
    pub fn id(&self) -> Option<&str> {
        match self {
            ReferenceField::Id(id) => Some(id),
            ReferenceField::Embedded(embedded) => embedded.id.as_deref(),
            ReferenceField::Unrecognized(_) => None,
        }
    }
}

// =============================================================================
// Reference Tables
// =============================================================================

/// A display name that is either plain or translated per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedName {
    Plain(String),
    /// `{ "es": "Remeras", "en": "T-Shirts" }`
    Localized(BTreeMap<String, Value>),
    Unrecognized(Value),
}

impl Default for LocalizedName {
    fn default() -> Self {
        LocalizedName::Unrecognized(Value::Null)
    }
}

/// Fallback order for translated names.
const NAME_FALLBACK_LANGS: [&str; 2] = ["es", "en"];

impl LocalizedName {
    /// Resolves to a plain string: the plain name, else `es`, else `en`,
    /// else `""`. Blank translations are skipped.
    pub fn resolve(&self) -> String {
        self.lookup(&NAME_FALLBACK_LANGS)
    }

    /// Like [`LocalizedName::resolve`] but tries `lang` first.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::types::LocalizedName;
    ///
    /// let name: LocalizedName =
    ///     serde_json::from_str(r#"{"es": "Remeras", "en": "T-Shirts"}"#).unwrap();
    /// assert_eq!(name.resolve(), "Remeras");
    /// assert_eq!(name.resolve_in("en"), "T-Shirts");
    /// assert_eq!(name.resolve_in("pt"), "Remeras");
    /// ```
    pub fn resolve_in(&self, lang: &str) -> String {
        let [first, second] = NAME_FALLBACK_LANGS;
        self.lookup(&[lang, first, second])
    }

    fn lookup(&self, langs: &[&str]) -> String {
        match self {
            LocalizedName::Plain(name) => name.clone(),
            LocalizedName::Localized(names) => langs
                .iter()
                .filter_map(|lang| names.get(*lang).and_then(Value::as_str))
                .find(|name| !name.is_empty())
                .unwrap_or_default()
                .to_string(),
            LocalizedName::Unrecognized(_) => String::new(),
        }
    }
}

/// One row of the category or subcategory reference table.
///
/// Read-only data supplied by the catalog store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// `""` when the stored id is missing, `null`, or not a string.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: LocalizedName,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

impl ReferenceEntry {
    pub fn new(id: impl Into<String>, name: LocalizedName) -> Self {
        ReferenceEntry {
            id: id.into(),
            name,
        }
    }
}

/// A resolved `{id, name}` pair. `name` is always a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        NamedRef {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The `{id: "", name: ""}` placeholder used on a lookup miss.
    pub fn empty() -> Self {
        NamedRef::default()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as stored by the catalog store.
///
/// Only the fields the checkout logic reads are typed; everything else lands
/// in `extra` and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "priceUSD", default)]
    pub price_usd: f64,

    #[serde(rename = "discountPriceUSD", default, skip_serializing_if = "Option::is_none")]
    pub discount_price_usd: Option<f64>,

    #[serde(rename = "priceUYU", default)]
    pub price_uyu: f64,

    #[serde(rename = "discountPriceUYU", default, skip_serializing_if = "Option::is_none")]
    pub discount_price_uyu: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ReferenceField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<ReferenceField>,

    /// Every other field (title, images, stock, tipo, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A product whose category and subcategory are resolved display pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub id: String,

    #[serde(rename = "priceUSD")]
    pub price_usd: f64,

    #[serde(rename = "discountPriceUSD", default, skip_serializing_if = "Option::is_none")]
    pub discount_price_usd: Option<f64>,

    #[serde(rename = "priceUYU")]
    pub price_uyu: f64,

    #[serde(rename = "discountPriceUYU", default, skip_serializing_if = "Option::is_none")]
    pub discount_price_uyu: Option<f64>,

    pub category: NamedRef,
    pub subcategory: NamedRef,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Product Type ("tipo") Values
// =============================================================================

/// A product type as stored on a product or picked in a filter control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TipoValue {
    /// `"Retro"`
    Text(String),
    /// `{ "value": "Retro", "label": "Retro" }` as emitted by select widgets.
    Selected {
        #[serde(default)]
        value: Option<String>,
    },
    Unrecognized(Value),
}

/// One or many product types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TiposValue {
    One(String),
    Many(Vec<String>),
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle label of a recorded order.
///
/// Serialized with the Spanish labels the storefront's admin screens show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "En Proceso")]
    EnProceso,
    #[serde(rename = "Cancelado")]
    Cancelado,
    #[serde(rename = "Confirmado")]
    Confirmado,
    #[serde(rename = "Entregado")]
    Entregado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::EnProceso,
        OrderStatus::Cancelado,
        OrderStatus::Confirmado,
        OrderStatus::Entregado,
    ];

    /// The persisted label.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::EnProceso => "En Proceso",
            OrderStatus::Cancelado => "Cancelado",
            OrderStatus::Confirmado => "Confirmado",
            OrderStatus::Entregado => "Entregado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownOrderStatus(s.to_string()))
    }
}

// =============================================================================
// Order Record
// =============================================================================

/// Durable descriptor of one completed checkout.
///
/// `products` and `total` are display strings prepared by the checkout
/// screen, not structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRecord {
    pub id: String,
    pub client: String,
    pub phone: String,
    pub address: String,
    pub products: String,
    pub total: String,
    #[serde(default)]
    pub status: OrderStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_field_shapes() {
        let raw: ReferenceField = serde_json::from_value(json!("remeras")).unwrap();
        assert_eq!(raw.id(), Some("remeras"));

        let embedded: ReferenceField =
            serde_json::from_value(json!({"id": "buzos", "name": "Buzos"})).unwrap();
        assert_eq!(embedded.id(), Some("buzos"));

        let no_id: ReferenceField = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(no_id.id(), None);

        let numeric: ReferenceField = serde_json::from_value(json!(42)).unwrap();
        assert!(matches!(numeric, ReferenceField::Unrecognized(_)));
        assert_eq!(numeric.id(), None);
    }

    #[test]
    fn test_localized_name_resolution() {
        let plain: LocalizedName = serde_json::from_value(json!("Camperas")).unwrap();
        assert_eq!(plain.resolve(), "Camperas");

        let english_only: LocalizedName = serde_json::from_value(json!({"en": "Jackets"})).unwrap();
        assert_eq!(english_only.resolve(), "Jackets");

        let blank_es: LocalizedName =
            serde_json::from_value(json!({"es": "", "en": "Jackets"})).unwrap();
        assert_eq!(blank_es.resolve(), "Jackets");

        let unknown_lang: LocalizedName = serde_json::from_value(json!({"pt": "Jaquetas"})).unwrap();
        assert_eq!(unknown_lang.resolve(), "");

        assert_eq!(LocalizedName::default().resolve(), "");
    }

    #[test]
    fn test_product_preserves_unknown_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "priceUSD": 25.0,
            "priceUYU": 1000.0,
            "discountPriceUYU": null,
            "title": "Remera Retro",
            "stock": 3
        }))
        .unwrap();

        assert_eq!(product.discount_price_uyu, None);
        assert_eq!(product.extra.get("title"), Some(&json!("Remera Retro")));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["stock"], json!(3));
        assert_eq!(back["priceUSD"], json!(25.0));
    }

    #[test]
    fn test_order_status_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::EnProceso).unwrap(),
            "\"En Proceso\""
        );
        assert_eq!("entregado".parse::<OrderStatus>().unwrap(), OrderStatus::Entregado);
        assert_eq!(" En Proceso ".parse::<OrderStatus>().unwrap(), OrderStatus::EnProceso);
        assert!("Enviado".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_record_json_shape() {
        let order: OrderRecord = serde_json::from_value(json!({
            "id": "o-1",
            "client": "Ana",
            "phone": "098123456",
            "address": "Calle 1",
            "products": "Remera x1",
            "total": "US$ 25.00",
            "status": "Confirmado"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmado);

        let missing_status: OrderRecord = serde_json::from_value(json!({
            "id": "o-2", "client": "", "phone": "", "address": "",
            "products": "", "total": ""
        }))
        .unwrap();
        assert_eq!(missing_status.status, OrderStatus::EnProceso);
    }
}
