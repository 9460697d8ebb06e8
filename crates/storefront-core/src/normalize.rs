//! # Normalization Module
//!
//! Reshapes loosely-typed catalog data into the canonical forms the
//! storefront renders.
//!
//! ## Product Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product.category ── "remeras" ──────────┐                             │
//! │       or           { id: "remeras" } ────┤ ReferenceField::id()        │
//! │                                          ▼                             │
//! │  categories table ──── find(id == "remeras") ──┬── hit ──► name        │
//! │                                                └── miss ─► {"", ""}    │
//! │                                          │                             │
//! │  name: "Remeras" | {es, en} ─────────────┴──► plain string             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module fails: malformed input degrades to empty strings.

use crate::types::{
    NamedRef, NormalizedProduct, Product, ReferenceEntry, ReferenceField, TipoValue, TiposValue,
};

// =============================================================================
// Products
// =============================================================================

/// Resolves `product.category` and `product.subcategory` against the
/// reference tables. All other fields pass through unchanged.
///
/// ## Example
/// ```rust
/// use storefront_core::normalize::normalize_product;
/// use storefront_core::types::{LocalizedName, Product, ReferenceEntry, ReferenceField};
///
/// let categories = vec![ReferenceEntry::new("remeras", LocalizedName::Plain("Remeras".into()))];
/// let product = Product {
///     id: "p1".into(),
///     category: Some(ReferenceField::Id("remeras".into())),
///     ..Product::default()
/// };
///
/// let normalized = normalize_product(&product, &categories, &[]);
/// assert_eq!(normalized.category.name, "Remeras");
/// assert_eq!(normalized.subcategory.id, "");
/// ```
pub fn normalize_product(
    product: &Product,
    categories: &[ReferenceEntry],
    subcategories: &[ReferenceEntry],
) -> NormalizedProduct {
    NormalizedProduct {
        id: product.id.clone(),
        price_usd: product.price_usd,
        discount_price_usd: product.discount_price_usd,
        price_uyu: product.price_uyu,
        discount_price_uyu: product.discount_price_uyu,
        category: resolve_category(product.category.as_ref(), categories),
        subcategory: resolve_subcategory(product.subcategory.as_ref(), subcategories),
        extra: product.extra.clone(),
    }
}

/// Normalizes a page of products against the same reference tables.
pub fn normalize_products(
    products: &[Product],
    categories: &[ReferenceEntry],
    subcategories: &[ReferenceEntry],
) -> Vec<NormalizedProduct> {
    products
        .iter()
        .map(|product| normalize_product(product, categories, subcategories))
        .collect()
}

fn find_entry<'a>(
    reference: Option<&ReferenceField>,
    table: &'a [ReferenceEntry],
) -> Option<&'a ReferenceEntry> {
    let id = reference.and_then(ReferenceField::id)?;
    table.iter().find(|entry| entry.id == id)
}

/// A miss (including an unreadable reference) yields `{id: "", name: ""}`.
/// A hit keeps the entry's id even when its name cannot be resolved.
fn resolve_category(reference: Option<&ReferenceField>, table: &[ReferenceEntry]) -> NamedRef {
    match find_entry(reference, table) {
        Some(entry) => NamedRef::new(entry.id.clone(), entry.name.resolve()),
        None => NamedRef::empty(),
    }
}

/// Stricter than categories: an entry with an empty id counts as a miss, so
/// a blank reference never picks up a stray blank row's name.
fn resolve_subcategory(reference: Option<&ReferenceField>, table: &[ReferenceEntry]) -> NamedRef {
    match find_entry(reference, table) {
        Some(entry) if !entry.id.is_empty() => {
            NamedRef::new(entry.id.clone(), entry.name.resolve())
        }
        _ => NamedRef::empty(),
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Canonical lower-cased, trimmed form of a product type.
///
/// ```rust
/// use storefront_core::normalize::normalize_tipo;
/// use storefront_core::types::TipoValue;
///
/// let picked = TipoValue::Selected { value: Some("  Retro  ".into()) };
/// assert_eq!(normalize_tipo(Some(&picked)), "retro");
/// assert_eq!(normalize_tipo(None), "");
/// ```
pub fn normalize_tipo(tipo: Option<&TipoValue>) -> String {
    let raw = match tipo {
        Some(TipoValue::Text(text)) => text.as_str(),
        Some(TipoValue::Selected { value }) => value.as_deref().unwrap_or_default(),
        Some(TipoValue::Unrecognized(_)) | None => "",
    };
    raw.trim().to_lowercase()
}

/// Always returns a list: `[]` when absent, `[x]` for a scalar, the list
/// itself otherwise. Entries are not trimmed or deduplicated.
pub fn get_tipos(tipos: Option<TiposValue>) -> Vec<String> {
    match tipos {
        None => Vec::new(),
        Some(TiposValue::One(tipo)) => vec![tipo],
        Some(TiposValue::Many(list)) => list,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizedName;
    use serde_json::json;

    fn tables() -> (Vec<ReferenceEntry>, Vec<ReferenceEntry>) {
        let categories = serde_json::from_value(json!([
            {"id": "remeras", "name": "Remeras"},
            {"id": "buzos", "name": {"es": "Buzos", "en": "Hoodies"}},
            {"id": "gorros", "name": {"en": "Caps"}},
            {"id": "sin-nombre"}
        ]))
        .unwrap();
        let subcategories = serde_json::from_value(json!([
            {"id": "retro", "name": {"es": "Retro"}},
            {"id": "", "name": "Fantasma"}
        ]))
        .unwrap();
        (categories, subcategories)
    }

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_id_and_embedded_object_resolve_the_same() {
        let (cats, subs) = tables();
        let raw = product(json!({"id": "p1", "category": "buzos", "subcategory": "retro"}));
        let embedded = product(json!({
            "id": "p1",
            "category": {"id": "buzos", "name": "stale"},
            "subcategory": {"id": "retro"}
        }));

        let a = normalize_product(&raw, &cats, &subs);
        let b = normalize_product(&embedded, &cats, &subs);

        assert_eq!(a.category, NamedRef::new("buzos", "Buzos"));
        assert_eq!(a.subcategory, NamedRef::new("retro", "Retro"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_fallbacks() {
        let (cats, subs) = tables();

        let english = normalize_product(&product(json!({"category": "gorros"})), &cats, &subs);
        assert_eq!(english.category, NamedRef::new("gorros", "Caps"));

        let nameless = normalize_product(&product(json!({"category": "sin-nombre"})), &cats, &subs);
        assert_eq!(nameless.category, NamedRef::new("sin-nombre", ""));
    }

    #[test]
    fn test_malformed_table_row_does_not_sink_the_table() {
        let subs: Vec<ReferenceEntry> = serde_json::from_value(json!([
            {"id": null, "name": "Sin id"},
            {"id": 7, "name": "Numérico"},
            {"id": "retro", "name": {"es": "Retro"}}
        ]))
        .unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].id, "");
        assert_eq!(subs[1].id, "");

        let hit = normalize_product(&product(json!({"subcategory": "retro"})), &[], &subs);
        assert_eq!(hit.subcategory, NamedRef::new("retro", "Retro"));

        let blank = normalize_product(&product(json!({"subcategory": ""})), &[], &subs);
        assert_eq!(blank.subcategory, NamedRef::empty());
    }

    #[test]
    fn test_lookup_miss_yields_empty_pair() {
        let (cats, subs) = tables();
        let normalized = normalize_product(
            &product(json!({"category": "no-existe", "subcategory": "tampoco"})),
            &cats,
            &subs,
        );
        assert_eq!(normalized.category, NamedRef::empty());
        assert_eq!(normalized.subcategory, NamedRef::empty());
    }

    #[test]
    fn test_blank_subcategory_row_is_not_matched() {
        let (cats, subs) = tables();
        let normalized = normalize_product(&product(json!({"subcategory": ""})), &cats, &subs);
        assert_eq!(normalized.subcategory, NamedRef::empty());

        let no_id = normalize_product(&product(json!({"subcategory": {"name": "x"}})), &cats, &subs);
        assert_eq!(no_id.subcategory, NamedRef::empty());
    }

    #[test]
    fn test_missing_everything_never_fails() {
        let normalized = normalize_product(&Product::default(), &[], &[]);
        assert_eq!(normalized.category, NamedRef::empty());
        assert_eq!(normalized.subcategory, NamedRef::empty());

        let odd = product(json!({"category": 7, "subcategory": [1, 2]}));
        let normalized = normalize_product(&odd, &[], &[]);
        assert_eq!(normalized.category.name, "");
        assert_eq!(normalized.subcategory.name, "");
    }

    #[test]
    fn test_other_fields_pass_through() {
        let (cats, subs) = tables();
        let raw = product(json!({
            "id": "p9",
            "priceUSD": 30.0,
            "discountPriceUSD": 25.0,
            "priceUYU": 1200.0,
            "title": "Buzo Retro",
            "images": ["a.jpg"],
            "category": "buzos"
        }));

        let normalized = normalize_product(&raw, &cats, &subs);
        let json = serde_json::to_value(&normalized).unwrap();

        assert_eq!(json["title"], json!("Buzo Retro"));
        assert_eq!(json["images"], json!(["a.jpg"]));
        assert_eq!(json["discountPriceUSD"], json!(25.0));
        assert_eq!(json["category"], json!({"id": "buzos", "name": "Buzos"}));
        assert_eq!(json["subcategory"], json!({"id": "", "name": ""}));
    }

    #[test]
    fn test_normalize_products_keeps_order() {
        let (cats, subs) = tables();
        let products = vec![
            product(json!({"id": "a", "category": "remeras"})),
            product(json!({"id": "b", "category": "buzos"})),
        ];
        let names: Vec<_> = normalize_products(&products, &cats, &subs)
            .into_iter()
            .map(|p| p.category.name)
            .collect();
        assert_eq!(names, vec!["Remeras", "Buzos"]);
    }

    #[test]
    fn test_reference_entry_with_plain_name() {
        let table = vec![ReferenceEntry::new("x", LocalizedName::Plain("Equis".into()))];
        let p = Product {
            category: Some(ReferenceField::Id("x".into())),
            ..Product::default()
        };
        assert_eq!(normalize_product(&p, &table, &[]).category.name, "Equis");
    }

    #[test]
    fn test_normalize_tipo() {
        let picked: TipoValue = serde_json::from_value(json!({"value": "  Retro  "})).unwrap();
        assert_eq!(normalize_tipo(Some(&picked)), "retro");

        let text: TipoValue = serde_json::from_value(json!(" Vintage")).unwrap();
        assert_eq!(normalize_tipo(Some(&text)), "vintage");

        let empty_option: TipoValue = serde_json::from_value(json!({"label": "x"})).unwrap();
        assert_eq!(normalize_tipo(Some(&empty_option)), "");

        assert_eq!(normalize_tipo(None), "");
    }

    #[test]
    fn test_get_tipos() {
        let one: TiposValue = serde_json::from_value(json!("Retro")).unwrap();
        assert_eq!(get_tipos(Some(one)), vec!["Retro"]);

        let many: TiposValue = serde_json::from_value(json!(["A", "B"])).unwrap();
        assert_eq!(get_tipos(Some(many)), vec!["A", "B"]);

        assert!(get_tipos(None).is_empty());
    }
}
