//! # Validation Module
//!
//! Checkout form validation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Form Validation                           │
//! │                                                                         │
//! │  CartFormData (from the checkout UI)                                   │
//! │       │                                                                 │
//! │       ├── name     ──► validate_required ──┐                            │
//! │       ├── address  ──► validate_required ──┤                            │
//! │       ├── city     ──► validate_required ──┤                            │
//! │       ├── state    ──► validate_required ──┤  every field is checked,  │
//! │       ├── zip      ──► validate_zip      ──┤  no short circuit         │
//! │       ├── email    ──► validate_email    ──┤                            │
//! │       └── phone    ──► validate_phone    ──┘                            │
//! │                                            │                            │
//! │                                            ▼                            │
//! │  ValidationResult { valid, errors: { field -> message } }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_cart_form, CartFormData};
//!
//! let form = CartFormData {
//!     name: Some("Ana".into()),
//!     zip: Some("123".into()),
//!     ..CartFormData::default()
//! };
//! let result = validate_cart_form(&form);
//! assert!(!result.valid);
//! assert!(result.errors.contains_key("zip"));
//! assert!(!result.errors.contains_key("name"));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use ts_rs::TS;

use crate::error::FieldError;

/// Structural email check: `local@domain.tld`, no whitespace, one `@`.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

pub const ZIP_LENGTH: usize = 5;
pub const PHONE_MIN_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;

// =============================================================================
// Form Types
// =============================================================================

/// The fields of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CartField {
    Name,
    Address,
    City,
    State,
    Zip,
    Email,
    Phone,
}

impl CartField {
    pub const ALL: [CartField; 7] = [
        CartField::Name,
        CartField::Address,
        CartField::City,
        CartField::State,
        CartField::Zip,
        CartField::Email,
        CartField::Phone,
    ];

    /// Key used in [`ValidationResult::errors`] and in the form JSON.
    pub const fn key(&self) -> &'static str {
        match self {
            CartField::Name => "name",
            CartField::Address => "address",
            CartField::City => "city",
            CartField::State => "state",
            CartField::Zip => "zip",
            CartField::Email => "email",
            CartField::Phone => "phone",
        }
    }
}

/// Human-readable label, used at the start of error messages.
impl fmt::Display for CartField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CartField::Name => "Name",
            CartField::Address => "Address",
            CartField::City => "City",
            CartField::State => "State",
            CartField::Zip => "ZIP code",
            CartField::Email => "Email",
            CartField::Phone => "Phone",
        };
        f.write_str(label)
    }
}

/// Shipping and contact details typed into the checkout form.
///
/// Every field is optional on the wire; a missing field is a validation
/// failure, not a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartFormData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CartFormData {
    /// The raw value of `field`.
    pub fn get(&self, field: CartField) -> Option<&str> {
        let value = match field {
            CartField::Name => &self.name,
            CartField::Address => &self.address,
            CartField::City => &self.city,
            CartField::State => &self.state,
            CartField::Zip => &self.zip,
            CartField::Email => &self.email,
            CartField::Phone => &self.phone,
        };
        value.as_deref()
    }
}

/// Outcome of validating a whole form.
///
/// ## Invariant
/// `valid == errors.is_empty()`. Build it through [`ValidationResult::from_errors`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn from_errors(errors: impl IntoIterator<Item = FieldError>) -> Self {
        let errors: BTreeMap<String, String> = errors
            .into_iter()
            .map(|err| (err.field().key().to_string(), err.to_string()))
            .collect();
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Message for `field`, if it failed.
    pub fn error_for(&self, field: CartField) -> Option<&str> {
        self.errors.get(field.key()).map(String::as_str)
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Result type for a single field check.
pub type FieldResult = Result<(), FieldError>;

/// Present and non-blank after trimming. Returns the value as supplied.
pub fn validate_required(field: CartField, value: Option<&str>) -> Result<&str, FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FieldError::Required { field }),
    }
}

/// Exactly five ASCII digits.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_zip;
///
/// assert!(validate_zip(Some("11100")).is_ok());
/// assert!(validate_zip(Some("1110")).is_err());
/// assert!(validate_zip(None).is_err());
/// ```
pub fn validate_zip(value: Option<&str>) -> FieldResult {
    let zip = validate_required(CartField::Zip, value)?;

    if zip.len() != ZIP_LENGTH || !zip.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::InvalidFormat {
            field: CartField::Zip,
            reason: "must be exactly 5 digits",
        });
    }

    Ok(())
}

/// Minimal structural email check, not RFC 5322.
pub fn validate_email(value: Option<&str>) -> FieldResult {
    let email = validate_required(CartField::Email, value)?;

    if !EMAIL_RE.is_match(email) {
        return Err(FieldError::InvalidFormat {
            field: CartField::Email,
            reason: "must look like name@example.com",
        });
    }

    Ok(())
}

/// 8 to 15 ASCII digits, nothing else (no `+`, spaces or dashes).
pub fn validate_phone(value: Option<&str>) -> FieldResult {
    let phone = validate_required(CartField::Phone, value)?;

    let digits_only = phone.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&phone.len()) {
        return Err(FieldError::InvalidFormat {
            field: CartField::Phone,
            reason: "must contain 8 to 15 digits",
        });
    }

    Ok(())
}

fn validate_field(form: &CartFormData, field: CartField) -> FieldResult {
    let value = form.get(field);
    match field {
        CartField::Name | CartField::Address | CartField::City | CartField::State => {
            validate_required(field, value).map(|_| ())
        }
        CartField::Zip => validate_zip(value),
        CartField::Email => validate_email(value),
        CartField::Phone => validate_phone(value),
    }
}

// =============================================================================
// Form Validator
// =============================================================================

/// Validates every field of the checkout form independently.
///
/// Pure: the form is only read.
pub fn validate_cart_form(form: &CartFormData) -> ValidationResult {
    ValidationResult::from_errors(
        CartField::ALL
            .into_iter()
            .filter_map(|field| validate_field(form, field).err()),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
