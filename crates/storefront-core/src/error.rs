//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError   - Parsing of closed domain sets (currency, status)    │
//! │  └── FieldError  - One checkout form field failing its rule            │
//! │                                                                         │
//! │  storefront-store errors (separate crate)                              │
//! │  └── StoreError  - Persistence and configuration failures              │
//! │                                                                         │
//! │  FieldError is never raised: the validator collects them as DATA       │
//! │  into a ValidationResult for the checkout UI.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::validation::CartField;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Currency code outside the supported set.
    #[error("Unknown currency: '{0}'. Valid options: USD, UYU")]
    UnknownCurrency(String),

    /// Order status label outside the closed set.
    ///
    /// ## When This Occurs
    /// - An operator types a status on the CLI
    /// - A hand-edited order blob carries a label the storefront never writes
    #[error("Unknown order status: '{0}'")]
    UnknownOrderStatus(String),
}

// =============================================================================
// Field Error
// =============================================================================

/// A single checkout form field failing validation.
///
/// The `Display` output is the human-readable message shown next to the
/// field in the checkout UI.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field is absent or blank after trimming.
    #[error("{field} is required")]
    Required { field: CartField },

    /// The field is present but does not have the expected shape.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: CartField,
        reason: &'static str,
    },
}

impl FieldError {
    /// The form field this error belongs to.
    pub fn field(&self) -> CartField {
        match self {
            FieldError::Required { field } | FieldError::InvalidFormat { field, .. } => *field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
