//! # Error Types
//!
//! Domain-specific error types for retail-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  retail-core errors (this file)                                        │
//! │  ├── CoreError        - Lookup misses, stock and registry failures     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  retail-service errors (separate crate)                                │
//! │  ├── ServiceError     - What a UI collaborator sees (serialized)       │
//! │  └── ConfigError      - Config file / environment problems             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → UI                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, member name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Shortages during processing are data on the receipt, not errors

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is recoverable: the caller gets a typed result and decides
/// how to render it. Nothing in the core aborts the host process.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price (or other amount) is zero or negative.
    #[error("Invalid {field}: {amount} must be greater than zero")]
    InvalidAmount { field: String, amount: Money },

    /// Requested quantity exceeds current stock.
    ///
    /// ## When This Occurs
    /// - Selecting more units than are on the shelf
    /// - A stock adjustment that would push stock below zero
    ///
    /// ## User Workflow
    /// ```text
    /// Select Widget (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Widget", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Widget in stock"
    /// ```
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Stock is zero when a unit is taken.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Member name is not registered.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Item name is not in the inventory.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Category name has never been created.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Inventory and category views disagree about an item.
    ///
    /// ## When This Occurs
    /// Never, as long as every mutation goes through [`crate::Store`].
    /// Surfaced by [`crate::Store::check_consistency`] so tests can detect it.
    #[error("Registry inconsistency for {item}: {detail}")]
    RegistryInconsistency { item: String, detail: String },

    /// Transaction has exceeded the maximum allowed units.
    #[error("Transaction cannot have more than {max} units")]
    TransactionTooLarge { max: usize },

    /// A running total no longer fits in `Money`.
    #[error("Transaction total overflows the supported amount range")]
    AmountOverflow,

    /// The member id held by a transaction belongs to no member of this
    /// store. Carries the id, not a name.
    #[error("No member with id {0}")]
    MemberIdNotFound(String),

    /// Selection quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Convenience constructor for a non-positive price.
    pub fn invalid_price(amount: Money) -> Self {
        CoreError::InvalidAmount {
            field: "price".to_string(),
            amount,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price with three decimal places).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., a member name already in use).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
