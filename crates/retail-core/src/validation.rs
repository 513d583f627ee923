//! # Validation Module
//!
//! Input validation for names, prices, stock levels and quantities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Menu / UI (external)                                         │
//! │  ├── Parsing text into numbers                                         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names present and bounded                                         │
//! │  └── Prices positive, stock non-negative, quantities in range          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  ├── Key lookups (member, item, category)                              │
//! │  └── Stock availability                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::MAX_PRICE_CENTS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item, category or member name.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name used as a registry key.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name, which is what the registries store as the key.
///
/// ## Example
/// ```rust
/// use retail_core::validation::validate_name;
///
/// assert_eq!(validate_name("item name", "  Widget ").unwrap(), "Widget");
/// assert!(validate_name("item name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item price.
///
/// ## Rules
/// - Must be strictly positive; a zero or negative price is `InvalidAmount`
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use retail_core::money::Money;
/// use retail_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(999)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> CoreResult<()> {
    if !price.is_positive() {
        return Err(CoreError::invalid_price(price));
    }

    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        }
        .into());
    }

    Ok(())
}

/// Validates an initial stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a selection quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `max` (the store's `max_item_quantity`)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: select an item                                               │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5, 999) ← THIS FUNCTION                             │
/// │       │                                                                 │
/// │       ├── qty <= 0?   → "quantity must be positive"                    │
/// │       │                                                                 │
/// │       ├── qty > 999?  → QuantityTooLarge                               │
/// │       │                                                                 │
/// │       └── OK → stock check in the store                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64, max: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if qty > max {
        return Err(CoreError::QuantityTooLarge { requested: qty, max });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Widget").unwrap(), "Widget");
        assert_eq!(validate_name("name", "  Tools  ").unwrap(), "Tools");

        assert!(matches!(
            validate_name("name", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_name("name", "   ").is_err());
        assert!(matches!(
            validate_name("name", &"A".repeat(MAX_NAME_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(matches!(
            validate_price(Money::zero()),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(validate_price(Money::from_cents(-100)).is_err());

        assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(validate_price(Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(5).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1, 999).is_ok());
        assert!(validate_quantity(999, 999).is_ok());

        assert!(matches!(
            validate_quantity(0, 999),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(validate_quantity(-1, 999).is_err());
        assert!(matches!(
            validate_quantity(1000, 999),
            Err(CoreError::QuantityTooLarge { requested: 1000, max: 999 })
        ));
    }
}
