//! # Items
//!
//! A catalogue entry: name, price, stock and the category it is filed under.
//!
//! ## Stock Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stock Mutation                                  │
//! │                                                                         │
//! │  adjust_stock(+n) ──► stock += n                                        │
//! │                                                                         │
//! │  adjust_stock(-n) ──► stock >= n ? stock -= n : InsufficientStock       │
//! │                                                                         │
//! │  take_unit()      ──► stock > 0  ? stock -= 1 : OutOfStock              │
//! │                                                                         │
//! │  Check and mutation happen in one call, so stock never goes negative.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_name, validate_price, validate_stock};

/// A catalogue entry.
///
/// The `category` field holds the category's name, not the category itself.
/// Resolve it through [`crate::Store::category`] when the category is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Unique key within the inventory.
    pub name: String,

    /// Unit price. Always positive.
    pub price: Money,

    /// Units on the shelf. Never negative.
    pub stock: i64,

    /// Name of the category this item is filed under.
    pub category: String,
}

impl Item {
    /// Creates a validated item.
    ///
    /// Names are trimmed; price must be positive and stock non-negative.
    pub fn new(name: &str, price: Money, stock: i64, category: &str) -> CoreResult<Self> {
        let name = validate_name("item name", name)?;
        let category = validate_name("category name", category)?;
        validate_price(price)?;
        validate_stock(stock)?;

        Ok(Item {
            name,
            price,
            stock,
            category,
        })
    }

    /// Checks whether `quantity` units can be supplied right now.
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Adds `delta` (positive or negative) to stock.
    ///
    /// ## Returns
    /// The new stock level, or `InsufficientStock` if the result would be
    /// negative. Stock is left untouched on error.
    pub(crate) fn adjust_stock(&mut self, delta: i64) -> CoreResult<i64> {
        let new_stock = self.stock.checked_add(delta).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
        })?;

        if new_stock < 0 {
            return Err(CoreError::InsufficientStock {
                item: self.name.clone(),
                available: self.stock,
                requested: delta.saturating_neg(),
            });
        }

        self.stock = new_stock;
        Ok(new_stock)
    }

    /// Removes exactly one unit from stock.
    pub(crate) fn take_unit(&mut self) -> CoreResult<()> {
        if self.stock <= 0 {
            return Err(CoreError::OutOfStock(self.name.clone()));
        }

        self.stock -= 1;
        Ok(())
    }

    /// Replaces the price. No price history is kept.
    pub(crate) fn set_price(&mut self, new_price: Money) -> CoreResult<()> {
        validate_price(new_price)?;
        self.price = new_price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(stock: i64) -> Item {
        Item::new("Widget", Money::from_cents(999), stock, "Tools").unwrap()
    }

    #[test]
    fn test_new_trims_and_validates() {
        let item = Item::new("  Widget ", Money::from_cents(999), 5, " Tools").unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.category, "Tools");

        assert!(matches!(
            Item::new("Widget", Money::zero(), 5, "Tools"),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(Item::new("Widget", Money::from_cents(100), -1, "Tools").is_err());
        assert!(Item::new("", Money::from_cents(100), 1, "Tools").is_err());
        assert!(Item::new("Widget", Money::from_cents(100), 1, " ").is_err());
    }

    #[test]
    fn test_adjust_stock() {
        let mut item = widget(5);
        assert_eq!(item.adjust_stock(3).unwrap(), 8);
        assert_eq!(item.adjust_stock(-8).unwrap(), 0);

        let err = item.adjust_stock(-1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 0, requested: 1, .. }
        ));
        assert_eq!(item.stock, 0);
    }

    #[test]
    fn test_adjust_stock_overflow_is_rejected() {
        let mut item = widget(1);
        assert!(item.adjust_stock(i64::MAX).is_err());
        assert_eq!(item.stock, 1);
    }

    #[test]
    fn test_take_unit() {
        let mut item = widget(1);
        assert!(item.take_unit().is_ok());
        assert_eq!(item.stock, 0);
        assert!(matches!(item.take_unit(), Err(CoreError::OutOfStock(name)) if name == "Widget"));
        assert_eq!(item.stock, 0);
    }

    #[test]
    fn test_set_price() {
        let mut item = widget(1);
        item.set_price(Money::from_cents(1299)).unwrap();
        assert_eq!(item.price.cents(), 1299);

        assert!(item.set_price(Money::zero()).is_err());
        assert_eq!(item.price.cents(), 1299);
    }

    #[test]
    fn test_can_supply() {
        let item = widget(3);
        assert!(item.can_supply(3));
        assert!(!item.can_supply(4));
    }
}
