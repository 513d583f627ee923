//! # Transactions
//!
//! A transaction is a bundle of item units one member intends to buy.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transaction Lifecycle                                │
//! │                                                                         │
//! │  ┌──────────────┐   Store::process(tx)   ┌──────────────┐              │
//! │  │    Open      │───────────────────────►│  Processed   │              │
//! │  │ (Transaction)│   consumes the value   │  (Receipt)   │              │
//! │  └──────────────┘                        └──────────────┘              │
//! │     │      ▲                                                            │
//! │  add_item  remove_item                    immutable: stock taken,      │
//! │  add_units (total ± unit_price)           history recorded,            │
//! │                                           shortages listed             │
//! │                                                                         │
//! │  `process` takes the transaction by value, so a transaction can never  │
//! │  be processed twice.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Unit Per Entry
//! Buying three widgets means three entries referring to "Widget". The
//! unit price is frozen when the unit is added, the same way a till locks in
//! the shelf price once an item is scanned.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::item::Item;
use crate::member::{MemberId, PurchaseRecord};
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Transaction identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        TransactionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Open Transaction
// =============================================================================

/// One unit of one item, with its price frozen at the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionUnit {
    pub item_name: String,
    pub unit_price: Money,
}

/// An open transaction.
///
/// ## Invariants
/// - `total == sum(unit_price over units)` after every add/remove
/// - `units.len() <= max_units`
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct Transaction {
    id: TransactionId,
    member_id: MemberId,
    units: Vec<TransactionUnit>,
    total: Money,
    #[serde(skip)]
    #[ts(skip)]
    max_units: usize,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Opens an empty transaction. Use [`crate::Store::open_transaction`]
    /// so the member is checked first.
    pub(crate) fn new(member_id: MemberId, max_units: usize) -> Self {
        Transaction {
            id: TransactionId::generate(),
            member_id,
            units: Vec::new(),
            total: Money::zero(),
            max_units,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn units(&self) -> &[TransactionUnit] {
        &self.units
    }

    /// Running total, maintained incrementally.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Adds one unit of `item` at its current price.
    pub fn add_item(&mut self, item: &Item) -> CoreResult<()> {
        self.add_units(item, 1)
    }

    /// Adds `quantity` units of `item` at its current price.
    ///
    /// Stock is not checked here; shortages are detected at processing.
    /// Either every unit is added or none is; a total that would overflow
    /// is `AmountOverflow`.
    pub fn add_units(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let max = self.max_units;
        let count = usize::try_from(quantity).map_err(|_| CoreError::TransactionTooLarge { max })?;
        if self.units.len().saturating_add(count) > max {
            return Err(CoreError::TransactionTooLarge { max });
        }

        let mut total = self.total;
        for _ in 0..count {
            total = total
                .checked_add(item.price)
                .ok_or(CoreError::AmountOverflow)?;
        }

        for _ in 0..count {
            self.units.push(TransactionUnit {
                item_name: item.name.clone(),
                unit_price: item.price,
            });
        }
        self.total = total;

        Ok(())
    }

    /// Removes the first unit of `item_name`.
    ///
    /// ## Returns
    /// `true` if a unit was removed, `false` if none was present.
    pub fn remove_item(&mut self, item_name: &str) -> bool {
        match self.units.iter().position(|u| u.item_name == item_name) {
            Some(index) => {
                let unit = self.units.remove(index);
                self.total -= unit.unit_price;
                true
            }
            None => false,
        }
    }

    /// Sums the unit list from scratch.
    pub fn recomputed_total(&self) -> Money {
        self.units.iter().map(|u| u.unit_price).sum()
    }

    /// Checks the running total against a fresh sum.
    pub fn is_balanced(&self) -> bool {
        self.total == self.recomputed_total()
    }

    /// Resets the running total to the recomputed sum.
    ///
    /// ## Returns
    /// `true` if the running total had to be corrected.
    pub fn reconcile(&mut self) -> bool {
        let recomputed = self.recomputed_total();
        let drifted = self.total != recomputed;
        self.total = recomputed;
        drifted
    }

    pub(crate) fn into_parts(self) -> (TransactionId, MemberId, Vec<TransactionUnit>, Money) {
        (self.id, self.member_id, self.units, self.total)
    }
}

// =============================================================================
// Processed Transaction
// =============================================================================

/// Why a unit could not be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShortageReason {
    /// Stock was zero when processing reached the unit.
    OutOfStock,
    /// The item was removed from the inventory after the unit was added.
    Discontinued,
}

impl fmt::Display for ShortageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortageReason::OutOfStock => f.write_str("out of stock"),
            ShortageReason::Discontinued => f.write_str("discontinued"),
        }
    }
}

/// A unit that could not be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Shortage {
    pub item_name: String,
    pub reason: ShortageReason,
}

/// The outcome of processing a transaction. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub member_id: MemberId,
    /// Member name at processing time.
    pub member_name: String,
    /// One record per unit taken from stock, in transaction order.
    pub purchased: Vec<PurchaseRecord>,
    /// One entry per unit that could not be supplied, in transaction order.
    pub shortages: Vec<Shortage>,
    /// Sum over purchased units. This is what the member owes.
    pub total: Money,
    /// The transaction total before processing (purchased + short units).
    pub requested_total: Money,
    #[ts(as = "String")]
    pub processed_at: DateTime<Utc>,
}

impl Receipt {
    pub fn purchased_names(&self) -> Vec<&str> {
        self.purchased.iter().map(|r| r.item_name.as_str()).collect()
    }

    pub fn shortage_names(&self) -> Vec<&str> {
        self.shortages.iter().map(|s| s.item_name.as_str()).collect()
    }

    /// True when every unit was supplied.
    pub fn is_complete(&self) -> bool {
        self.shortages.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str, cents: i64) -> Item {
        Item::new(name, Money::from_cents(cents), 10, "Misc").unwrap()
    }

    fn open(max_units: usize) -> Transaction {
        Transaction::new(MemberId::generate(), max_units)
    }

    #[test]
    fn test_total_tracks_add_and_remove() {
        let mut tx = open(100);
        let small = item("Small", 250);
        let large = item("Large", 375);

        tx.add_item(&small).unwrap();
        tx.add_item(&large).unwrap();
        assert_eq!(tx.total(), Money::from_cents(625));

        assert!(tx.remove_item("Small"));
        assert_eq!(tx.total(), Money::from_cents(375));
        assert!(tx.is_balanced());
    }

    #[test]
    fn test_remove_missing_unit_leaves_total_alone() {
        let mut tx = open(100);
        tx.add_item(&item("Small", 250)).unwrap();
        assert!(!tx.remove_item("Large"));
        assert_eq!(tx.total(), Money::from_cents(250));
        assert_eq!(tx.len(), 1);
    }

    #[test]
    fn test_remove_takes_first_unit_only() {
        let mut tx = open(100);
        let widget = item("Widget", 100);
        tx.add_units(&widget, 3).unwrap();
        assert!(tx.remove_item("Widget"));
        assert_eq!(tx.len(), 2);
        assert_eq!(tx.total(), Money::from_cents(200));
    }

    #[test]
    fn test_unit_price_is_frozen_when_added() {
        let mut tx = open(100);
        let mut widget = item("Widget", 100);
        tx.add_item(&widget).unwrap();

        widget.set_price(Money::from_cents(500)).unwrap();
        tx.add_item(&widget).unwrap();

        assert_eq!(tx.total(), Money::from_cents(600));
        assert!(tx.remove_item("Widget"));
        assert_eq!(tx.total(), Money::from_cents(500));
        assert!(tx.is_balanced());
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let mut tx = open(100);
        // Bypasses Item::new, which caps prices well below this
        let huge = Item {
            name: "Yacht".to_string(),
            price: Money::from_cents(i64::MAX / 2 + 1),
            stock: 5,
            category: "Boats".to_string(),
        };

        let err = tx.add_units(&huge, 2).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
        assert!(tx.is_empty());
        assert!(tx.total().is_zero());

        tx.add_item(&huge).unwrap();
        assert!(matches!(tx.add_item(&huge), Err(CoreError::AmountOverflow)));
        assert_eq!(tx.len(), 1);
        assert!(tx.is_balanced());
    }

    #[test]
    fn test_add_units_respects_capacity() {
        let mut tx = open(3);
        let widget = item("Widget", 100);
        tx.add_units(&widget, 2).unwrap();

        let err = tx.add_units(&widget, 2).unwrap_err();
        assert!(matches!(err, CoreError::TransactionTooLarge { max: 3 }));
        assert_eq!(tx.len(), 2);

        tx.add_item(&widget).unwrap();
        assert!(tx.add_item(&widget).is_err());
    }

    #[test]
    fn test_add_units_rejects_non_positive_quantity() {
        let mut tx = open(10);
        assert!(tx.add_units(&item("Widget", 100), 0).is_err());
        assert!(tx.add_units(&item("Widget", 100), -2).is_err());
        assert!(tx.is_empty());
    }

    #[test]
    fn test_reconcile_reports_drift() {
        let mut tx = open(10);
        tx.add_item(&item("Widget", 100)).unwrap();
        assert!(!tx.reconcile());

        tx.total = Money::from_cents(1);
        assert!(!tx.is_balanced());
        assert!(tx.reconcile());
        assert_eq!(tx.total(), Money::from_cents(100));
    }

    #[test]
    fn test_serialized_transaction_hides_capacity() {
        let mut tx = open(10);
        tx.add_item(&item("Widget", 100)).unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("max_units").is_none());
        assert_eq!(json["units"][0]["item_name"], "Widget");
        assert_eq!(json["total"], 100);
    }

    #[test]
    fn test_shortage_reason_serializes_snake_case() {
        let json = serde_json::to_string(&ShortageReason::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
    }

    #[test]
    fn test_shortage_reason_display() {
        assert_eq!(ShortageReason::OutOfStock.to_string(), "out of stock");
        assert_eq!(ShortageReason::Discontinued.to_string(), "discontinued");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any sequence of adds and removes, the running total
        /// equals the sum over the remaining units.
        #[test]
        fn running_total_matches_recomputed_sum(
            ops in prop::collection::vec((any::<bool>(), 0usize..4, 1i64..100_000i64), 0..200)
        ) {
            let names = ["A", "B", "C", "D"];
            let mut tx = open(usize::MAX);

            for (is_add, which, cents) in ops {
                let name = names[which];
                if is_add {
                    tx.add_item(&item(name, cents)).unwrap();
                } else {
                    tx.remove_item(name);
                }
                prop_assert_eq!(tx.total(), tx.recomputed_total());
            }

            prop_assert!(!tx.reconcile());
        }
    }
}
