//! # Members
//!
//! A member is a customer identity with an ordered purchase history.
//!
//! ## Dual-Key Identity Pattern
//! Every member has:
//! - `id`: UUID v4 - immutable, held by open transactions
//! - `name`: business key - human-readable, changes on rename
//!
//! A transaction opened before a rename still reaches the right member,
//! because it refers to the id rather than the name.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::transaction::TransactionId;

/// Stable member identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MemberId(String);

impl MemberId {
    /// Generates a fresh UUID v4 identifier.
    pub fn generate() -> Self {
        MemberId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One purchased unit, frozen at the moment it was taken from stock.
///
/// Uses the snapshot pattern: the record keeps the name, category and unit
/// price it was bought under, so later re-pricing or removal of the item
/// does not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseRecord {
    pub item_name: String,
    pub category: String,
    pub unit_price: Money,
    pub transaction_id: TransactionId,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
}

/// A registered member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// One entry per unit purchased, oldest first.
    pub purchase_history: Vec<PurchaseRecord>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub(crate) fn new(name: String) -> Self {
        Member {
            id: MemberId::generate(),
            name,
            purchase_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Changes the name field only. The store updates its name index in the
    /// same call.
    pub(crate) fn rename(&mut self, new_name: String) {
        self.name = new_name;
    }

    /// Appends unconditionally. Callers must already have taken the unit
    /// from stock.
    pub(crate) fn record_purchase(&mut self, record: PurchaseRecord) {
        self.purchase_history.push(record);
    }

    /// Units bought per item name, in order of first purchase.
    pub fn purchase_summary(&self) -> Vec<(String, u64)> {
        let mut summary: Vec<(String, u64)> = Vec::new();
        for record in &self.purchase_history {
            match summary.iter_mut().find(|(name, _)| *name == record.item_name) {
                Some((_, count)) => *count += 1,
                None => summary.push((record.item_name.clone(), 1)),
            }
        }
        summary
    }

    /// Sum of unit prices over the whole history.
    pub fn lifetime_spend(&self) -> Money {
        self.purchase_history.iter().map(|r| r.unit_price).sum()
    }
}
