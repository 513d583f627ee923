//! # Store
//!
//! The store owns every registry: the inventory, the categories and the
//! members. It is the only sanctioned way to change any of them.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store Operations                               │
//! │                                                                         │
//! │  Members        create_member ─ rename_member ─ purchase_history        │
//! │                                                                         │
//! │  Catalogue      add_item ─────► Inventory + Category (one step)         │
//! │                 remove_item ──► Inventory + Category (one step)         │
//! │                 adjust_stock ─ set_price ─ search_item                  │
//! │                 list_categories ─ list_items_in_category                │
//! │                                                                         │
//! │  Checkout       build_transaction(member, [(item, qty)])                │
//! │                       │  validates qty and stock per selection          │
//! │                       ▼                                                 │
//! │                 Transaction (one unit per entry)                        │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                 process(tx) ──► stock -1 per unit + history entry       │
//! │                       │         or a Shortage for that unit             │
//! │                       ▼                                                 │
//! │                 Receipt { purchased, shortages, total }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Globals
//! A `Store` is an ordinary value. Whoever needs the registries holds a
//! reference to it; for shared use, wrap it in a mutex (see
//! `retail-service`).

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::{Category, CategoryListing};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::Inventory;
use crate::item::Item;
use crate::member::{Member, MemberId, PurchaseRecord};
use crate::money::Money;
use crate::transaction::{Receipt, Shortage, ShortageReason, Transaction};
use crate::validation::{validate_name, validate_quantity};
use crate::{MAX_ITEM_QUANTITY, MAX_TRANSACTION_UNITS};

// =============================================================================
// Limits
// =============================================================================

/// Per-deployment limits applied by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLimits {
    /// Largest quantity a single selection may request.
    pub max_item_quantity: i64,
    /// Largest number of units a single transaction may hold.
    pub max_transaction_units: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        StoreLimits {
            max_item_quantity: MAX_ITEM_QUANTITY,
            max_transaction_units: MAX_TRANSACTION_UNITS,
        }
    }
}

// =============================================================================
// Item Selection
// =============================================================================

/// A request for `quantity` units of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemSelection {
    pub item_name: String,
    pub quantity: i64,
}

impl ItemSelection {
    pub fn new(item_name: impl Into<String>, quantity: i64) -> Self {
        ItemSelection {
            item_name: item_name.into(),
            quantity,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Owner of the inventory, category and member registries.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inventory: Inventory,
    categories: BTreeMap<String, Category>,
    members: HashMap<MemberId, Member>,
    member_names: BTreeMap<String, MemberId>,
    limits: StoreLimits,
}

fn inconsistency(item: &str, detail: String) -> CoreError {
    CoreError::RegistryInconsistency {
        item: item.to_string(),
        detail,
    }
}

impl Store {
    /// Creates an empty store with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given limits.
    pub fn with_limits(limits: StoreLimits) -> Self {
        Store {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Registers a new member.
    ///
    /// ## Errors
    /// - `Validation(Required | TooLong)` for a bad name
    /// - `Validation(Duplicate)` if the name is already registered
    pub fn create_member(&mut self, name: &str) -> CoreResult<&Member> {
        let name = validate_name("member name", name)?;

        if self.member_names.contains_key(&name) {
            return Err(ValidationError::Duplicate {
                field: "member".to_string(),
                value: name,
            }
            .into());
        }

        let member = Member::new(name.clone());
        let id = member.id.clone();
        self.member_names.insert(name, id.clone());
        Ok(self.members.entry(id).or_insert(member))
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> CoreResult<&Member> {
        let key = name.trim();
        self.member_names
            .get(key)
            .and_then(|id| self.members.get(id))
            .ok_or_else(|| CoreError::MemberNotFound(key.to_string()))
    }

    /// All members in name order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.member_names
            .values()
            .filter_map(|id| self.members.get(id))
    }

    /// Renames a member. The name index and the member's own name change
    /// together; history and id are untouched.
    ///
    /// ## Errors
    /// - `MemberNotFound` if `old_name` is not registered
    /// - `Validation(Duplicate)` if `new_name` belongs to another member
    pub fn rename_member(&mut self, old_name: &str, new_name: &str) -> CoreResult<&Member> {
        let old_key = old_name.trim();
        let new_name = validate_name("member name", new_name)?;

        let id = self
            .member_names
            .get(old_key)
            .cloned()
            .ok_or_else(|| CoreError::MemberNotFound(old_key.to_string()))?;

        if new_name != old_key && self.member_names.contains_key(&new_name) {
            return Err(ValidationError::Duplicate {
                field: "member".to_string(),
                value: new_name,
            }
            .into());
        }

        let member = self
            .members
            .get_mut(&id)
            .ok_or_else(|| CoreError::MemberNotFound(old_key.to_string()))?;

        member.rename(new_name.clone());
        self.member_names.remove(old_key);
        self.member_names.insert(new_name, id);

        Ok(member)
    }

    /// A member's purchases, oldest first.
    pub fn purchase_history(&self, name: &str) -> CoreResult<&[PurchaseRecord]> {
        self.member(name).map(|m| m.purchase_history.as_slice())
    }

    /// Units bought per item for a member, in order of first purchase.
    pub fn purchase_summary(&self, name: &str) -> CoreResult<Vec<(String, u64)>> {
        self.member(name).map(Member::purchase_summary)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Returns the named category, creating it if it does not exist yet.
    pub fn create_or_get_category(&mut self, name: &str) -> CoreResult<&Category> {
        let name = validate_name("category name", name)?;
        Ok(self
            .categories
            .entry(name.clone())
            .or_insert_with(|| Category::new(name)))
    }

    pub fn category(&self, name: &str) -> CoreResult<&Category> {
        let key = name.trim();
        self.categories
            .get(key)
            .ok_or_else(|| CoreError::CategoryNotFound(key.to_string()))
    }

    /// All categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Every category with its items resolved.
    pub fn list_categories(&self) -> CoreResult<Vec<CategoryListing>> {
        self.categories
            .values()
            .map(|category| {
                let items = self
                    .list_items_in_category(&category.name)?
                    .into_iter()
                    .cloned()
                    .collect();
                Ok(CategoryListing {
                    name: category.name.clone(),
                    items,
                })
            })
            .collect()
    }

    /// Items filed under a category, in name order.
    pub fn list_items_in_category(&self, name: &str) -> CoreResult<Vec<&Item>> {
        let category = self.category(name)?;
        category
            .item_names()
            .map(|item_name| {
                self.inventory.search(item_name).ok_or_else(|| {
                    inconsistency(
                        item_name,
                        format!("listed in {} but not in inventory", category.name),
                    )
                })
            })
            .collect()
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds an item to its category and the inventory in one step.
    ///
    /// The category is created if needed. An existing item with the same
    /// name is overwritten (last write wins); if it was filed under another
    /// category it is moved out of that category.
    ///
    /// ## Errors
    /// - `InvalidAmount` for a non-positive price
    /// - `Validation` for a negative stock or a bad name
    pub fn add_item(
        &mut self,
        name: &str,
        price: Money,
        stock: i64,
        category: &str,
    ) -> CoreResult<&Item> {
        let item = Item::new(name, price, stock, category)?;

        if let Some(previous) = self.inventory.search(&item.name) {
            if previous.category != item.category {
                if let Some(old_category) = self.categories.get_mut(&previous.category) {
                    old_category.remove(&item.name);
                }
            }
        }

        self.categories
            .entry(item.category.clone())
            .or_insert_with(|| Category::new(item.category.clone()))
            .insert(&item.name);

        Ok(self.inventory.insert(item))
    }

    /// Removes an item from its category and the inventory in one step.
    ///
    /// ## Errors
    /// - `ItemNotFound` if absent; repeated calls keep returning it and
    ///   change nothing
    pub fn remove_item(&mut self, name: &str) -> CoreResult<Item> {
        let key = name.trim();

        let category_name = self
            .inventory
            .search(key)
            .map(|item| item.category.clone())
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;

        let category = self
            .categories
            .get_mut(&category_name)
            .filter(|c| c.contains(key))
            .ok_or_else(|| inconsistency(key, format!("missing from category {}", category_name)))?;

        category.remove(key);
        self.inventory
            .remove(key)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))
    }

    pub fn search_item(&self, name: &str) -> CoreResult<&Item> {
        let key = name.trim();
        self.inventory
            .search(key)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))
    }

    /// All items in name order.
    pub fn list_items(&self) -> impl Iterator<Item = &Item> {
        self.inventory.iter()
    }

    /// Read-only view of the inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Adds `delta` to an item's stock.
    ///
    /// ## Errors
    /// - `ItemNotFound`
    /// - `InsufficientStock` if stock would go below zero (stock unchanged)
    pub fn adjust_stock(&mut self, name: &str, delta: i64) -> CoreResult<&Item> {
        let key = name.trim();
        let item = self
            .inventory
            .search_mut(key)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;
        item.adjust_stock(delta)?;
        Ok(item)
    }

    /// Replaces an item's price.
    pub fn set_price(&mut self, name: &str, price: Money) -> CoreResult<&Item> {
        let key = name.trim();
        let item = self
            .inventory
            .search_mut(key)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;
        item.set_price(price)?;
        Ok(item)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Opens an empty transaction for a member.
    pub fn open_transaction(&self, member_name: &str) -> CoreResult<Transaction> {
        let member = self.member(member_name)?;
        Ok(Transaction::new(
            member.id.clone(),
            self.limits.max_transaction_units,
        ))
    }

    /// Builds a transaction from `(item, quantity)` selections.
    ///
    /// Each selection is checked on its own against current stock and
    /// expanded into one unit per quantity. Two selections of the same item
    /// may together ask for more than is on the shelf; the excess shows up
    /// as shortages when the transaction is processed.
    ///
    /// ## Errors
    /// - `MemberNotFound`
    /// - `Validation(MustBePositive)` / `QuantityTooLarge` for a bad quantity
    /// - `ItemNotFound`
    /// - `InsufficientStock` if a selection asks for more than current stock
    /// - `TransactionTooLarge` past `max_transaction_units`
    pub fn build_transaction(
        &self,
        member_name: &str,
        selections: &[ItemSelection],
    ) -> CoreResult<Transaction> {
        let mut transaction = self.open_transaction(member_name)?;

        for selection in selections {
            validate_quantity(selection.quantity, self.limits.max_item_quantity)?;
            let item = self.search_item(&selection.item_name)?;

            if !item.can_supply(selection.quantity) {
                return Err(CoreError::InsufficientStock {
                    item: item.name.clone(),
                    available: item.stock,
                    requested: selection.quantity,
                });
            }

            transaction.add_units(item, selection.quantity)?;
        }

        Ok(transaction)
    }

    /// Processes a transaction, consuming it.
    ///
    /// Units are handled in order. A unit whose item still exists with
    /// stock above zero takes one from stock and appends a purchase record
    /// to the member's history. Any other unit becomes a shortage, and
    /// processing carries on with the next unit.
    ///
    /// ## Errors
    /// - `MemberIdNotFound` if the transaction's member id is unknown to
    ///   this store
    pub fn process(&mut self, transaction: Transaction) -> CoreResult<Receipt> {
        let (transaction_id, member_id, units, requested_total) = transaction.into_parts();

        let member = self
            .members
            .get_mut(&member_id)
            .ok_or_else(|| CoreError::MemberIdNotFound(member_id.to_string()))?;

        let processed_at = Utc::now();
        let mut purchased = Vec::new();
        let mut shortages = Vec::new();

        for unit in units {
            let Some(item) = self.inventory.search_mut(&unit.item_name) else {
                shortages.push(Shortage {
                    item_name: unit.item_name,
                    reason: ShortageReason::Discontinued,
                });
                continue;
            };

            match item.take_unit() {
                Ok(()) => {
                    let record = PurchaseRecord {
                        item_name: unit.item_name,
                        category: item.category.clone(),
                        unit_price: unit.unit_price,
                        transaction_id: transaction_id.clone(),
                        purchased_at: processed_at,
                    };
                    member.record_purchase(record.clone());
                    purchased.push(record);
                }
                Err(_) => shortages.push(Shortage {
                    item_name: unit.item_name,
                    reason: ShortageReason::OutOfStock,
                }),
            }
        }

        // Purchased units are a subset of the transaction's units, whose
        // total was overflow-checked as they were added.
        let total = purchased.iter().map(|r: &PurchaseRecord| r.unit_price).sum();

        Ok(Receipt {
            transaction_id,
            member_name: member.name.clone(),
            member_id,
            purchased,
            shortages,
            total,
            requested_total,
            processed_at,
        })
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Verifies that the inventory and category views agree.
    ///
    /// ## Errors
    /// `RegistryInconsistency` describing the first disagreement found.
    pub fn check_consistency(&self) -> CoreResult<()> {
        for item in self.inventory.iter() {
            match self.categories.get(&item.category) {
                Some(category) if category.contains(&item.name) => {}
                Some(_) => {
                    return Err(inconsistency(
                        &item.name,
                        format!("missing from category {}", item.category),
                    ))
                }
                None => {
                    return Err(inconsistency(
                        &item.name,
                        format!("category {} does not exist", item.category),
                    ))
                }
            }
        }

        for category in self.categories.values() {
            for item_name in category.item_names() {
                match self.inventory.search(item_name) {
                    Some(item) if item.category == category.name => {}
                    Some(item) => {
                        return Err(inconsistency(
                            item_name,
                            format!(
                                "listed in {} but filed under {}",
                                category.name, item.category
                            ),
                        ))
                    }
                    None => {
                        return Err(inconsistency(
                            item_name,
                            format!("listed in {} but not in inventory", category.name),
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
