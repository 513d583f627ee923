//! # Categories
//!
//! A category is a named sub-registry of the inventory. It records which
//! item keys are filed under it; the items themselves live in
//! [`crate::Inventory`]. Only [`crate::Store`] adds or removes keys, always
//! together with the matching inventory change.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::Item;

/// A flat, named grouping of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category key.
    pub name: String,
    items: BTreeSet<String>,
}

impl Category {
    pub(crate) fn new(name: String) -> Self {
        Category {
            name,
            items: BTreeSet::new(),
        }
    }

    /// Item keys filed under this category, in name order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn contains(&self, item_name: &str) -> bool {
        self.items.contains(item_name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts an item key. Re-inserting an existing key is a no-op.
    pub(crate) fn insert(&mut self, item_name: &str) {
        self.items.insert(item_name.to_string());
    }

    /// Removes an item key. Removing a missing key is a no-op.
    pub(crate) fn remove(&mut self, item_name: &str) -> bool {
        self.items.remove(item_name)
    }
}

/// A category with its items resolved, as handed to a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryListing {
    pub name: String,
    pub items: Vec<Item>,
}
