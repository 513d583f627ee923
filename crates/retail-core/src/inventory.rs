//! # Inventory
//!
//! The global registry of items across all categories, and the single owner
//! of every [`Item`].
//!
//! ## Two Views, One Owner
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory vs. Category views                        │
//! │                                                                         │
//! │   Inventory.items                    Category "Tools".items             │
//! │   ┌─────────────────────────┐        ┌───────────────────┐             │
//! │   │ "Hammer" → Item{..}     │◄───────│ "Hammer"          │             │
//! │   │ "Widget" → Item{..}     │◄───────│ "Widget"          │             │
//! │   │ "Cola"   → Item{..}     │◄──┐    └───────────────────┘             │
//! │   └─────────────────────────┘   │    Category "Drinks".items            │
//! │                                 │    ┌───────────────────┐             │
//! │                                 └────│ "Cola"            │             │
//! │                                      └───────────────────┘             │
//! │                                                                         │
//! │   Invariant: keys(Inventory) == ⋃ keys(Category)                        │
//! │   Maintained by Store::add_item / Store::remove_item only.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::item::Item;

/// Item registry keyed by item name.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: BTreeMap<String, Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an item by name.
    pub fn search(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// All items in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All item keys in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn search_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.get_mut(name)
    }

    /// Inserts or overwrites by key (last write wins).
    pub(crate) fn insert(&mut self, item: Item) -> &Item {
        match self.items.entry(item.name.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(item);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(item),
        }
    }

    /// Removes by key. A missing key is a no-op and returns `None`.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Item> {
        self.items.remove(name)
    }
}
