//! # retail-core: Pure Business Logic for the Retail Store
//!
//! This crate is the **heart** of the retail store. It owns the catalogue,
//! the member registry and transaction processing as plain values with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Retail Store Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Menu loops / UI (external collaborators)           │   │
//! │  │    Members ──► Items ──► Inventory view ──► Checkout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             retail-service (shared state, config, logs)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ retail-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │ inventory │  │  member   │  │transaction│  │   │
//! │  │   │   Store   │  │ Inventory │  │  Member   │  │Transaction│  │   │
//! │  │   │           │  │ Category  │  │ Purchase  │  │  Receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBALS • ONE MUTATION PATH (Store)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`item`] - Catalogue entries and their stock/price mutation
//! - [`category`] - Category sub-registries
//! - [`inventory`] - The global item registry
//! - [`member`] - Members and their purchase history
//! - [`transaction`] - Open transactions, receipts and shortages
//! - [`store`] - The store that owns every registry
//!
//! ## Design Principles
//!
//! 1. **One Mutation Path**: Inventory and categories only change through [`Store`]
//! 2. **No Globals**: The caller owns the `Store` and passes it where needed
//! 3. **Integer Money**: All monetary values are in cents (i64) so totals never drift
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use retail_core::{ItemSelection, Money, Store};
//!
//! let mut store = Store::new();
//! store.add_item("Widget", Money::from_cents(999), 1, "Tools").unwrap();
//! store.create_member("Ann").unwrap();
//!
//! let selections = [ItemSelection::new("Widget", 1), ItemSelection::new("Widget", 1)];
//! let transaction = store.build_transaction("Ann", &selections).unwrap();
//! let receipt = store.process(transaction).unwrap();
//!
//! assert_eq!(receipt.purchased.len(), 1);
//! assert_eq!(receipt.shortage_names(), vec!["Widget"]);
//! assert_eq!(receipt.total, Money::from_cents(999));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod error;
pub mod inventory;
pub mod item;
pub mod member;
pub mod money;
pub mod store;
pub mod transaction;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use retail_core::Money` instead of
// `use retail_core::money::Money`

pub use category::{Category, CategoryListing};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use item::Item;
pub use member::{Member, MemberId, PurchaseRecord};
pub use money::Money;
pub use store::{ItemSelection, Store, StoreLimits};
pub use transaction::{Receipt, Shortage, ShortageReason, Transaction, TransactionId, TransactionUnit};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum number of units in a single transaction.
///
/// ## Business Reason
/// Prevents runaway baskets. Overridden per deployment through
/// [`StoreLimits`].
pub const MAX_TRANSACTION_UNITS: usize = 100;

/// Highest accepted item price, in cents ($10,000,000.00).
///
/// Keeps any realistic transaction total far from `i64` overflow.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Default maximum quantity for a single item selection.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
