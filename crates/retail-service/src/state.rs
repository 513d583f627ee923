//! # Shared Store State
//!
//! The single [`Store`] a process works against, shared between callers.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several callers may read or modify the registries
//! 2. Only one caller may modify them at a time
//! 3. Checkout must build and process under one lock, so stock checked
//!    during the build cannot be taken by someone else in between
//!
//! ## Lock Scope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SharedStore Operations                               │
//! │                                                                         │
//! │  Caller                   Service Method          Lock Held For         │
//! │  ──────                   ──────────────          ─────────────         │
//! │                                                                         │
//! │  Look up item ───────────► search_item() ───────► clone of the Item    │
//! │                                                                         │
//! │  Restock ────────────────► adjust_stock() ──────► one stock change     │
//! │                                                                         │
//! │  Buy basket ─────────────► checkout() ──────────► build + process      │
//! │                                                                         │
//! │  NOTE: Results are cloned out before the lock is released; no          │
//! │        reference into the store outlives the closure.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use retail_core::{Store, StoreLimits};

/// Cloneable handle to the shared store.
///
/// ## Why Not RwLock?
/// Most service operations mutate, and every lock is held only for a
/// single registry operation.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    store: Arc<Mutex<Store>>,
}

impl SharedStore {
    /// Creates a shared, empty store with the given limits.
    pub fn new(limits: StoreLimits) -> Self {
        Self::from_store(Store::with_limits(limits))
    }

    /// Shares an existing store.
    pub fn from_store(store: Store) -> Self {
        SharedStore {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let item = shared.with_store(|store| store.search_item("Widget").cloned())?;
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.lock();
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shared.with_store_mut(|store| store.adjust_stock("Widget", 10).cloned())?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.lock();
        f(&mut store)
    }

    /// A panic while the lock was held poisons it. Every store mutation is
    /// a single checked step, so the registries are still usable and the
    /// guard is recovered instead of propagating the panic.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            tracing::warn!("Store mutex was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
