//! # Retail Service
//!
//! The entry point callers use: every store operation, with owned results,
//! structured logging and [`ServiceError`] codes.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Lifecycle                                   │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Member  │────►│  Open    │────►│ Process  │────►│ Receipt  │       │
//! │  │ selected │     │   Tx     │     │ (1 unit  │     │ purchased│       │
//! │  └──────────┘     └──────────┘     │ at a time)│    │ shortages│       │
//! │                        │           └──────────┘     └──────────┘       │
//! │                  build_transaction      │                               │
//! │                  (validate each         │                               │
//! │                   selection)       stock -1 / history +1               │
//! │                                    or Shortage                          │
//! │                                                                         │
//! │  checkout() = build_transaction + process under one lock               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use retail_core::{
    Category, CategoryListing, ItemSelection, Item, Member, Money, PurchaseRecord, Receipt,
    Transaction,
};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceResult;
use crate::state::SharedStore;

/// Cloneable service handle over one shared store.
#[derive(Debug, Clone)]
pub struct RetailService {
    store: SharedStore,
    config: Arc<ServiceConfig>,
}

impl Default for RetailService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl RetailService {
    /// Creates a service with an empty store using the configured limits.
    pub fn new(config: ServiceConfig) -> Self {
        let store = SharedStore::new(config.to_limits());
        RetailService {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn create_member(&self, name: &str) -> ServiceResult<Member> {
        let member = self
            .store
            .with_store_mut(|s| s.create_member(name).cloned())
            .inspect_err(|e| warn!(name = %name, error = %e, "Member not created"))?;

        info!(member_id = %member.id, name = %member.name, "Member created");
        Ok(member)
    }

    pub fn member(&self, name: &str) -> ServiceResult<Member> {
        debug!(name = %name, "member lookup");
        Ok(self.store.with_store(|s| s.member(name).cloned())?)
    }

    /// Renames a member. History and open transactions follow the member.
    pub fn rename_member(&self, old_name: &str, new_name: &str) -> ServiceResult<Member> {
        let member = self
            .store
            .with_store_mut(|s| s.rename_member(old_name, new_name).cloned())
            .inspect_err(|e| {
                warn!(old_name = %old_name, new_name = %new_name, error = %e, "Rename rejected")
            })?;

        info!(member_id = %member.id, old_name = %old_name, new_name = %member.name, "Member renamed");
        Ok(member)
    }

    pub fn purchase_history(&self, name: &str) -> ServiceResult<Vec<PurchaseRecord>> {
        debug!(name = %name, "purchase_history lookup");
        Ok(self
            .store
            .with_store(|s| s.purchase_history(name).map(<[PurchaseRecord]>::to_vec))?)
    }

    pub fn purchase_summary(&self, name: &str) -> ServiceResult<Vec<(String, u64)>> {
        debug!(name = %name, "purchase_summary lookup");
        Ok(self.store.with_store(|s| s.purchase_summary(name))?)
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    pub fn create_or_get_category(&self, name: &str) -> ServiceResult<Category> {
        let category = self
            .store
            .with_store_mut(|s| s.create_or_get_category(name).cloned())?;
        info!(category = %category.name, items = category.len(), "Category ready");
        Ok(category)
    }

    /// Adds or overwrites an item, filing it under `category`.
    pub fn add_item(
        &self,
        name: &str,
        price: Money,
        stock: i64,
        category: &str,
    ) -> ServiceResult<Item> {
        let item = self
            .store
            .with_store_mut(|s| s.add_item(name, price, stock, category).cloned())
            .inspect_err(|e| warn!(item = %name, error = %e, "Item not added"))?;

        info!(
            item = %item.name,
            category = %item.category,
            price_cents = item.price.cents(),
            stock = item.stock,
            "Item added"
        );
        Ok(item)
    }

    pub fn remove_item(&self, name: &str) -> ServiceResult<Item> {
        let item = self
            .store
            .with_store_mut(|s| s.remove_item(name))
            .inspect_err(|e| warn!(item = %name, error = %e, "Item not removed"))?;

        info!(item = %item.name, category = %item.category, "Item removed");
        Ok(item)
    }

    pub fn search_item(&self, name: &str) -> ServiceResult<Item> {
        debug!(item = %name, "search_item");
        Ok(self.store.with_store(|s| s.search_item(name).cloned())?)
    }

    pub fn list_items(&self) -> Vec<Item> {
        self.store
            .with_store(|s| s.list_items().cloned().collect())
    }

    pub fn list_items_in_category(&self, name: &str) -> ServiceResult<Vec<Item>> {
        debug!(category = %name, "list_items_in_category");
        Ok(self.store.with_store(|s| {
            s.list_items_in_category(name)
                .map(|items| items.into_iter().cloned().collect())
        })?)
    }

    pub fn list_categories(&self) -> ServiceResult<Vec<CategoryListing>> {
        Ok(self.store.with_store(|s| s.list_categories())?)
    }

    /// Restocks (positive `delta`) or writes off (negative `delta`).
    pub fn adjust_stock(&self, name: &str, delta: i64) -> ServiceResult<Item> {
        let item = self
            .store
            .with_store_mut(|s| s.adjust_stock(name, delta).cloned())
            .inspect_err(|e| warn!(item = %name, delta, error = %e, "Stock adjustment rejected"))?;

        info!(item = %item.name, delta, stock = item.stock, "Stock adjusted");
        Ok(item)
    }

    pub fn set_price(&self, name: &str, price: Money) -> ServiceResult<Item> {
        let item = self
            .store
            .with_store_mut(|s| s.set_price(name, price).cloned())
            .inspect_err(|e| warn!(item = %name, error = %e, "Price change rejected"))?;

        info!(item = %item.name, price_cents = item.price.cents(), "Price changed");
        Ok(item)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub fn open_transaction(&self, member_name: &str) -> ServiceResult<Transaction> {
        let transaction = self
            .store
            .with_store(|s| s.open_transaction(member_name))?;
        debug!(transaction_id = %transaction.id(), member = %member_name, "Transaction opened");
        Ok(transaction)
    }

    pub fn build_transaction(
        &self,
        member_name: &str,
        selections: &[ItemSelection],
    ) -> ServiceResult<Transaction> {
        let transaction = self
            .store
            .with_store(|s| s.build_transaction(member_name, selections))
            .inspect_err(|e| {
                warn!(member = %member_name, error = %e, "Transaction rejected")
            })?;

        debug!(
            transaction_id = %transaction.id(),
            member = %member_name,
            units = transaction.len(),
            total_cents = transaction.total().cents(),
            "Transaction built"
        );
        Ok(transaction)
    }

    /// Processes a transaction built earlier. Stock may have moved since;
    /// the receipt reports whatever could not be supplied.
    pub fn process(&self, transaction: Transaction) -> ServiceResult<Receipt> {
        let receipt = self.store.with_store_mut(|s| s.process(transaction))?;
        log_receipt(&receipt);
        Ok(receipt)
    }

    /// Builds and processes in one step under a single lock.
    pub fn checkout(
        &self,
        member_name: &str,
        selections: &[ItemSelection],
    ) -> ServiceResult<Receipt> {
        let receipt = self
            .store
            .with_store_mut(|s| {
                let transaction = s.build_transaction(member_name, selections)?;
                s.process(transaction)
            })
            .inspect_err(|e| warn!(member = %member_name, error = %e, "Checkout rejected"))?;

        log_receipt(&receipt);
        Ok(receipt)
    }

    pub fn check_consistency(&self) -> ServiceResult<()> {
        Ok(self.store.with_store(|s| s.check_consistency())?)
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Plain-text receipt using the configured store name and currency.
    pub fn render_receipt(&self, receipt: &Receipt) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.config.store.name);
        let _ = writeln!(out, "Member: {}", receipt.member_name);
        let _ = writeln!(out, "Transaction: {}", receipt.transaction_id);

        for record in &receipt.purchased {
            let _ = writeln!(
                out,
                "  {:<24} {:>10}",
                record.item_name,
                self.config.format_currency(record.unit_price)
            );
        }

        for shortage in &receipt.shortages {
            let _ = writeln!(
                out,
                "  {:<24} {:>10}",
                shortage.item_name,
                shortage.reason.to_string()
            );
        }

        let _ = writeln!(
            out,
            "Total: {}",
            self.config.format_currency(receipt.total)
        );
        out
    }
}

fn log_receipt(receipt: &Receipt) {
    for shortage in &receipt.shortages {
        warn!(
            transaction_id = %receipt.transaction_id,
            item = %shortage.item_name,
            reason = ?shortage.reason,
            "Unit not supplied"
        );
    }

    info!(
        transaction_id = %receipt.transaction_id,
        member = %receipt.member_name,
        purchased = receipt.purchased.len(),
        shortages = receipt.shortages.len(),
        total_cents = receipt.total.cents(),
        "Transaction processed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitSettings;
    use crate::error::ErrorCode;
    use retail_core::ShortageReason;
    use std::thread;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn seeded() -> RetailService {
        let service = RetailService::default();
        service.add_item("Widget", cents(999), 1, "Tools").unwrap();
        service.add_item("Hammer", cents(1500), 4, "Tools").unwrap();
        service.create_member("Ann").unwrap();
        service
    }

    #[test]
    fn test_checkout_reports_shortage() {
        let service = seeded();
        let receipt = service
            .checkout(
                "Ann",
                &[ItemSelection::new("Widget", 1), ItemSelection::new("Widget", 1)],
            )
            .unwrap();

        assert_eq!(receipt.purchased_names(), vec!["Widget"]);
        assert_eq!(receipt.shortages[0].reason, ShortageReason::OutOfStock);
        assert_eq!(service.search_item("Widget").unwrap().stock, 0);
        assert_eq!(service.purchase_history("Ann").unwrap().len(), 1);
    }

    #[test]
    fn test_errors_carry_codes() {
        let service = seeded();

        let err = service.search_item("Gadget").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = service.create_member("Ann").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = service
            .checkout("Ann", &[ItemSelection::new("Hammer", 5)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = service.add_item("Free", Money::zero(), 1, "Tools").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let yacht: Money = "50000000000000000.00".parse().unwrap();
        let err = service.add_item("Yacht", yacht, 5, "Boats").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        // The rejection left the shared store usable
        assert_eq!(service.search_item("Widget").unwrap().stock, 1);
    }

    #[test]
    fn test_configured_limits_apply() {
        let mut config = ServiceConfig::default();
        config.limits = LimitSettings {
            max_item_quantity: 2,
            max_transaction_units: 3,
        };
        let service = RetailService::new(config);
        service.add_item("Widget", cents(100), 10, "Tools").unwrap();
        service.create_member("Ann").unwrap();

        let err = service
            .checkout("Ann", &[ItemSelection::new("Widget", 3)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = service
            .checkout(
                "Ann",
                &[ItemSelection::new("Widget", 2), ItemSelection::new("Widget", 2)],
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TransactionError);

        // Nothing was taken by the rejected attempts
        assert_eq!(service.search_item("Widget").unwrap().stock, 10);
    }

    #[test]
    fn test_owned_results_are_snapshots() {
        let service = seeded();
        let before = service.search_item("Hammer").unwrap();
        service.adjust_stock("Hammer", 6).unwrap();
        assert_eq!(before.stock, 4);
        assert_eq!(service.search_item("Hammer").unwrap().stock, 10);
    }

    #[test]
    fn test_catalogue_round() {
        let service = seeded();
        service.create_or_get_category("Drinks").unwrap();
        service.add_item("Cola", cents(125), 24, "Drinks").unwrap();

        let names: Vec<String> = service
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Drinks", "Tools"]);
        assert_eq!(service.list_items_in_category("Tools").unwrap().len(), 2);
        assert_eq!(service.list_items().len(), 3);

        service.remove_item("Cola").unwrap();
        assert!(service.list_items_in_category("Drinks").unwrap().is_empty());
        assert_eq!(
            service.remove_item("Cola").unwrap_err().code,
            ErrorCode::NotFound
        );
        service.check_consistency().unwrap();
    }

    #[test]
    fn test_rename_and_summary() {
        let service = seeded();
        service
            .checkout("Ann", &[ItemSelection::new("Hammer", 2)])
            .unwrap();
        service.rename_member("Ann", "Anna").unwrap();

        assert_eq!(
            service.purchase_history("Ann").unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            service.purchase_summary("Anna").unwrap(),
            vec![("Hammer".to_string(), 2)]
        );
        assert_eq!(service.member("Anna").unwrap().lifetime_spend(), cents(3000));
    }

    #[test]
    fn test_process_after_price_change_uses_snapshot() {
        let service = seeded();
        let tx = service
            .build_transaction("Ann", &[ItemSelection::new("Hammer", 1)])
            .unwrap();
        service.set_price("Hammer", cents(2000)).unwrap();

        let receipt = service.process(tx).unwrap();
        assert_eq!(receipt.total, cents(1500));
    }

    #[test]
    fn test_concurrent_checkouts_never_oversell() {
        let service = RetailService::default();
        service.add_item("Widget", cents(100), 10, "Tools").unwrap();
        for i in 0..4 {
            service.create_member(&format!("Member {}", i)).unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = service.clone();
                thread::spawn(move || {
                    let mut bought = 0;
                    for _ in 0..5 {
                        if let Ok(receipt) = service
                            .checkout(&format!("Member {}", i), &[ItemSelection::new("Widget", 1)])
                        {
                            bought += receipt.purchased.len();
                        }
                    }
                    bought
                })
            })
            .collect();

        let sold: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(sold, 10);
        assert_eq!(service.search_item("Widget").unwrap().stock, 0);
    }

    #[test]
    fn test_render_receipt() {
        let service = seeded();
        let receipt = service
            .checkout(
                "Ann",
                &[ItemSelection::new("Widget", 1), ItemSelection::new("Widget", 1)],
            )
            .unwrap();

        let text = service.render_receipt(&receipt);
        assert!(text.starts_with("Retail Store"));
        assert!(text.contains("$9.99"));
        assert!(text.contains("out of stock"));
        assert!(!text.contains("OutOfStock"));
        assert!(text.contains("Total: $9.99"));
    }
}
