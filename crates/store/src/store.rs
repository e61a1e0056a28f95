//! The persistent store: snapshot reads, whole-blob writes, change events.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use souqpos_catalog::Product;
use souqpos_core::{DomainError, ProductId};
use souqpos_events::{EventBus, InMemoryEventBus, Subscription};
use souqpos_sales::{Sale, SaleItem};

use crate::backend::{StorageBackend, StorageError};
use crate::event::StoreEvent;
use crate::seed;

const PRODUCTS_KEY: &str = "sm_products";
const SALES_KEY: &str = "sm_sales";

/// Store-level failure: either a domain rule rejected the input or the
/// backend failed to read/write a blob.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the product and sales collections.
///
/// All reads return snapshots; callers never hold a live reference into the
/// store. Mutations read the current collection, apply the change and write
/// the whole blob back in one `set` call, then publish a [`StoreEvent`].
pub struct Store {
    backend: Arc<dyn StorageBackend>,
    bus: InMemoryEventBus<StoreEvent>,
    /// Demo sales served when the persisted blob is missing or unparseable.
    /// Generated lazily but exactly once per store instance: the dataset is
    /// anchored to "now", so regenerating it per read would hand out snapshots
    /// with drifting timestamps.
    fallback_sales: OnceLock<Vec<Sale>>,
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            bus: InMemoryEventBus::new(),
            fallback_sales: OnceLock::new(),
        }
    }

    /// Store over a fresh in-memory backend (tests, demos).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::backend::InMemoryBackend::new()))
    }

    /// Subscribe to change notifications.
    ///
    /// One event is delivered per successful mutation; rejected mutations
    /// publish nothing.
    pub fn subscribe(&self) -> Subscription<StoreEvent> {
        self.bus.subscribe()
    }

    /// Snapshot of the product catalog, seeding on first use.
    pub fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.ensure_seed()?;
        Ok(self.read_or(PRODUCTS_KEY, seed::products)?)
    }

    /// Snapshot of the sales history (newest first), seeding on first use.
    pub fn list_sales(&self) -> Result<Vec<Sale>, StoreError> {
        self.ensure_seed()?;
        Ok(self.read_or(SALES_KEY, || self.seed_sales())?)
    }

    /// Validate, mint an id, append and persist a new product.
    pub fn add_product(
        &self,
        name: &str,
        price: f64,
        unit: &str,
    ) -> Result<Product, StoreError> {
        let product = Product::new(name, price, unit)?;

        let mut products = self.read_or(PRODUCTS_KEY, seed::products)?;
        products.push(product.clone());
        self.write(PRODUCTS_KEY, &products)?;

        tracing::debug!(product_id = %product.id, "product added");
        self.notify(StoreEvent::ProductAdded {
            product_id: product.id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(product)
    }

    /// Replace the price of the matching product.
    ///
    /// A missing id is a successful no-op: nothing is written and no event is
    /// published.
    pub fn update_product_price(&self, id: &ProductId, price: f64) -> Result<(), StoreError> {
        let mut products = self.read_or(PRODUCTS_KEY, seed::products)?;
        let Some(product) = products.iter_mut().find(|p| &p.id == id) else {
            return Ok(());
        };
        product.set_price(price)?;
        self.write(PRODUCTS_KEY, &products)?;

        tracing::debug!(product_id = %id, price, "product price updated");
        self.notify(StoreEvent::ProductPriceUpdated {
            product_id: id.clone(),
            price,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    /// Remove the matching product.
    ///
    /// A missing id is a successful no-op. Historical sales are never touched:
    /// their line items keep the denormalized snapshot of the product.
    pub fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        let mut products = self.read_or(PRODUCTS_KEY, seed::products)?;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Ok(());
        }
        self.write(PRODUCTS_KEY, &products)?;

        tracing::debug!(product_id = %id, "product deleted");
        self.notify(StoreEvent::ProductDeleted {
            product_id: id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    /// Commit a cart as an immutable sale, prepended to the history.
    ///
    /// The whole sales collection is written in a single `set`, so no partial
    /// state is ever observable in-process.
    pub fn complete_sale(&self, items: Vec<SaleItem>) -> Result<Sale, StoreError> {
        let sale = Sale::commit(items, Utc::now())?;

        let mut sales = self.read_or(SALES_KEY, || self.seed_sales())?;
        sales.insert(0, sale.clone());
        self.write(SALES_KEY, &sales)?;

        tracing::debug!(sale_id = %sale.id, total = sale.total, "sale completed");
        self.notify(StoreEvent::SaleCompleted {
            sale_id: sale.id.clone(),
            total: sale.total,
            occurred_at: sale.date,
        });
        Ok(sale)
    }

    fn ensure_seed(&self) -> Result<(), StorageError> {
        if self.backend.get(PRODUCTS_KEY)?.is_none() {
            tracing::info!("no persisted catalog, writing seed products");
            self.write(PRODUCTS_KEY, &seed::products())?;
        }
        if self.backend.get(SALES_KEY)?.is_none() {
            tracing::info!("no persisted sales, writing seed sales");
            self.write(SALES_KEY, &self.seed_sales())?;
        }
        Ok(())
    }

    fn seed_sales(&self) -> Vec<Sale> {
        self.fallback_sales
            .get_or_init(|| seed::sales(Utc::now()))
            .clone()
    }

    /// Read a collection, degrading to `fallback` when the blob is missing or
    /// unparseable. Parse failures are logged, never propagated; the corrupt
    /// blob is left in place.
    fn read_or<T: DeserializeOwned>(
        &self,
        key: &str,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, StorageError> {
        match self.backend.get(key)? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::warn!(key, %err, "unparseable persisted blob, using seed fallback");
                    Ok(fallback())
                }
            },
            None => Ok(fallback()),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.backend.set(key, &bytes)
    }

    /// Events are hints; a failed publish only costs subscribers a re-read.
    fn notify(&self, event: StoreEvent) {
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(?err, "failed to publish store event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_for(product: &Product, qty: f64) -> SaleItem {
        SaleItem::for_product(product, qty).unwrap()
    }

    #[test]
    fn first_read_seeds_the_catalog() {
        let store = Store::in_memory();
        let products = store.list_products().unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].id, ProductId::from("p1"));
    }

    #[test]
    fn repeated_reads_return_equal_snapshots() {
        let store = Store::in_memory();
        assert_eq!(store.list_products().unwrap(), store.list_products().unwrap());
        assert_eq!(store.list_sales().unwrap(), store.list_sales().unwrap());
    }

    #[test]
    fn add_product_appends_exactly_one_entry() {
        let store = Store::in_memory();
        let before = store.list_products().unwrap();

        let added = store.add_product("Ajwa Dates Deluxe", 15.0, "kg").unwrap();

        let after = store.list_products().unwrap();
        assert_eq!(after.len(), before.len() + 1);
        let found = after.iter().find(|p| p.id == added.id).unwrap();
        assert_eq!(found.name, "Ajwa Dates Deluxe");
        assert_eq!(found.price, 15.0);
        assert_eq!(found.unit, "kg");
        assert!(before.iter().all(|p| p.id != added.id));
    }

    #[test]
    fn add_product_with_blank_name_changes_nothing() {
        let store = Store::in_memory();
        let before = store.list_products().unwrap();

        let err = store.add_product("   ", 5.0, "kg").unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert_eq!(store.list_products().unwrap(), before);
    }

    #[test]
    fn update_price_replaces_only_the_matching_product() {
        let store = Store::in_memory();
        store
            .update_product_price(&ProductId::from("p1"), 14.0)
            .unwrap();

        let products = store.list_products().unwrap();
        assert_eq!(products.iter().find(|p| p.id == ProductId::from("p1")).unwrap().price, 14.0);
        assert_eq!(products.iter().find(|p| p.id == ProductId::from("p2")).unwrap().price, 25.0);
    }

    #[test]
    fn update_price_on_missing_id_is_a_noop() {
        let store = Store::in_memory();
        let before = store.list_products().unwrap();
        store
            .update_product_price(&ProductId::from("nope"), 99.0)
            .unwrap();
        assert_eq!(store.list_products().unwrap(), before);
    }

    #[test]
    fn delete_product_removes_only_the_matching_product() {
        let store = Store::in_memory();
        store.delete_product(&ProductId::from("p3")).unwrap();

        let products = store.list_products().unwrap();
        assert_eq!(products.len(), 4);
        assert!(products.iter().all(|p| p.id != ProductId::from("p3")));
    }

    #[test]
    fn delete_product_on_missing_id_leaves_collection_unchanged() {
        let store = Store::in_memory();
        let before = store.list_products().unwrap();
        store.delete_product(&ProductId::from("nope")).unwrap();
        assert_eq!(store.list_products().unwrap(), before);
    }

    #[test]
    fn delete_product_does_not_cascade_into_sales() {
        let store = Store::in_memory();
        let sales_before = store.list_sales().unwrap();
        store.delete_product(&ProductId::from("p1")).unwrap();
        assert_eq!(store.list_sales().unwrap(), sales_before);
    }

    #[test]
    fn complete_sale_prepends_and_totals() {
        let store = Store::in_memory();
        let products = store.list_products().unwrap();
        let items = vec![item_for(&products[0], 2.0), item_for(&products[1], 1.0)];

        let sale = store.complete_sale(items).unwrap();
        assert_eq!(sale.total, 12.5 * 2.0 + 25.0);

        let sales = store.list_sales().unwrap();
        assert_eq!(sales[0].id, sale.id);
        assert_eq!(sales.len(), 19);
    }

    #[test]
    fn complete_sale_rejects_empty_cart_without_writing() {
        let store = Store::in_memory();
        let before = store.list_sales().unwrap();

        let err = store.complete_sale(Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert_eq!(store.list_sales().unwrap(), before);
    }

    #[test]
    fn each_successful_mutation_publishes_one_event() {
        let store = Store::in_memory();
        let sub = store.subscribe();

        let added = store.add_product("Raisins", 6.0, "kg").unwrap();
        store.update_product_price(&added.id, 7.0).unwrap();
        store.delete_product(&added.id).unwrap();

        assert!(matches!(
            sub.try_recv().unwrap(),
            StoreEvent::ProductAdded { product_id, .. } if product_id == added.id
        ));
        assert!(matches!(
            sub.try_recv().unwrap(),
            StoreEvent::ProductPriceUpdated { price, .. } if price == 7.0
        ));
        assert!(matches!(
            sub.try_recv().unwrap(),
            StoreEvent::ProductDeleted { .. }
        ));
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn noop_mutations_publish_nothing() {
        let store = Store::in_memory();
        let sub = store.subscribe();

        store
            .update_product_price(&ProductId::from("nope"), 1.0)
            .unwrap();
        store.delete_product(&ProductId::from("nope")).unwrap();
        let _ = store.add_product("", 1.0, "kg");

        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn corrupt_sales_blob_reads_are_idempotent() {
        let backend = Arc::new(crate::backend::InMemoryBackend::new());
        backend.set(SALES_KEY, b"{{{ not json").unwrap();

        let store = Store::new(backend);
        let first = store.list_sales().unwrap();
        let second = store.list_sales().unwrap();

        // The fallback dataset is generated once per store, so repeated reads
        // return equal snapshots even though the blob never parses.
        assert_eq!(first.len(), 18);
        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_products_blob_falls_back_to_seed() {
        let backend = Arc::new(crate::backend::InMemoryBackend::new());
        backend.set(PRODUCTS_KEY, b"not json at all").unwrap();

        let store = Store::new(backend);
        let products = store.list_products().unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Ajwa Dates");
    }
}
