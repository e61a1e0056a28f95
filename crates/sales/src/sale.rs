use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use souqpos_catalog::Product;
use souqpos_core::{DomainError, DomainResult, Entity, ProductId, SaleId};

/// One line of a sale.
///
/// `name`, `unit` and `price` are denormalized copies of the product's
/// attributes at sale time. `product_id` is a reference by value, not a live
/// foreign key: deleting or renaming the product later leaves the line intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub name: String,
    pub unit: String,
    /// Quantity sold, positive. Fractional quantities are normal for
    /// weight-based units.
    pub qty: f64,
    /// Unit price snapshot at sale time.
    pub price: f64,
    /// `price * qty`, fixed at construction.
    pub subtotal: f64,
}

impl SaleItem {
    /// Build a line item for `qty` of `product`, snapshotting its attributes.
    pub fn for_product(product: &Product, qty: f64) -> DomainResult<Self> {
        if !(qty > 0.0) {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit: product.unit.clone(),
            qty,
            price: product.price,
            subtotal: product.price * qty,
        })
    }
}

/// An immutable, committed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Insertion order = add-to-cart order.
    pub items: Vec<SaleItem>,
    /// Sum of all item subtotals at commit time.
    pub total: f64,
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Commit a cart: compute the total and stamp the given time.
    ///
    /// Rejects an empty cart. The total is derived here and nowhere else, so
    /// `total == Σ items[].subtotal` holds for every committed sale.
    pub fn commit(items: Vec<SaleItem>, date: DateTime<Utc>) -> DomainResult<Self> {
        Self::commit_with_id(SaleId::new(), items, date)
    }

    /// Commit with an explicit id (seed fixtures, tests).
    pub fn commit_with_id(
        id: SaleId,
        items: Vec<SaleItem>,
        date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("cannot commit a sale without items"));
        }

        let total = items.iter().map(|it| it.subtotal).sum();
        Ok(Self {
            id,
            items,
            total,
            date,
        })
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
