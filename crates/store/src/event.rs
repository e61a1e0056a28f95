//! Events published after successful store mutations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use souqpos_core::{ProductId, SaleId};
use souqpos_events::Event;

/// Notification that a store collection changed.
///
/// Carries identifiers and headline figures only. Subscribers re-pull
/// snapshots from the store rather than patching local copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StoreEvent {
    ProductAdded {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    ProductPriceUpdated {
        product_id: ProductId,
        price: f64,
        occurred_at: DateTime<Utc>,
    },
    ProductDeleted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    SaleCompleted {
        sale_id: SaleId,
        total: f64,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for StoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::ProductAdded { .. } => "catalog.product.added",
            StoreEvent::ProductPriceUpdated { .. } => "catalog.product.price_updated",
            StoreEvent::ProductDeleted { .. } => "catalog.product.deleted",
            StoreEvent::SaleCompleted { .. } => "sales.sale.completed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::ProductAdded { occurred_at, .. }
            | StoreEvent::ProductPriceUpdated { occurred_at, .. }
            | StoreEvent::ProductDeleted { occurred_at, .. }
            | StoreEvent::SaleCompleted { occurred_at, .. } => *occurred_at,
        }
    }
}
