//! Fixed demo dataset written on first use.
//!
//! Written exactly once, when a collection key has no persisted blob yet. Also
//! serves as the silent fallback when a persisted blob fails to parse.

use chrono::{DateTime, Duration, Utc};

use souqpos_catalog::Product;
use souqpos_core::{ProductId, SaleId};
use souqpos_sales::{Sale, SaleItem};

fn product(id: &str, name: &str, price: f64, unit: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        price,
        unit: unit.to_owned(),
    }
}

/// The demo catalog.
pub fn products() -> Vec<Product> {
    vec![
        product("p1", "Ajwa Dates", 12.5, "kg"),
        product("p2", "Sidr Honey", 25.0, "L"),
        product("p3", "Mixed Nuts", 8.75, "kg"),
        product("p4", "Almonds", 9.5, "kg"),
        product("p5", "Pistachios", 11.0, "kg"),
    ]
}

fn item(product: &Product, qty: f64) -> SaleItem {
    SaleItem {
        product_id: product.id.clone(),
        name: product.name.clone(),
        unit: product.unit.clone(),
        qty,
        price: product.price,
        subtotal: product.price * qty,
    }
}

/// Demo sales walking back 18 days from `now`, newest first.
///
/// Day `i` sells `1 + (i % 3)` kg of dates and `i % 2` L of honey; zero-qty
/// items and zero-total sales are dropped. Deterministic for a fixed `now`, so
/// tests can pin the clock.
pub fn sales(now: DateTime<Utc>) -> Vec<Sale> {
    let catalog = products();
    let dates = &catalog[0];
    let honey = &catalog[1];

    let mut out = Vec::new();
    for i in 0..18i64 {
        let date = now - Duration::days(i);

        let mut items = vec![item(dates, (1 + i % 3) as f64)];
        let honey_qty = (i % 2) as f64;
        if honey_qty > 0.0 {
            items.push(item(honey, honey_qty));
        }

        let total: f64 = items.iter().map(|it| it.subtotal).sum();
        if total > 0.0 {
            out.push(Sale {
                id: SaleId::from(format!("s{i}")),
                items,
                total,
                date,
            });
        }
    }
    out
}
