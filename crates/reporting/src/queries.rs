//! Per-product totals, time-bucketed grouping, ranking and range filtering.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc, Weekday};
use serde::Serialize;

use souqpos_core::ProductId;
use souqpos_sales::Sale;

/// Time bucket granularity for [`group_sales`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

/// One chart row: a bucket label and the summed sale totals in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub label: String,
    pub total: f64,
}

/// Per-product aggregate across all sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub qty: f64,
    pub revenue: f64,
}

/// Sales containing at least one line item for `product_id`.
///
/// Each returned sale keeps its items as stored but has `total` rewritten to
/// the matching items' subtotal sum (not the sale's grand total). Sales with a
/// zero matching total are excluded.
pub fn sales_for_product(sales: &[Sale], product_id: &ProductId) -> Vec<Sale> {
    sales
        .iter()
        .filter_map(|sale| {
            let total: f64 = sale
                .items
                .iter()
                .filter(|it| &it.product_id == product_id)
                .map(|it| it.subtotal)
                .sum();
            (total > 0.0).then(|| Sale {
                total,
                ..sale.clone()
            })
        })
        .collect()
}

/// Total quantity of `product_id` sold across all line items.
pub fn total_sold_for_product(sales: &[Sale], product_id: &ProductId) -> f64 {
    sales
        .iter()
        .flat_map(|sale| &sale.items)
        .filter(|it| &it.product_id == product_id)
        .map(|it| it.qty)
        .sum()
}

/// Total revenue for `product_id` across all line items.
pub fn total_revenue_for_product(sales: &[Sale], product_id: &ProductId) -> f64 {
    sales
        .iter()
        .flat_map(|sale| &sale.items)
        .filter(|it| &it.product_id == product_id)
        .map(|it| it.subtotal)
        .sum()
}

/// [`group_sales_in`] with the viewer's local time zone.
pub fn group_sales(sales: &[Sale], period: Period) -> Vec<PeriodTotal> {
    group_sales_in(sales, period, &Local)
}

/// Bucket sales by calendar period in `tz` and sum each bucket's totals.
///
/// Buckets are returned in chronological order of their start date. Labels:
/// daily `M/D/YYYY`, weekly `"W<n> <iso-year>"` (ISO-8601 week of the local
/// calendar date), monthly `"<short month> <year>"`.
pub fn group_sales_in<Tz: TimeZone>(sales: &[Sale], period: Period, tz: &Tz) -> Vec<PeriodTotal> {
    // Keyed by bucket start date so iteration order is chronological, not
    // lexicographic over labels (which mis-orders months across years).
    let mut buckets: BTreeMap<NaiveDate, PeriodTotal> = BTreeMap::new();

    for sale in sales {
        let day = sale.date.with_timezone(tz).date_naive();
        let (start, label) = match period {
            Period::Daily => (day, format!("{}/{}/{}", day.month(), day.day(), day.year())),
            Period::Weekly => {
                let iso = day.iso_week();
                let start = NaiveDate::from_isoywd_opt(iso.year(), iso.week(), Weekday::Mon)
                    .unwrap_or(day);
                (start, format!("W{} {}", iso.week(), iso.year()))
            }
            Period::Monthly => (
                day.with_day(1).unwrap_or(day),
                format!("{} {}", day.format("%b"), day.year()),
            ),
        };

        buckets
            .entry(start)
            .and_modify(|bucket| bucket.total += sale.total)
            .or_insert(PeriodTotal {
                label,
                total: sale.total,
            });
    }

    buckets.into_values().collect()
}

/// Quantity and revenue per product, sorted non-increasing by revenue.
///
/// No truncation here; callers take the top N. Names come from the line items'
/// snapshots, so deleted products still rank.
pub fn top_products(sales: &[Sale]) -> Vec<ProductSales> {
    let mut by_product: HashMap<ProductId, ProductSales> = HashMap::new();

    for sale in sales {
        for it in &sale.items {
            let entry = by_product
                .entry(it.product_id.clone())
                .or_insert_with(|| ProductSales {
                    product_id: it.product_id.clone(),
                    name: it.name.clone(),
                    qty: 0.0,
                    revenue: 0.0,
                });
            entry.qty += it.qty;
            entry.revenue += it.subtotal;
        }
    }

    let mut ranked: Vec<ProductSales> = by_product.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranked
}

/// Sales whose timestamp satisfies `start <= date <= end` (inclusive both
/// ends, compared in absolute time).
pub fn filter_sales_by_range(
    sales: &[Sale],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Sale> {
    sales
        .iter()
        .filter(|sale| start <= sale.date && sale.date <= end)
        .cloned()
        .collect()
}
