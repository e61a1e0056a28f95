//! Reporting queries over sales snapshots.
//!
//! Everything here is a pure function over slices the caller fetched from the
//! store: no side effects, no mutation of inputs, empty input yields empty
//! output. Presentation layers re-invoke these on every change notification;
//! there is no incremental-update contract.

pub mod export;
pub mod queries;

pub use export::{ExportError, period_totals_csv, sales_history_csv};
pub use queries::{
    Period, PeriodTotal, ProductSales, filter_sales_by_range, group_sales, group_sales_in,
    sales_for_product, top_products, total_revenue_for_product, total_sold_for_product,
};
