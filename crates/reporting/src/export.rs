//! CSV export of report rows.
//!
//! Rows are emitted in the order given, which by contract is the order the
//! caller is currently displaying.

use csv::Writer;
use thiserror::Error;

use souqpos_sales::Sale;

use crate::queries::PeriodTotal;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode csv")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv buffer")]
    Io(#[from] std::io::Error),

    #[error("csv output was not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render `group_sales` output as CSV: `period,total`.
pub fn period_totals_csv(rows: &[PeriodTotal]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["period", "total"])?;
    for row in rows {
        writer.write_record(&[row.label.clone(), format!("{:.2}", row.total)])?;
    }
    finish(writer)
}

/// Render a sale history as CSV, one row per line item.
///
/// Columns: sale id, RFC 3339 date, product id, product name, unit, qty,
/// unit price, subtotal, sale total.
pub fn sales_history_csv(sales: &[Sale]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "sale_id", "date", "product_id", "product", "unit", "qty", "price", "subtotal",
        "sale_total",
    ])?;
    for sale in sales {
        let date = sale.date.to_rfc3339();
        for it in &sale.items {
            writer.write_record(&[
                sale.id.as_str().to_owned(),
                date.clone(),
                it.product_id.as_str().to_owned(),
                it.name.clone(),
                it.unit.clone(),
                format!("{}", it.qty),
                format!("{:.2}", it.price),
                format!("{:.2}", it.subtotal),
                format!("{:.2}", sale.total),
            ])?;
        }
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
