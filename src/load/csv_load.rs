use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Column, Dataset, Record};

/// Loads a transactions CSV wholesale into a `Dataset`.
///
/// The header row is matched against the expected column names
/// (`cust_id`, `t_date`, `t_amt`, ...). Unrecognized headers are ignored;
/// recognized ones may be missing, in which case every report that needs
/// them fails individually at run time. Cell values never fail the load:
/// empty or unparseable dates and amounts become absent values.
pub(crate) struct CsvLoader;

impl CsvLoader {
    pub(crate) fn load(path: &Path) -> Result<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let headers = rdr.headers().context("Failed to read CSV header row")?;
        let mut mapping: Vec<(Column, usize)> = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            if let Some(col) = Column::from_header(name.trim()) {
                // First occurrence wins if a header repeats
                if !mapping.iter().any(|(c, _)| *c == col) {
                    mapping.push((col, idx));
                }
            }
        }

        if mapping.is_empty() {
            anyhow::bail!(
                "No recognized columns in {}; expected headers like cust_id, t_date, t_amt",
                path.display()
            );
        }

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result.context("Failed to read CSV record")?;
            let mut rec = Record::default();
            for (col, idx) in &mapping {
                let raw = row.get(*idx).map(str::trim).unwrap_or("");
                if raw.is_empty() {
                    continue;
                }
                match col {
                    Column::Customer => rec.customer = Some(raw.to_string()),
                    Column::Date => rec.date = parse_date(raw),
                    Column::Amount => rec.amount = parse_decimal(raw),
                    Column::Service => rec.service = Some(raw.to_string()),
                    Column::Product => rec.product = Some(raw.to_string()),
                    Column::Detail => rec.detail = Some(raw.to_string()),
                    Column::State => rec.state = Some(raw.to_string()),
                    Column::City => rec.city = Some(raw.to_string()),
                }
            }
            records.push(rec);
        }

        let columns: BTreeSet<Column> = mapping.iter().map(|(c, _)| *c).collect();
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        Ok(Dataset::new(source, columns, records))
    }
}

/// Unparseable dates coerce to `None` rather than erroring, so they fall
/// out of date-based groupings silently.
fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Amounts tolerate currency formatting; anything else coerces to `None`.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
#[path = "csv_load_tests.rs"]
mod tests;
