//! Data Processor Module
//! Joins sales rows to the product catalog and derives reporting periods.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Unparseable order date `{value}` (row {row})")]
    DateParse { value: String, row: usize },
}

/// Date formats accepted in the sales `date` column. Source exports mix
/// month-first slashes with day-first dashes, plus ISO.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Handles catalog joins and reporting-period derivation.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse an order date, trying each accepted format in turn.
    pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    }

    /// Reporting period label for a date, e.g. `18-Apr`.
    pub fn period_label(date: NaiveDate) -> String {
        date.format("%y-%b").to_string()
    }

    /// Numeric key that orders period labels chronologically.
    pub fn period_key(date: NaiveDate) -> i32 {
        date.year() * 100 + date.month() as i32
    }

    /// Left-join sales rows against the product catalog. Rows without a
    /// catalog match keep a null category so group totals still cover the
    /// whole sales table.
    pub fn attach_catalog(
        sales: &DataFrame,
        products: &DataFrame,
    ) -> Result<DataFrame, ProcessError> {
        let joined = sales
            .clone()
            .lazy()
            .join(
                products
                    .clone()
                    .lazy()
                    .select([col("product_id"), col("category"), col("name")]),
                [col("product_id")],
                [col("product_id")],
                JoinArgs::new(JoinType::Left),
            )
            .collect()?;

        Ok(joined)
    }

    /// Add `period` and `period_key` columns derived from the `date` column.
    pub fn with_period_columns(df: &DataFrame) -> Result<DataFrame, ProcessError> {
        let date_col = df.column("date")?.cast(&DataType::String)?;
        let date_ca = date_col.str()?;

        let mut labels: Vec<String> = Vec::with_capacity(df.height());
        let mut keys: Vec<i32> = Vec::with_capacity(df.height());

        for i in 0..df.height() {
            let raw = date_ca.get(i).unwrap_or("");
            let date = Self::parse_order_date(raw).ok_or_else(|| ProcessError::DateParse {
                value: raw.to_string(),
                row: i + 2, // 1-indexed plus header row
            })?;
            labels.push(Self::period_label(date));
            keys.push(Self::period_key(date));
        }

        let mut out = df.clone();
        out.with_column(Column::new("period".into(), labels))?;
        out.with_column(Column::new("period_key".into(), keys))?;
        Ok(out)
    }
}
