//! CSV Data Loader Module
//! Loads the three source tables with Polars and validates their schemas.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::config::DataConfig;

/// Required columns of the product catalog.
pub const PRODUCT_COLUMNS: &[&str] = &["product_id", "category", "name"];
/// Required columns of the sales table.
pub const SALES_COLUMNS: &[&str] = &["order_id", "product_id", "quantity", "amount", "date"];
/// Required columns of the targets table.
pub const TARGET_COLUMNS: &[&str] = &["period", "category", "target_value"];

/// Optional sales column picked up by the summaries when present.
pub const PROFIT_COLUMN: &str = "profit";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    MissingFile(String),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("{file} is missing required column `{column}`")]
    MissingColumn { file: String, column: String },
}

/// The three source tables of an analysis session.
#[derive(Debug, Clone)]
pub struct SalesTables {
    pub products: DataFrame,
    pub sales: DataFrame,
    pub targets: DataFrame,
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and verify the required columns are present.
    pub fn load_csv(file_path: &str, required: &[&str]) -> Result<DataFrame, LoadError> {
        if !Path::new(file_path).exists() {
            return Err(LoadError::MissingFile(file_path.to_string()));
        }

        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let columns = df.get_column_names();
        for required_column in required {
            if !columns.iter().any(|c| c.as_str() == *required_column) {
                return Err(LoadError::MissingColumn {
                    file: file_path.to_string(),
                    column: required_column.to_string(),
                });
            }
        }

        Ok(df)
    }

    /// Load products, sales and targets from the configured paths.
    pub fn load_all(data: &DataConfig) -> Result<SalesTables, LoadError> {
        Ok(SalesTables {
            products: Self::load_csv(&data.products_path, PRODUCT_COLUMNS)?,
            sales: Self::load_csv(&data.sales_path, SALES_COLUMNS)?,
            targets: Self::load_csv(&data.targets_path, TARGET_COLUMNS)?,
        })
    }
}
