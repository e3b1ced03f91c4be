//! Data module - CSV loading and preparation

mod loader;
mod processor;

pub use loader::{
    DataLoader, LoadError, SalesTables, PRODUCT_COLUMNS, PROFIT_COLUMN, SALES_COLUMNS,
    TARGET_COLUMNS,
};
pub use processor::{DataProcessor, ProcessError};
