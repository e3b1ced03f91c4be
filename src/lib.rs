//! Salescope - E-commerce Sales Analytics
//!
//! Loads order, catalog and target CSVs, mines market-basket association
//! rules, and tracks aggregated sales against targets.

pub mod basket;
pub mod cli;
pub mod config;
pub mod data;
pub mod performance;
pub mod report;

pub use basket::{
    Apriori, AssociationRule, BasketEncoder, BasketError, BasketMatrix, FrequentItemset,
    RuleGenerator,
};
pub use config::{AppConfig, ConfigError, GroupKey};
pub use data::{DataLoader, DataProcessor, LoadError, ProcessError, SalesTables};
pub use performance::{PerfError, PerformanceCalculator, PerformanceRecord};
pub use report::{
    BasketOverview, CategoryBreakdown, CategoryPerformance, CurrencyFormatter,
    PerformanceOverview, ProductCatalog, RulesSummary, SummaryCalculator, TopProduct,
};
