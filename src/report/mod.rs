//! Report module - display summaries and tables

mod summary;
pub mod tables;

pub use summary::{
    BasketOverview, CategoryBreakdown, CategoryPerformance, CurrencyFormatter,
    PerformanceOverview, ProductCatalog, RulesSummary, SummaryCalculator, TopProduct,
    UNCATEGORIZED,
};
