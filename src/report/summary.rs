//! Summary Calculator Module
//! Headline metrics for both analytical views, plus display helpers.

use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::basket::AssociationRule;
use crate::config::DisplayConfig;
use crate::data::PROFIT_COLUMN;
use crate::performance::PerformanceRecord;

/// Label shown for sales rows without a catalog match.
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Headline figures for the basket view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketOverview {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub total_profit: Option<f64>,
    pub avg_order_value: f64,
}

/// Per-category sales mix.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub line_count: usize,
    pub revenue: f64,
    pub avg_amount: f64,
    pub profit: Option<f64>,
    pub profit_margin_pct: Option<f64>,
}

/// A product ranked by how many sale lines carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct TopProduct {
    pub name: String,
    pub line_count: usize,
}

/// Averages over the mined rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesSummary {
    pub rule_count: usize,
    pub avg_support: f64,
    pub avg_confidence: f64,
}

/// Headline figures for the performance view, over matched targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceOverview {
    pub total_actual: f64,
    pub total_target: f64,
    pub achievement_pct: Option<f64>,
    pub total_variance: f64,
}

/// Category rollup of performance records across periods.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPerformance {
    pub category: String,
    pub actual: f64,
    pub target: f64,
    pub achievement_pct: Option<f64>,
    pub variance: f64,
}

/// Product id -> display name/category lookup built from the catalog table.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    names: HashMap<String, String>,
    categories: HashMap<String, String>,
}

impl ProductCatalog {
    pub fn from_products(products: &DataFrame) -> Self {
        let ids = string_values(products, "product_id");
        let names = string_values(products, "name");
        let categories = string_values(products, "category");

        let mut catalog = ProductCatalog::default();
        for i in 0..ids.len() {
            let Some(id) = ids[i].clone() else { continue };
            if let Some(Some(name)) = names.get(i).cloned() {
                catalog.names.insert(id.clone(), name);
            }
            if let Some(Some(category)) = categories.get(i).cloned() {
                catalog.categories.insert(id, category);
            }
        }
        catalog
    }

    /// Display name for a product, falling back to the raw id.
    pub fn label<'a>(&'a self, product_id: &'a str) -> &'a str {
        self.names
            .get(product_id)
            .map(String::as_str)
            .unwrap_or(product_id)
    }

    pub fn category(&self, product_id: &str) -> Option<&str> {
        self.categories.get(product_id).map(String::as_str)
    }
}

/// Converts and formats monetary amounts for display.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbol: String,
    rate: f64,
}

impl CurrencyFormatter {
    pub fn new(symbol: &str, rate: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            rate,
        }
    }

    pub fn from_config(display: &DisplayConfig) -> Self {
        Self::new(&display.currency_symbol, display.exchange_rate)
    }

    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }

    /// Converted amount with thousands separators, e.g. `₹1,234.56`.
    pub fn format(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, group_thousands(self.convert(amount)))
    }
}

fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

/// Row-aligned string column, nulls preserved.
fn string_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::String).ok())
        .map(|col| {
            col.str()
                .map(|ca| ca.into_iter().map(|v| v.map(String::from)).collect())
                .unwrap_or_default()
        })
        .unwrap_or_default()
}

/// Row-aligned numeric column, nulls preserved.
fn numeric_values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .map(|col| {
            col.f64()
                .map(|ca| ca.into_iter().collect())
                .unwrap_or_default()
        })
        .unwrap_or_default()
}

#[derive(Default)]
struct CategoryAccumulator {
    lines: usize,
    revenue: f64,
    profit: f64,
}

#[derive(Default)]
struct PerformanceAccumulator {
    actual: f64,
    target: f64,
}

/// Computes display summaries from prepared data.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Headline basket metrics. The average is taken per sale line, matching
    /// how the revenue figures are reported elsewhere.
    pub fn basket_overview(sales: &DataFrame) -> BasketOverview {
        let amounts: Vec<f64> = numeric_values(sales, "amount").into_iter().flatten().collect();
        let total_revenue: f64 = amounts.iter().sum();
        let avg_order_value = if amounts.is_empty() {
            0.0
        } else {
            total_revenue / amounts.len() as f64
        };

        let total_orders = sales
            .column("order_id")
            .ok()
            .and_then(|col| col.n_unique().ok())
            .unwrap_or(0);

        let total_profit = if sales.column(PROFIT_COLUMN).is_ok() {
            Some(
                numeric_values(sales, PROFIT_COLUMN)
                    .into_iter()
                    .flatten()
                    .sum::<f64>(),
            )
        } else {
            None
        };

        BasketOverview {
            total_orders,
            total_revenue,
            total_profit,
            avg_order_value,
        }
    }

    /// Sales mix per category, revenue-descending. Requires the catalog
    /// columns attached; unmatched rows land under `(uncategorized)`.
    pub fn category_breakdown(sales: &DataFrame) -> Vec<CategoryBreakdown> {
        let categories = string_values(sales, "category");
        let amounts = numeric_values(sales, "amount");
        let has_profit = sales.column(PROFIT_COLUMN).is_ok();
        let profits = if has_profit {
            numeric_values(sales, PROFIT_COLUMN)
        } else {
            Vec::new()
        };

        let mut acc: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
        for i in 0..sales.height() {
            let label = categories
                .get(i)
                .cloned()
                .flatten()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            let entry = acc.entry(label).or_default();
            entry.lines += 1;
            entry.revenue += amounts.get(i).copied().flatten().unwrap_or(0.0);
            entry.profit += profits.get(i).copied().flatten().unwrap_or(0.0);
        }

        let mut breakdown: Vec<CategoryBreakdown> = acc
            .into_iter()
            .map(|(category, acc)| CategoryBreakdown {
                category,
                line_count: acc.lines,
                revenue: acc.revenue,
                avg_amount: if acc.lines > 0 {
                    acc.revenue / acc.lines as f64
                } else {
                    0.0
                },
                profit: has_profit.then_some(acc.profit),
                profit_margin_pct: (has_profit && acc.revenue != 0.0)
                    .then(|| acc.profit / acc.revenue * 100.0),
            })
            .collect();

        breakdown.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        breakdown
    }

    /// Products ranked by sale-line count. Falls back to the raw product id
    /// when the catalog has no name for a row.
    pub fn top_products(sales: &DataFrame, top_n: usize) -> Vec<TopProduct> {
        let names = string_values(sales, "name");
        let ids = string_values(sales, "product_id");

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for i in 0..sales.height() {
            let label = names
                .get(i)
                .cloned()
                .flatten()
                .or_else(|| ids.get(i).cloned().flatten());
            let Some(label) = label else { continue };
            *counts.entry(label).or_insert(0) += 1;
        }

        let mut ranked: Vec<TopProduct> = counts
            .into_iter()
            .map(|(name, line_count)| TopProduct { name, line_count })
            .collect();
        ranked.sort_by(|a, b| {
            b.line_count
                .cmp(&a.line_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(top_n);
        ranked
    }

    pub fn rules_summary(rules: &[AssociationRule]) -> RulesSummary {
        if rules.is_empty() {
            return RulesSummary::default();
        }
        let n = rules.len() as f64;
        RulesSummary {
            rule_count: rules.len(),
            avg_support: rules.iter().map(|r| r.support).sum::<f64>() / n,
            avg_confidence: rules.iter().map(|r| r.confidence).sum::<f64>() / n,
        }
    }

    /// Totals across all records. Unmatched targets contribute nothing to
    /// the target side, so the variance is against matched targets only.
    pub fn performance_overview(records: &[PerformanceRecord]) -> PerformanceOverview {
        let total_actual: f64 = records.iter().map(|r| r.actual).sum();
        let total_target: f64 = records.iter().filter_map(|r| r.target).sum();
        let achievement_pct = (total_target > 0.0).then(|| total_actual / total_target * 100.0);

        PerformanceOverview {
            total_actual,
            total_target,
            achievement_pct,
            total_variance: total_actual - total_target,
        }
    }

    /// Collapse records to one row per category, summed across periods.
    pub fn category_performance(records: &[PerformanceRecord]) -> Vec<CategoryPerformance> {
        let mut acc: BTreeMap<String, PerformanceAccumulator> = BTreeMap::new();
        for record in records {
            let label = record
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            let entry = acc.entry(label).or_default();
            entry.actual += record.actual;
            entry.target += record.target.unwrap_or(0.0);
        }

        acc.into_iter()
            .map(|(category, acc)| CategoryPerformance {
                category,
                actual: acc.actual,
                target: acc.target,
                achievement_pct: (acc.target > 0.0).then(|| acc.actual / acc.target * 100.0),
                variance: acc.actual - acc.target,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn enriched_sales() -> DataFrame {
        DataFrame::new(vec![
            Column::new("order_id".into(), vec!["O1", "O1", "O2", "O3"]),
            Column::new("product_id".into(), vec!["P1", "P2", "P1", "P9"]),
            Column::new("amount".into(), vec![100.0f64, 60.0, 100.0, 40.0]),
            Column::new("profit".into(), vec![20.0f64, 12.0, 20.0, -2.0]),
            Column::new(
                "category".into(),
                vec![Some("Furniture"), Some("Technology"), Some("Furniture"), None],
            ),
            Column::new(
                "name".into(),
                vec![Some("Bookcase"), Some("Phone"), Some("Bookcase"), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn overview_counts_orders_and_sums_revenue() {
        let overview = SummaryCalculator::basket_overview(&enriched_sales());

        assert_eq!(overview.total_orders, 3);
        assert_relative_eq!(overview.total_revenue, 300.0);
        assert_relative_eq!(overview.total_profit.unwrap(), 50.0);
        assert_relative_eq!(overview.avg_order_value, 75.0);
    }

    #[test]
    fn overview_without_profit_column_reports_none() {
        let sales = DataFrame::new(vec![
            Column::new("order_id".into(), vec!["O1"]),
            Column::new("amount".into(), vec![10.0f64]),
        ])
        .unwrap();

        let overview = SummaryCalculator::basket_overview(&sales);
        assert_eq!(overview.total_profit, None);
        assert_relative_eq!(overview.avg_order_value, 10.0);
    }

    #[test]
    fn breakdown_orders_categories_by_revenue() {
        let breakdown = SummaryCalculator::category_breakdown(&enriched_sales());

        assert_eq!(breakdown[0].category, "Furniture");
        assert_eq!(breakdown[0].line_count, 2);
        assert_relative_eq!(breakdown[0].revenue, 200.0);
        assert_relative_eq!(breakdown[0].avg_amount, 100.0);
        assert_relative_eq!(breakdown[0].profit_margin_pct.unwrap(), 20.0);

        let uncategorized = breakdown
            .iter()
            .find(|b| b.category == UNCATEGORIZED)
            .unwrap();
        assert_relative_eq!(uncategorized.revenue, 40.0);
    }

    #[test]
    fn top_products_fall_back_to_raw_ids() {
        let ranked = SummaryCalculator::top_products(&enriched_sales(), 10);

        assert_eq!(ranked[0].name, "Bookcase");
        assert_eq!(ranked[0].line_count, 2);
        assert!(ranked.iter().any(|p| p.name == "P9"));
    }

    #[test]
    fn top_products_respects_the_cutoff() {
        let ranked = SummaryCalculator::top_products(&enriched_sales(), 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Bookcase");
    }

    #[test]
    fn rules_summary_averages_the_metrics() {
        let rules = vec![
            AssociationRule {
                antecedent: vec!["A".to_string()],
                consequent: vec!["B".to_string()],
                antecedent_support: 0.6,
                consequent_support: 0.5,
                support: 0.4,
                confidence: 0.8,
                lift: 1.6,
                leverage: 0.1,
                conviction: 2.5,
            },
            AssociationRule {
                antecedent: vec!["B".to_string()],
                consequent: vec!["A".to_string()],
                antecedent_support: 0.5,
                consequent_support: 0.6,
                support: 0.4,
                confidence: 0.6,
                lift: 1.0,
                leverage: 0.1,
                conviction: 1.0,
            },
        ];

        let summary = SummaryCalculator::rules_summary(&rules);
        assert_eq!(summary.rule_count, 2);
        assert_relative_eq!(summary.avg_support, 0.4);
        assert_relative_eq!(summary.avg_confidence, 0.7);
    }

    #[test]
    fn empty_rule_set_summarizes_to_zeros() {
        let summary = SummaryCalculator::rules_summary(&[]);
        assert_eq!(summary.rule_count, 0);
        assert_relative_eq!(summary.avg_support, 0.0);
    }

    fn record(
        period: &str,
        category: Option<&str>,
        actual: f64,
        target: Option<f64>,
    ) -> PerformanceRecord {
        PerformanceRecord {
            period: Some(period.to_string()),
            category: category.map(String::from),
            actual,
            target,
            variance: target.map(|t| actual - t),
            pct_to_target: target.and_then(|t| (t != 0.0).then(|| actual / t * 100.0)),
        }
    }

    #[test]
    fn performance_overview_totals_matched_targets() {
        let records = vec![
            record("18-Apr", Some("Furniture"), 250.0, Some(200.0)),
            record("18-May", Some("Furniture"), 100.0, None),
        ];

        let overview = SummaryCalculator::performance_overview(&records);
        assert_relative_eq!(overview.total_actual, 350.0);
        assert_relative_eq!(overview.total_target, 200.0);
        assert_relative_eq!(overview.achievement_pct.unwrap(), 175.0);
        assert_relative_eq!(overview.total_variance, 150.0);
    }

    #[test]
    fn category_rollup_sums_across_periods() {
        let records = vec![
            record("18-Apr", Some("Furniture"), 250.0, Some(200.0)),
            record("18-May", Some("Furniture"), 150.0, Some(100.0)),
            record("18-Apr", None, 30.0, None),
        ];

        let rollup = SummaryCalculator::category_performance(&records);
        assert_eq!(rollup.len(), 2);

        let furniture = rollup
            .iter()
            .find(|c| c.category == "Furniture")
            .unwrap();
        assert_relative_eq!(furniture.actual, 400.0);
        assert_relative_eq!(furniture.target, 300.0);
        assert_relative_eq!(furniture.variance, 100.0);

        let uncategorized = rollup
            .iter()
            .find(|c| c.category == UNCATEGORIZED)
            .unwrap();
        assert_eq!(uncategorized.achievement_pct, None);
    }

    #[test]
    fn catalog_labels_fall_back_to_ids() {
        let products = DataFrame::new(vec![
            Column::new("product_id".into(), vec!["P1"]),
            Column::new("category".into(), vec!["Furniture"]),
            Column::new("name".into(), vec!["Bookcase"]),
        ])
        .unwrap();

        let catalog = ProductCatalog::from_products(&products);
        assert_eq!(catalog.label("P1"), "Bookcase");
        assert_eq!(catalog.label("P9"), "P9");
        assert_eq!(catalog.category("P1"), Some("Furniture"));
        assert_eq!(catalog.category("P9"), None);
    }

    #[test]
    fn currency_formats_with_thousands_separators() {
        let inr = CurrencyFormatter::new("₹", 83.0);
        assert_relative_eq!(inr.convert(10.0), 830.0);
        assert_eq!(inr.format(10.0), "₹830.00");
        assert_eq!(inr.format(15060.25), "₹1,250,000.75");

        let usd = CurrencyFormatter::new("$", 1.0);
        assert_eq!(usd.format(1234567.891), "$1,234,567.89");
        assert_eq!(usd.format(-1234.5), "$-1,234.50");
        assert_eq!(usd.format(0.0), "$0.00");
    }
}
