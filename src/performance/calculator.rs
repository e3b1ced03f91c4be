//! Performance Calculator Module
//! Actual-vs-target aggregation over the configured grouping keys.

use polars::prelude::*;
use thiserror::Error;

use crate::config::GroupKey;

#[derive(Error, Debug)]
pub enum PerfError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One group's actual-vs-target comparison.
///
/// `target` is null when no target row matched the group; the derived
/// fields stay null with it rather than pretending the target was zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub period: Option<String>,
    pub category: Option<String>,
    pub actual: f64,
    pub target: Option<f64>,
    pub variance: Option<f64>,
    pub pct_to_target: Option<f64>,
}

/// Aggregates sales against targets per grouping key.
pub struct PerformanceCalculator;

impl PerformanceCalculator {
    /// Sum actual sales per group and left-join the targets aligned to the
    /// same keys. `sales` must carry `amount` plus whichever of `period`,
    /// `period_key` and `category` the grouping uses.
    ///
    /// Records come back in chronological then category order.
    pub fn compare(
        sales: &DataFrame,
        targets: &DataFrame,
        group_by: &[GroupKey],
    ) -> Result<Vec<PerformanceRecord>, PerfError> {
        if sales.height() == 0 {
            return Ok(Vec::new());
        }

        let uses_period = group_by.contains(&GroupKey::Period);
        let uses_category = group_by.contains(&GroupKey::Category);
        let group_cols: Vec<Expr> = group_by.iter().map(|key| col(key.column())).collect();

        // Keep the earliest period key per group so labels sort by calendar,
        // not alphabet.
        let mut aggs = vec![col("amount").sum().alias("actual")];
        if uses_period {
            aggs.push(col("period_key").min().alias("period_key"));
        }
        let actuals = sales.clone().lazy().group_by(group_cols.clone()).agg(aggs);

        // Targets re-aggregated to the same grain: grouping by period alone
        // sums each period's targets across categories before the join.
        let aligned_targets = targets
            .clone()
            .lazy()
            .group_by(group_cols.clone())
            .agg([col("target_value").sum().alias("target")]);

        let mut sort_exprs: Vec<Expr> = Vec::new();
        if uses_period {
            sort_exprs.push(col("period_key"));
        }
        if uses_category {
            sort_exprs.push(col("category"));
        }

        let df = actuals
            .join(
                aligned_targets,
                group_cols.clone(),
                group_cols,
                JoinArgs::new(JoinType::Left),
            )
            .sort_by_exprs(
                sort_exprs,
                SortMultipleOptions::default().with_nulls_last(true),
            )
            .collect()?;

        let period_ca = if uses_period {
            Some(df.column("period")?.str()?)
        } else {
            None
        };
        let category_col = if uses_category {
            Some(df.column("category")?.cast(&DataType::String)?)
        } else {
            None
        };
        let category_ca = match category_col.as_ref() {
            Some(column) => Some(column.str()?),
            None => None,
        };

        let actual_col = df.column("actual")?.cast(&DataType::Float64)?;
        let actual_ca = actual_col.f64()?;
        let target_col = df.column("target")?.cast(&DataType::Float64)?;
        let target_ca = target_col.f64()?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let actual = actual_ca.get(i).unwrap_or(0.0);
            let target = target_ca.get(i);
            let variance = target.map(|t| actual - t);
            let pct_to_target = target.and_then(|t| (t != 0.0).then(|| actual / t * 100.0));

            records.push(PerformanceRecord {
                period: period_ca.and_then(|ca| ca.get(i)).map(String::from),
                category: category_ca.and_then(|ca| ca.get(i)).map(String::from),
                actual,
                target,
                variance,
                pct_to_target,
            });
        }

        Ok(records)
    }
}
