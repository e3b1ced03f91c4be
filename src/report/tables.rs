//! Report Tables Module
//! Display-ready DataFrames for terminal rendering.

use polars::prelude::*;

use super::summary::ProductCatalog;
use crate::basket::AssociationRule;
use crate::performance::PerformanceRecord;

/// Rules table with product ids replaced by catalog names.
pub fn rules_table(rules: &[AssociationRule], catalog: &ProductCatalog) -> PolarsResult<DataFrame> {
    let label = |items: &[String]| -> String {
        items
            .iter()
            .map(|id| catalog.label(id).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    DataFrame::new(vec![
        Column::new(
            "antecedents".into(),
            rules.iter().map(|r| label(&r.antecedent)).collect::<Vec<_>>(),
        ),
        Column::new(
            "consequents".into(),
            rules.iter().map(|r| label(&r.consequent)).collect::<Vec<_>>(),
        ),
        Column::new(
            "support".into(),
            rules.iter().map(|r| r.support).collect::<Vec<f64>>(),
        ),
        Column::new(
            "confidence".into(),
            rules.iter().map(|r| r.confidence).collect::<Vec<f64>>(),
        ),
        Column::new(
            "lift".into(),
            rules.iter().map(|r| r.lift).collect::<Vec<f64>>(),
        ),
    ])
}

/// Performance table; unmatched targets stay null all the way through.
pub fn performance_table(records: &[PerformanceRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            "period".into(),
            records.iter().map(|r| r.period.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "category".into(),
            records.iter().map(|r| r.category.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "actual".into(),
            records.iter().map(|r| r.actual).collect::<Vec<f64>>(),
        ),
        Column::new(
            "target".into(),
            records.iter().map(|r| r.target).collect::<Vec<_>>(),
        ),
        Column::new(
            "variance".into(),
            records.iter().map(|r| r.variance).collect::<Vec<_>>(),
        ),
        Column::new(
            "pct_to_target".into(),
            records.iter().map(|r| r.pct_to_target).collect::<Vec<_>>(),
        ),
    ])
}
