//! Salescope - E-commerce Sales Analytics
//!
//! Command-line entry point: loads the configured CSV tables and prints
//! the selected analytical view.

use anyhow::{Context, Result};
use clap::Parser;

use salescope::basket::{Apriori, BasketEncoder, RuleGenerator};
use salescope::cli::{Args, View};
use salescope::config::{AppConfig, GroupKey};
use salescope::data::{DataLoader, DataProcessor, SalesTables};
use salescope::performance::PerformanceCalculator;
use salescope::report::tables::{performance_table, rules_table};
use salescope::report::{CurrencyFormatter, ProductCatalog, SummaryCalculator};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;

    match &args.view {
        View::Basket {
            min_support,
            min_confidence,
        } => {
            if let Some(support) = min_support {
                config.basket.min_support = *support;
            }
            if let Some(confidence) = min_confidence {
                config.basket.min_confidence = *confidence;
            }
            config.validate()?;
            run_basket(&config, args.verbose)
        }
        View::Performance { .. } => {
            if let Some(keys) = args.view.group_by_override()? {
                config.performance.group_by = keys;
            }
            config.validate()?;
            run_performance(&config, args.verbose)
        }
    }
}

fn load_tables(config: &AppConfig, verbose: bool) -> Result<SalesTables> {
    let tables = DataLoader::load_all(&config.data).context("loading source tables")?;
    if verbose {
        println!(
            "Loaded {} products, {} sales lines, {} targets",
            tables.products.height(),
            tables.sales.height(),
            tables.targets.height()
        );
    }
    Ok(tables)
}

fn run_basket(config: &AppConfig, verbose: bool) -> Result<()> {
    let tables = load_tables(config, verbose)?;
    let enriched = DataProcessor::attach_catalog(&tables.sales, &tables.products)?;
    let catalog = ProductCatalog::from_products(&tables.products);
    let currency = CurrencyFormatter::from_config(&config.display);

    let overview = SummaryCalculator::basket_overview(&enriched);
    println!("=== Market Basket Analysis ===");
    println!("Total orders:    {}", overview.total_orders);
    println!("Total revenue:   {}", currency.format(overview.total_revenue));
    if let Some(profit) = overview.total_profit {
        println!("Total profit:    {}", currency.format(profit));
    }
    println!("Avg order value: {}", currency.format(overview.avg_order_value));

    println!();
    println!("Category mix:");
    for entry in SummaryCalculator::category_breakdown(&enriched) {
        match entry.profit_margin_pct {
            Some(margin) => println!(
                "  {}: {} lines, revenue {}, margin {:.1}%",
                entry.category,
                entry.line_count,
                currency.format(entry.revenue),
                margin
            ),
            None => println!(
                "  {}: {} lines, revenue {}",
                entry.category,
                entry.line_count,
                currency.format(entry.revenue)
            ),
        }
    }

    println!();
    println!("Top products by sale lines:");
    for product in SummaryCalculator::top_products(&enriched, config.display.top_n) {
        println!("  {} ({} lines)", product.name, product.line_count);
    }

    let basket = BasketEncoder::encode(&tables.sales)?;
    if verbose {
        println!(
            "Encoded {} orders over {} distinct products",
            basket.n_orders(),
            basket.n_items()
        );
    }

    let itemsets = Apriori::frequent_itemsets(&basket, config.basket.min_support);
    let rules = RuleGenerator::association_rules(&itemsets, config.basket.min_confidence);

    println!();
    if rules.is_empty() {
        println!(
            "No association rules found with the given thresholds. \
             Try lowering minimum support or confidence."
        );
        return Ok(());
    }

    let summary = SummaryCalculator::rules_summary(&rules);
    println!(
        "{} rules from {} frequent itemsets (avg support {:.6}, avg confidence {:.6})",
        summary.rule_count,
        itemsets.len(),
        summary.avg_support,
        summary.avg_confidence
    );
    println!("{}", rules_table(&rules, &catalog)?);

    Ok(())
}

fn run_performance(config: &AppConfig, verbose: bool) -> Result<()> {
    let tables = load_tables(config, verbose)?;
    let enriched = DataProcessor::attach_catalog(&tables.sales, &tables.products)?;
    let enriched = DataProcessor::with_period_columns(&enriched)?;

    let records = PerformanceCalculator::compare(
        &enriched,
        &tables.targets,
        &config.performance.group_by,
    )?;
    let currency = CurrencyFormatter::from_config(&config.display);

    let overview = SummaryCalculator::performance_overview(&records);
    println!("=== Sales Performance ===");
    println!("Total actual:   {}", currency.format(overview.total_actual));
    println!("Total target:   {}", currency.format(overview.total_target));
    match overview.achievement_pct {
        Some(pct) => println!("Achievement:    {:.1}%", pct),
        None => println!("Achievement:    n/a (no matching targets)"),
    }
    println!("Total variance: {}", currency.format(overview.total_variance));

    if config.performance.group_by.contains(&GroupKey::Category) {
        println!();
        println!("By category:");
        for entry in SummaryCalculator::category_performance(&records) {
            match entry.achievement_pct {
                Some(pct) => println!(
                    "  {}: actual {}, target {}, achievement {:.1}%",
                    entry.category,
                    currency.format(entry.actual),
                    currency.format(entry.target),
                    pct
                ),
                None => println!(
                    "  {}: actual {}, no target",
                    entry.category,
                    currency.format(entry.actual)
                ),
            }
        }
    }

    println!();
    println!("{}", performance_table(&records)?);

    Ok(())
}
