//! Command-line interface definitions and argument parsing

use clap::{Parser, Subcommand};

use crate::config::{parse_group_by, ConfigError, GroupKey};

/// E-commerce sales analytics: market basket rules and target tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "salescope.json")]
    pub config: String,

    /// Print progress details while running
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub view: View,
}

#[derive(Subcommand, Debug)]
pub enum View {
    /// Mine frequent itemsets and association rules from order contents
    Basket {
        /// Override the configured minimum support, in (0, 1]
        #[arg(long)]
        min_support: Option<f64>,

        /// Override the configured minimum confidence, in [0, 1]
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// Compare aggregated sales against targets
    Performance {
        /// Override the configured grouping keys, comma-separated
        /// (e.g. `period,category`)
        #[arg(long)]
        group_by: Option<String>,
    },
}

impl View {
    /// Parsed `--group-by` override, if one was given.
    pub fn group_by_override(&self) -> Result<Option<Vec<GroupKey>>, ConfigError> {
        match self {
            View::Performance {
                group_by: Some(raw),
            } => parse_group_by(raw).map(Some),
            _ => Ok(None),
        }
    }
}
