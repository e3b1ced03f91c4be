//! Configuration Module
//! JSON-backed settings: source file paths, mining thresholds, grouping keys.

use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{name}` must be within {range}, got {value}")]
    ThresholdOutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("Unknown grouping key `{0}` (expected `period` or `category`)")]
    UnknownGroupKey(String),
    #[error("Duplicate grouping key `{0}`")]
    DuplicateGroupKey(String),
    #[error("`group_by` must name at least one key")]
    EmptyGroupBy,
    #[error("`exchange_rate` must be positive, got {0}")]
    InvalidExchangeRate(f64),
}

/// Grouping dimension for the performance view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Period,
    Category,
}

impl GroupKey {
    /// Column name this key groups on.
    pub fn column(&self) -> &'static str {
        match self {
            GroupKey::Period => "period",
            GroupKey::Category => "category",
        }
    }
}

impl FromStr for GroupKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "period" => Ok(GroupKey::Period),
            "category" => Ok(GroupKey::Category),
            other => Err(ConfigError::UnknownGroupKey(other.to_string())),
        }
    }
}

/// Parse a comma-separated grouping list, e.g. `period,category`.
pub fn parse_group_by(raw: &str) -> Result<Vec<GroupKey>, ConfigError> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(GroupKey::from_str)
        .collect()
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub basket: BasketConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Locations of the three source CSV tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub products_path: String,
    pub sales_path: String,
    pub targets_path: String,
}

/// Thresholds for frequent-itemset mining and rule derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default = "default_min_support")]
    pub min_support: f64,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

/// Grouping keys for actual-vs-target aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_group_by")]
    pub group_by: Vec<GroupKey>,
}

/// Presentation settings for monetary output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_min_support() -> f64 {
    0.01
}

fn default_min_confidence() -> f64 {
    0.5
}

fn default_group_by() -> Vec<GroupKey> {
    vec![GroupKey::Period, GroupKey::Category]
}

fn default_exchange_rate() -> f64 {
    83.0
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_top_n() -> usize {
    10
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            min_support: default_min_support(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            exchange_rate: default_exchange_rate(),
            currency_symbol: default_currency_symbol(),
            top_n: default_top_n(),
        }
    }
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all settings, including any applied command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.basket.validate()?;
        self.performance.validate()?;
        self.display.validate()?;
        Ok(())
    }
}

impl BasketConfig {
    /// A support floor of zero would admit every candidate itemset, so the
    /// lower bound is exclusive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "min_support",
                range: "(0, 1]",
                value: self.min_support,
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "min_confidence",
                range: "[0, 1]",
                value: self.min_confidence,
            });
        }
        Ok(())
    }
}

impl PerformanceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_by.is_empty() {
            return Err(ConfigError::EmptyGroupBy);
        }
        for (i, key) in self.group_by.iter().enumerate() {
            if self.group_by[..i].contains(key) {
                return Err(ConfigError::DuplicateGroupKey(key.column().to_string()));
            }
        }
        Ok(())
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.exchange_rate > 0.0) {
            return Err(ConfigError::InvalidExchangeRate(self.exchange_rate));
        }
        Ok(())
    }
}
