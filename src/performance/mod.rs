//! Performance module - sales-vs-target comparison

mod calculator;

pub use calculator::{PerfError, PerformanceCalculator, PerformanceRecord};
