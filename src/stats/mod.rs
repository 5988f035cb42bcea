//! Stats module - per-state aggregation and report statistics

mod aggregator;
mod calculator;

pub use aggregator::{AggregateError, EnrollmentShare, StateAggregator, StateSummary, NATIONAL};
pub use calculator::{RaceTrend, ShareDistribution, StatsCalculator};
