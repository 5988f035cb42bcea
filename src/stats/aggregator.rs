//! State Aggregator Module
//! Per-state summary statistics and national enrollment shares, computed
//! with Polars group-by over the cleaned records.

use crate::data::loader::format_number;
use crate::data::{CleanedRecord, Column as PufColumn};
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::debug;

/// State label of the national total row.
pub const NATIONAL: &str = "National";

const STATE: &str = "State";
const PEOPLE: &str = "Number of People";
const PERCENT: &str = "Enrollment Percentage";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Total enrollment across {states} state(s) is zero")]
    ZeroEnrollment { states: usize },
}

/// Summed enrollment and mean demographics for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSummary {
    pub state: String,
    pub people: f64,
    /// Means in `Column::SUMMARY_MEANS` order.
    pub means: Vec<(PufColumn, f64)>,
}

impl StateSummary {
    pub fn mean(&self, column: PufColumn) -> Option<f64> {
        self.means
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
    }
}

/// A state's share of national enrollment, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentShare {
    pub state: String,
    pub people: f64,
    pub percentage: f64,
}

/// Handles the group-by reductions.
pub struct StateAggregator;

impl StateAggregator {
    /// Build a DataFrame with one column per schema column.
    pub fn records_frame(records: &[CleanedRecord]) -> Result<DataFrame, AggregateError> {
        let mut columns = Vec::with_capacity(PufColumn::ALL.len());
        let states: Vec<&str> = records.iter().map(|r| r.state.as_str()).collect();
        columns.push(Column::new(STATE.into(), states));

        for field in PufColumn::ALL.iter().filter(|c| c.is_numeric()) {
            let values: Vec<f64> = records
                .iter()
                .map(|r| r.value(*field).unwrap_or(0.0))
                .collect();
            columns.push(Column::new(field.label().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }

    fn state_groups(records: &[CleanedRecord]) -> Result<LazyGroupBy, AggregateError> {
        Ok(Self::records_frame(records)?
            .lazy()
            .filter(col(STATE).neq(lit(NATIONAL)))
            .group_by_stable([col(STATE)]))
    }

    /// Sum of people and mean of the age/sex/race columns per state.
    pub fn summarize(records: &[CleanedRecord]) -> Result<Vec<StateSummary>, AggregateError> {
        let mut aggs = vec![col(PEOPLE).sum()];
        aggs.extend(
            PufColumn::SUMMARY_MEANS
                .iter()
                .map(|c| col(c.label()).mean()),
        );

        let df = Self::state_groups(records)?.agg(aggs).collect()?;

        let states = df.column(STATE)?.str()?;
        let people = df.column(PEOPLE)?.f64()?;
        let mean_columns = PufColumn::SUMMARY_MEANS
            .iter()
            .map(|c| Ok((*c, df.column(c.label())?.f64()?)))
            .collect::<Result<Vec<_>, PolarsError>>()?;

        let summaries = (0..df.height())
            .map(|i| StateSummary {
                state: states.get(i).unwrap_or_default().to_string(),
                people: people.get(i).unwrap_or(0.0),
                means: mean_columns
                    .iter()
                    .map(|(c, ca)| (*c, ca.get(i).unwrap_or(0.0)))
                    .collect(),
            })
            .collect();

        Ok(summaries)
    }

    /// Enrollment percentage per state, sorted descending.
    ///
    /// Ties keep the order in which states first appear. No states yields an
    /// empty table; states with zero total enrollment are an error.
    pub fn enrollment_shares(
        records: &[CleanedRecord],
    ) -> Result<Vec<EnrollmentShare>, AggregateError> {
        let totals = Self::state_groups(records)?
            .agg([col(PEOPLE).sum()])
            .collect()?;

        if totals.height() == 0 {
            return Ok(Vec::new());
        }
        let total = totals.column(PEOPLE)?.f64()?.sum().unwrap_or(0.0);
        if total == 0.0 {
            return Err(AggregateError::ZeroEnrollment {
                states: totals.height(),
            });
        }
        debug!(states = totals.height(), total, "enrollment totals");

        let df = totals
            .lazy()
            .with_column((col(PEOPLE) / lit(total) * lit(100.0)).alias(PERCENT))
            .sort(
                [PERCENT],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        let states = df.column(STATE)?.str()?;
        let people = df.column(PEOPLE)?.f64()?;
        let percents = df.column(PERCENT)?.f64()?;

        Ok((0..df.height())
            .map(|i| EnrollmentShare {
                state: states.get(i).unwrap_or_default().to_string(),
                people: people.get(i).unwrap_or(0.0),
                percentage: percents.get(i).unwrap_or(0.0),
            })
            .collect())
    }

    /// Render the share table as aligned console text.
    pub fn format_share_table(shares: &[EnrollmentShare]) -> String {
        let state_w = shares
            .iter()
            .map(|s| s.state.len())
            .max()
            .unwrap_or(0)
            .max(STATE.len());
        let people: Vec<String> = shares.iter().map(|s| format_number(s.people)).collect();
        let people_w = people
            .iter()
            .map(|p| p.len())
            .max()
            .unwrap_or(0)
            .max(PEOPLE.len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<state_w$}  {:>people_w$}  {:>pct_w$}",
            STATE,
            PEOPLE,
            PERCENT,
            pct_w = PERCENT.len()
        );
        for (share, people) in shares.iter().zip(&people) {
            let _ = writeln!(
                out,
                "{:<state_w$}  {:>people_w$}  {:>pct_w$.6}",
                share.state,
                people,
                share.percentage,
                pct_w = PERCENT.len()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Percentages;

    fn record(state: &str, people: f64, white: f64) -> CleanedRecord {
        CleanedRecord {
            state: state.into(),
            people,
            people_ffs: 0.0,
            percents: Percentages {
                non_hispanic_white: white,
                ..Percentages::default()
            },
        }
    }

    #[test]
    fn shares_exclude_national_and_sort_descending() {
        let records = vec![
            record(NATIONAL, 1000.0, 0.0),
            record("NY", 400.0, 0.0),
            record("CA", 600.0, 0.0),
        ];
        let shares = StateAggregator::enrollment_shares(&records).unwrap();

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].state, "CA");
        assert!((shares[0].percentage - 60.0).abs() < 1e-9);
        assert_eq!(shares[1].state, "NY");
        assert!((shares[1].percentage - 40.0).abs() < 1e-9);
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let records: Vec<_> = ["AL", "AK", "AZ", "AR", "CA", "AL", "CA"]
            .iter()
            .zip([13.0, 7.0, 101.0, 3.5, 998.0, 2.0, 17.25])
            .map(|(s, p)| record(s, p, 0.0))
            .collect();
        let shares = StateAggregator::enrollment_shares(&records).unwrap();

        assert_eq!(shares.len(), 5);
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6);
        for pair in shares.windows(2) {
            assert!(pair[0].percentage >= pair[1].percentage);
        }
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let records = vec![
            record("WY", 10.0, 0.0),
            record("VT", 10.0, 0.0),
            record("TX", 30.0, 0.0),
            record("AK", 10.0, 0.0),
        ];
        let shares = StateAggregator::enrollment_shares(&records).unwrap();
        let order: Vec<&str> = shares.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(order, vec!["TX", "WY", "VT", "AK"]);
    }

    #[test]
    fn empty_and_zero_totals() {
        let only_national = vec![record(NATIONAL, 50.0, 0.0)];
        assert!(StateAggregator::enrollment_shares(&only_national)
            .unwrap()
            .is_empty());

        let zeros = vec![record("CA", 0.0, 0.0), record("NY", 0.0, 0.0)];
        let err = StateAggregator::enrollment_shares(&zeros).unwrap_err();
        assert!(matches!(err, AggregateError::ZeroEnrollment { states: 2 }));
    }

    #[test]
    fn summary_sums_people_and_averages_percentages() {
        let records = vec![
            record(NATIONAL, 1000.0, 50.0),
            record("CA", 100.0, 40.0),
            record("NY", 50.0, 80.0),
            record("CA", 300.0, 60.0),
        ];
        let summaries = StateAggregator::summarize(&records).unwrap();

        assert!(summaries.iter().all(|s| s.state != NATIONAL));
        assert_eq!(summaries.len(), 2);
        let ca = &summaries[0];
        assert_eq!(ca.state, "CA");
        assert_eq!(ca.people, 400.0);
        assert_eq!(ca.mean(PufColumn::NonHispanicWhite), Some(50.0));
        assert_eq!(ca.mean(PufColumn::Hispanic), Some(0.0));
        assert_eq!(ca.means.len(), 12);

        let total: f64 = summaries.iter().map(|s| s.people).sum();
        assert_eq!(total, 450.0);
    }

    #[test]
    fn share_table_is_aligned() {
        let shares = vec![
            EnrollmentShare {
                state: "CA".into(),
                people: 600.0,
                percentage: 60.0,
            },
            EnrollmentShare {
                state: "NY".into(),
                people: 400.0,
                percentage: 40.0,
            },
        ];
        let table = StateAggregator::format_share_table(&shares);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "State  Number of People  Enrollment Percentage");
        assert_eq!(lines[1], "CA                  600              60.000000");
        assert_eq!(lines[2], "NY                  400              40.000000");
    }
}
