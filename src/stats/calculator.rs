//! Statistics Calculator Module
//! Descriptive statistics over enrollment shares and year-over-year race
//! trend changes.

use crate::data::{RaceColumn, YearlyRaceTable};
use crate::stats::EnrollmentShare;
use serde::Serialize;
use statrs::statistics::{Data, Distribution, Max, Median, Min};

/// Descriptive statistics of the state enrollment percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareDistribution {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` with fewer than two states.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// First-to-last year movement of one race category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceTrend {
    pub race: RaceColumn,
    pub first_year: String,
    pub first: f64,
    pub last_year: String,
    pub last: f64,
}

impl RaceTrend {
    pub fn change(&self) -> f64 {
        self.last - self.first
    }
}

/// Handles summary statistics for the report.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Distribution of enrollment percentages; `None` for an empty table.
    pub fn share_distribution(shares: &[EnrollmentShare]) -> Option<ShareDistribution> {
        if shares.is_empty() {
            return None;
        }

        let data = Data::new(shares.iter().map(|s| s.percentage).collect::<Vec<f64>>());
        let std_dev = if shares.len() > 1 {
            data.std_dev()
        } else {
            None
        };

        Some(ShareDistribution {
            count: shares.len(),
            mean: data.mean().unwrap_or(f64::NAN),
            median: data.median(),
            std_dev,
            min: data.min(),
            max: data.max(),
        })
    }

    /// Change between the first and last year each race category appears in.
    pub fn race_trends(table: &YearlyRaceTable) -> Vec<RaceTrend> {
        RaceColumn::ALL
            .iter()
            .filter_map(|&race| {
                let series = table.series(race);
                let (first_idx, first) = *series.first()?;
                let (last_idx, last) = *series.last()?;
                Some(RaceTrend {
                    race,
                    first_year: table.rows[first_idx].year.clone(),
                    first,
                    last_year: table.rows[last_idx].year.clone(),
                    last,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::YearlyRaceRow;
    use std::collections::BTreeMap;

    fn share(state: &str, percentage: f64) -> EnrollmentShare {
        EnrollmentShare {
            state: state.into(),
            people: percentage,
            percentage,
        }
    }

    #[test]
    fn distribution_of_shares() {
        let shares = vec![share("CA", 50.0), share("NY", 30.0), share("TX", 20.0)];
        let dist = StatsCalculator::share_distribution(&shares).unwrap();

        assert_eq!(dist.count, 3);
        assert!((dist.mean - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(dist.median, 30.0);
        assert_eq!(dist.min, 20.0);
        assert_eq!(dist.max, 50.0);
        let expected_std = (((50.0 - 100.0 / 3.0) as f64).powi(2)
            + ((30.0 - 100.0 / 3.0) as f64).powi(2)
            + ((20.0 - 100.0 / 3.0) as f64).powi(2))
            / 2.0;
        assert!((dist.std_dev.unwrap() - expected_std.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn distribution_edge_cases() {
        assert!(StatsCalculator::share_distribution(&[]).is_none());
        let single = StatsCalculator::share_distribution(&[share("CA", 100.0)]).unwrap();
        assert_eq!(single.std_dev, None);
        assert_eq!(single.median, 100.0);
    }

    #[test]
    fn trends_use_first_and_last_year_present() {
        let row = |year: &str, values: &[(RaceColumn, f64)]| YearlyRaceRow {
            year: year.into(),
            values: values.iter().copied().collect::<BTreeMap<_, _>>(),
        };
        let table = YearlyRaceTable {
            rows: vec![
                row("2006", &[(RaceColumn::Hispanic, 10.0)]),
                row(
                    "2007",
                    &[(RaceColumn::Hispanic, 12.0), (RaceColumn::AfricanAmerican, 20.0)],
                ),
                row("2008", &[(RaceColumn::AfricanAmerican, 18.5)]),
            ],
            skipped: vec![],
        };

        let trends = StatsCalculator::race_trends(&table);
        assert_eq!(trends.len(), 2);

        let black = &trends[0];
        assert_eq!(black.race, RaceColumn::AfricanAmerican);
        assert_eq!((black.first_year.as_str(), black.last_year.as_str()), ("2007", "2008"));
        assert!((black.change() + 1.5).abs() < 1e-9);

        let hispanic = &trends[1];
        assert_eq!(hispanic.race, RaceColumn::Hispanic);
        assert!((hispanic.change() - 2.0).abs() < 1e-9);
    }
}
