//! Code for working with years and the date a report is produced for.
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, Local};
use std::collections::BTreeMap;
use std::fmt;

/// The number of reporting periods (quarters) in a year
pub const QUARTERS_PER_YEAR: u32 = 4;

/// A metric indexed by year, in ascending year order
pub type YearSeries = BTreeMap<u32, f64>;

/// Get the last (i.e. most recent) year in the series, if any
pub fn last_year(series: &YearSeries) -> Option<u32> {
    series.keys().next_back().copied()
}

/// The point in time a report is produced for.
///
/// Projections never read the wall clock themselves: callers build one of these and pass it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDate {
    /// The calendar year
    pub year: u32,
    /// The quarter of the year (1-4)
    pub quarter: u32,
}

impl ReportDate {
    /// Create a new [`ReportDate`], checking that the quarter is valid
    pub fn new(year: u32, quarter: u32) -> Result<Self> {
        ensure!(
            (1..=QUARTERS_PER_YEAR).contains(&quarter),
            "Quarter must be between 1 and {QUARTERS_PER_YEAR}, got {quarter}"
        );

        Ok(Self { year, quarter })
    }

    /// The report date for the quarter containing the given calendar date
    pub fn from_date<D: Datelike>(date: &D) -> Result<Self> {
        let year = u32::try_from(date.year()).context("Dates before year 0 are not supported")?;
        Self::new(year, date.month0() / 3 + 1)
    }

    /// The report date for today, according to the local clock
    pub fn today() -> Result<Self> {
        Self::from_date(&Local::now().date_naive())
    }

    /// The fraction of the year which has elapsed by the end of the current quarter
    pub fn accrual_factor(&self) -> f64 {
        f64::from(self.quarter) / f64::from(QUARTERS_PER_YEAR)
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}
