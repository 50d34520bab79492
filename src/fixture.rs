//! Fixtures for tests

use crate::dataset::{IndicatorHistory, region_profiles, sector_investments};
use crate::id::SectorID;
use crate::projection::SeriesSet;
use crate::regional::RegionProfile;
use crate::year::ReportDate;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn report_date() -> ReportDate {
    ReportDate {
        year: 2026,
        quarter: 2,
    }
}

#[fixture]
pub fn indicators() -> IndicatorHistory {
    IndicatorHistory::fallback()
}

#[fixture]
pub fn sector_history() -> SeriesSet<SectorID> {
    sector_investments()
}

#[fixture]
pub fn profiles() -> Vec<RegionProfile> {
    region_profiles()
}
