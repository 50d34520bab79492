//! Investment activity of individual regions.
use crate::growth::GrowthRule;
use crate::id::RegionID;
use crate::projection::project;
use crate::year::YearSeries;
use serde::Serialize;

/// The year to which the base investment figures of [`RegionProfile`]s refer
pub const REGION_BASE_YEAR: u32 = 2023;

/// The investment profile of a region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfile {
    /// The region's name
    pub region: RegionID,
    /// Investment in [`REGION_BASE_YEAR`] (billion roubles)
    pub base: f64,
    /// Annual growth of investment (%)
    pub growth: f64,
    /// Share of investment going to the IT sector (0-1)
    pub it_share: f64,
}

/// Estimated investment in a region for a given year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalInvestment {
    /// The region's name
    pub region: RegionID,
    /// Total investment, rounded to the nearest whole number
    pub investment: f64,
    /// Investment in the IT sector, rounded to the nearest whole number
    pub it_investment: f64,
    /// Annual growth of investment (%)
    pub growth: f64,
}

/// Estimate investment for each region in `year`, by compounding growth from the base year.
///
/// Figures are rounded half-to-even. IT investment is calculated from the unrounded total.
pub fn regional_investments(profiles: &[RegionProfile], year: u32) -> Vec<RegionalInvestment> {
    profiles
        .iter()
        .map(|profile| {
            let rule = GrowthRule::Constant {
                rate: profile.growth,
            };
            let base = YearSeries::from([(REGION_BASE_YEAR, profile.base)]);
            let investment = project(&base, &rule, year)[&year.max(REGION_BASE_YEAR)];

            RegionalInvestment {
                region: profile.region.clone(),
                investment: investment.round_ties_even(),
                it_investment: (investment * profile.it_share).round_ties_even(),
                growth: profile.growth,
            }
        })
        .collect()
}

/// The region with the most investment (the first such region in the case of a tie)
pub fn investment_leader(investments: &[RegionalInvestment]) -> Option<&RegionalInvestment> {
    investments.iter().reduce(|leader, candidate| {
        if candidate.investment > leader.investment {
            candidate
        } else {
            leader
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::region_profiles;
    use rstest::{fixture, rstest};

    #[fixture]
    fn profiles() -> Vec<RegionProfile> {
        vec![
            RegionProfile {
                region: "North".into(),
                base: 1000.0,
                growth: 10.0,
                it_share: 0.25,
            },
            RegionProfile {
                region: "South".into(),
                base: 500.0,
                growth: 5.0,
                it_share: 0.5,
            },
        ]
    }

    #[rstest]
    #[case(2023, [1000.0, 500.0], [250.0, 250.0])]
    #[case(2024, [1100.0, 525.0], [275.0, 262.0])] // 262.5 rounds to even
    #[case(2025, [1210.0, 551.0], [302.0, 276.0])] // 302.5 also rounds to even
    fn test_regional_investments(
        profiles: Vec<RegionProfile>,
        #[case] year: u32,
        #[case] investment: [f64; 2],
        #[case] it_investment: [f64; 2],
    ) {
        let result = regional_investments(&profiles, year);
        assert_eq!(
            result.iter().map(|r| r.investment).collect::<Vec<_>>(),
            investment
        );
        assert_eq!(
            result.iter().map(|r| r.it_investment).collect::<Vec<_>>(),
            it_investment
        );
        assert_eq!(result[1].growth, 5.0);
    }

    #[rstest]
    fn test_years_before_base_year_use_base(profiles: Vec<RegionProfile>) {
        let result = regional_investments(&profiles, 2020);
        assert_eq!(result[0].investment, 1000.0);
    }

    #[test]
    fn test_investment_leader() {
        let investments = regional_investments(&region_profiles(), 2026);
        let leader = investment_leader(&investments).unwrap();
        assert_eq!(leader.region, RegionID::new("Москва"));

        assert!(investment_leader(&[]).is_none());
    }

    #[test]
    fn test_investment_leader_tie_goes_to_first() {
        let investments = regional_investments(
            &[
                RegionProfile {
                    region: "A".into(),
                    base: 100.0,
                    growth: 0.0,
                    it_share: 0.0,
                },
                RegionProfile {
                    region: "B".into(),
                    base: 100.0,
                    growth: 0.0,
                    it_share: 0.0,
                },
            ],
            2024,
        );
        assert_eq!(
            investment_leader(&investments).unwrap().region,
            RegionID::new("A")
        );
    }
}
