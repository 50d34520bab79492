//! Assembly of the reports produced by the program and their console summaries.
use crate::dataset::{
    INCOME_GROWTH, INTERNET_USERS_GROWTH, IT_SECTOR, IndicatorHistory, sector_growth_rules,
};
use crate::growth::DEFAULT_GROWTH_RULE;
use crate::id::SectorID;
use crate::network::InvestmentNetwork;
use crate::projection::{SeriesSet, project, project_set};
use crate::regional::{RegionProfile, RegionalInvestment, investment_leader, regional_investments};
use crate::year::{ReportDate, YearSeries};

/// Economic indicators projected up to the report date
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// The period the dashboard describes
    pub date: ReportDate,
    /// Internet users (million people)
    pub internet_users: YearSeries,
    /// Average income (thousand roubles per month)
    pub income: YearSeries,
    /// Investment by sector (billion roubles)
    pub sector_investments: SeriesSet<SectorID>,
    /// Investment by region in the report year (billion roubles)
    pub regional_investments: Vec<RegionalInvestment>,
}

impl Dashboard {
    /// Project the historical data up to `date`.
    ///
    /// Sector investment for an incomplete year only includes the quarters elapsed so far.
    pub fn build(
        indicators: &IndicatorHistory,
        sector_history: &SeriesSet<SectorID>,
        profiles: &[RegionProfile],
        date: ReportDate,
    ) -> Self {
        Self {
            date,
            internet_users: project(&indicators.internet_users, &INTERNET_USERS_GROWTH, date.year),
            income: project(&indicators.income, &INCOME_GROWTH, date.year),
            sector_investments: project_set(
                sector_history,
                &sector_growth_rules(),
                &DEFAULT_GROWTH_RULE,
                date.year,
                date.accrual_factor(),
            ),
            regional_investments: regional_investments(profiles, date.year),
        }
    }

    /// Lines of text summarising the headline figures for the report year
    pub fn summary_lines(&self) -> Vec<String> {
        let year = self.date.year;
        let it_investment = self
            .sector_investments
            .get(IT_SECTOR)
            .and_then(|series| series.get(&year))
            .copied()
            .unwrap_or(0.0);

        let mut lines = vec![
            format!("Statistics for {year} (as of {}):", self.date),
            format!(
                "Internet users: {} million people",
                format_value(self.internet_users.get(&year), 1)
            ),
            format!(
                "Average income: {} thousand roubles per month",
                format_value(self.income.get(&year), 1)
            ),
            format!("IT investment: {it_investment:.0} billion roubles"),
        ];
        if let Some(leader) = investment_leader(&self.regional_investments) {
            lines.push(format!("Investment leader: {}", leader.region));
        }

        lines
    }
}

/// Format an optional value to the given number of decimal places
fn format_value(value: Option<&f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| format!("{value:.precision$}"))
}

/// Lines of text summarising the investment network
///
/// # Arguments
///
/// * `network` - The investment network
/// * `top_count` - How many countries and flows to list
pub fn network_summary_lines(network: &InvestmentNetwork, top_count: usize) -> Vec<String> {
    let mut lines = vec![format!("Top {top_count} countries by outgoing investment:")];
    for (i, (country, stats)) in network.top_investors(top_count).iter().enumerate() {
        lines.push(format!("{}. {country}: ${} bn", i + 1, stats.out_investment));
    }

    lines.push(format!("Countries in network: {}", network.node_count()));
    lines.push(format!("Investment links: {}", network.edge_count()));

    lines.push("Largest investment flows:".to_string());
    for (i, flow) in network.largest_flows(top_count).iter().enumerate() {
        lines.push(format!(
            "{}. {} → {}: ${} bn ({})",
            i + 1,
            flow.source_country,
            flow.target_country,
            flow.investment_amount,
            flow.sector
        ));
    }

    lines
}
