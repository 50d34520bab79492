//! Module for building and analysing the network of investment flows between countries.
//!
//! Each investment is an arc from the investing country to the receiving country. The network
//! holds at most one arc per ordered pair of countries: when the same pair appears more than once
//! in the input, the last occurrence replaces the earlier one rather than being added to it.
use crate::id::{CountryID, SectorID};
use indexmap::IndexMap;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// The default threshold below which investments are left out of the network
pub const DEFAULT_MIN_INVESTMENT: f64 = 20.0;

/// A single investment from one country into another
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvestmentEdge {
    /// The investing country
    pub source_country: CountryID,
    /// The country receiving the investment
    pub target_country: CountryID,
    /// Amount invested (non-negative)
    pub investment_amount: f64,
    /// The economic sector being invested in
    pub sector: SectorID,
}

/// An arc in the investment graph
#[derive(Debug, Clone, PartialEq)]
struct Flow {
    amount: f64,
    sector: SectorID,
}

/// Aggregate flows into and out of a single country
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CountryStats {
    /// Total invested by this country in others
    pub out_investment: f64,
    /// Total invested in this country by others
    pub in_investment: f64,
    /// `out_investment - in_investment`
    pub net_flow: f64,
    /// Number of countries this country invests in
    pub out_degree: usize,
    /// Number of countries investing in this country
    pub in_degree: usize,
}

/// Per-country statistics, in the order countries were first added to the network
pub type CountryStatsMap = IndexMap<CountryID, CountryStats>;

/// One of the arcs of the network, as reported by [`InvestmentNetwork::largest_flows`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSummary {
    /// The investing country
    pub source_country: CountryID,
    /// The country receiving the investment
    pub target_country: CountryID,
    /// Amount invested
    pub investment_amount: f64,
    /// The economic sector being invested in
    pub sector: SectorID,
}

/// A directed, weighted graph of investments between countries
pub struct InvestmentNetwork {
    graph: DiGraph<CountryID, Flow>,
}

impl InvestmentNetwork {
    /// Build the network from the investments which are at least `min_investment`.
    ///
    /// An amount or threshold which is NaN never compares as at least the other, so a NaN threshold
    /// gives an empty network.
    ///
    /// Countries are added to the network the first time they are encountered, so a country only
    /// appears if it takes part in at least one retained investment.
    pub fn build<'a, I>(edges: I, min_investment: f64) -> Self
    where
        I: IntoIterator<Item = &'a InvestmentEdge>,
    {
        let mut graph = DiGraph::new();
        let mut country_to_node_index: IndexMap<CountryID, NodeIndex> = IndexMap::new();

        for edge in edges {
            // NaN amounts or thresholds never satisfy this, so such investments are skipped
            let retained = edge.investment_amount >= min_investment;
            if !retained {
                debug!(
                    "Skipping investment {} -> {} ({}): below threshold of {min_investment}",
                    edge.source_country, edge.target_country, edge.investment_amount
                );
                continue;
            }

            let source_node = *country_to_node_index
                .entry(edge.source_country.clone())
                .or_insert_with(|| graph.add_node(edge.source_country.clone()));
            let target_node = *country_to_node_index
                .entry(edge.target_country.clone())
                .or_insert_with(|| graph.add_node(edge.target_country.clone()));

            // Replaces the weight of any existing arc between the same pair
            graph.update_edge(
                source_node,
                target_node,
                Flow {
                    amount: edge.investment_amount,
                    sector: edge.sector.clone(),
                },
            );
        }

        Self { graph }
    }

    /// The number of countries in the network
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of distinct (source, target) investment pairs in the network
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Calculate the in/out flows for every country in the network.
    ///
    /// Amounts are summed in the order in which arcs were added.
    pub fn country_stats(&self) -> CountryStatsMap {
        let mut stats = vec![CountryStats::default(); self.graph.node_count()];
        for edge in self.graph.edge_references() {
            let amount = edge.weight().amount;

            let source = &mut stats[edge.source().index()];
            source.out_investment += amount;
            source.out_degree += 1;

            let target = &mut stats[edge.target().index()];
            target.in_investment += amount;
            target.in_degree += 1;
        }

        self.graph
            .node_indices()
            .zip(stats)
            .map(|(node, mut stats)| {
                stats.net_flow = stats.out_investment - stats.in_investment;
                (self.graph[node].clone(), stats)
            })
            .collect()
    }

    /// The `k` countries with the largest outgoing investment, largest first.
    ///
    /// Countries with equal outgoing investment are listed in the order they joined the network.
    pub fn top_investors(&self, k: usize) -> Vec<(CountryID, CountryStats)> {
        top_investors(&self.country_stats(), k)
    }

    /// The `k` largest investments in the network, largest first.
    ///
    /// Equal investments are listed in the order the (source, target) pair was first added.
    pub fn largest_flows(&self, k: usize) -> Vec<FlowSummary> {
        let mut flows: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| FlowSummary {
                source_country: self.graph[edge.source()].clone(),
                target_country: self.graph[edge.target()].clone(),
                investment_amount: edge.weight().amount,
                sector: edge.weight().sector.clone(),
            })
            .collect();

        // NB: sort_by is stable, which preserves insertion order for ties
        flows.sort_by(|a, b| b.investment_amount.total_cmp(&a.investment_amount));
        flows.truncate(k);

        flows
    }
}

/// Select the `k` countries with the largest outgoing investment from already computed stats
pub fn top_investors(stats: &CountryStatsMap, k: usize) -> Vec<(CountryID, CountryStats)> {
    let mut ranked: Vec<_> = stats.iter().map(|(id, s)| (id.clone(), *s)).collect();
    ranked.sort_by(|(_, a), (_, b)| b.out_investment.total_cmp(&a.out_investment));
    ranked.truncate(k);

    ranked
}

/// Build a network from `edges` and compute the statistics for every country in it
pub fn build_and_aggregate(edges: &[InvestmentEdge], min_investment: f64) -> CountryStatsMap {
    InvestmentNetwork::build(edges, min_investment).country_stats()
}
