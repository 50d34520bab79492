//! Extrapolation of year-indexed series forward in time.
//!
//! A series is extended one year at a time from its last known value: each synthesized year is the
//! previous year's value multiplied by the growth factor of a [`GrowthRule`]. Historical values are
//! never modified and a projection target inside the known range leaves the series as it is.
use crate::growth::GrowthRule;
use crate::year::{YearSeries, last_year};
use indexmap::IndexMap;
use log::debug;
use std::fmt::Display;
use std::hash::Hash;

/// A set of series keyed by category (e.g. economic sector or region)
pub type SeriesSet<K> = IndexMap<K, YearSeries>;

/// Extend `series` year by year up to and including `through_year`.
///
/// # Arguments
///
/// * `series` - Historical values. Must not be empty.
/// * `rule` - Growth rule used for each synthesized year
/// * `through_year` - The last year to include in the projection
///
/// # Returns
///
/// A new series containing the historical values plus one value for every year after the last
/// known year up to `through_year`.
pub fn project(series: &YearSeries, rule: &GrowthRule, through_year: u32) -> YearSeries {
    let mut projected = series.clone();
    let last = last_year(series).expect("Cannot project an empty series");
    let mut value = series[&last];
    for year in (last + 1)..=through_year {
        value *= rule.factor(year);
        projected.insert(year, value);
    }

    projected
}

/// As [`project`], but scale the value of a freshly synthesized final year by `accrual`.
///
/// This approximates the amount accrued in a year which is not yet over (e.g. `quarter / 4`). The
/// factor only applies to `through_year` and only when that year was synthesized.
pub fn project_with_accrual(
    series: &YearSeries,
    rule: &GrowthRule,
    through_year: u32,
    accrual: f64,
) -> YearSeries {
    let mut projected = project(series, rule, through_year);
    if series.contains_key(&through_year) {
        return projected;
    }

    if let Some(value) = projected.get_mut(&through_year) {
        *value *= accrual;
    }

    projected
}

/// Project every series in `set`, using the category's own growth rule if it has one.
///
/// # Arguments
///
/// * `set` - Historical values for each category
/// * `rules` - Growth rules for (some of) the categories
/// * `default_rule` - Rule for categories missing from `rules`
/// * `through_year` - The last year to include in the projection
/// * `accrual` - Partial-year factor for the final year (see [`project_with_accrual`])
pub fn project_set<K>(
    set: &SeriesSet<K>,
    rules: &IndexMap<K, GrowthRule>,
    default_rule: &GrowthRule,
    through_year: u32,
    accrual: f64,
) -> SeriesSet<K>
where
    K: Clone + Eq + Hash + Display,
{
    set.iter()
        .map(|(category, series)| {
            let rule = rules.get(category).unwrap_or_else(|| {
                debug!("No growth rule for {category}: using default");
                default_rule
            });
            let projected = project_with_accrual(series, rule, through_year, accrual);
            (category.clone(), projected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SectorID;
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use map_macro::btree_map;
    use rstest::{fixture, rstest};

    #[fixture]
    fn history() -> YearSeries {
        btree_map! {2020 => 118.2, 2021 => 124.8, 2022 => 130.1, 2023 => 135.7}
    }

    const TEN_PERCENT: GrowthRule = GrowthRule::Constant { rate: 10.0 };

    #[test]
    fn test_project_constant() {
        let projected = project(&btree_map! {2020 => 100.0}, &TEN_PERCENT, 2022);
        assert_eq!(projected.keys().copied().collect::<Vec<_>>(), [2020, 2021, 2022]);
        assert_approx_eq!(f64, projected[&2020], 100.0);
        assert_approx_eq!(f64, projected[&2021], 110.0, epsilon = 1e-9);
        assert_approx_eq!(f64, projected[&2022], 121.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(2019)]
    #[case(2021)]
    #[case(2023)]
    fn test_project_within_history_is_identity(history: YearSeries, #[case] through_year: u32) {
        assert_eq!(project(&history, &TEN_PERCENT, through_year), history);
    }

    #[rstest]
    #[case(0.5)]
    #[case(12.0)]
    #[case(25.0)]
    fn test_project_single_step(history: YearSeries, #[case] rate: f64) {
        let rule = GrowthRule::Constant { rate };
        let projected = project(&history, &rule, 2024);
        let expected = 135.7 * (1.0 + rate / 100.0);
        assert!((projected[&2024] - expected).abs() <= 1e-9 * expected);
    }

    #[rstest]
    fn test_project_is_idempotent(history: YearSeries) {
        let once = project(&history, &TEN_PERCENT, 2027);
        let twice = project(&once, &TEN_PERCENT, 2027);
        assert_eq!(once, twice);
    }

    #[rstest]
    fn test_project_ramp(history: YearSeries) {
        let rule = GrowthRule::Ramp {
            base_rate: 4.5,
            pivot_year: 2024,
            increment: 0.5,
        };
        let projected = project(&history, &rule, 2026);
        let y2024 = 135.7 * 1.045;
        let y2025 = y2024 * 1.05;
        let y2026 = y2025 * 1.055;
        assert_approx_eq!(f64, projected[&2024], y2024, epsilon = 1e-9);
        assert_approx_eq!(f64, projected[&2025], y2025, epsilon = 1e-9);
        assert_approx_eq!(f64, projected[&2026], y2026, epsilon = 1e-9);
    }

    #[rstest]
    fn test_project_does_not_touch_input(history: YearSeries) {
        let before = history.clone();
        let _ = project(&history, &TEN_PERCENT, 2030);
        assert_eq!(history, before);
    }

    #[test]
    fn test_project_with_accrual_scales_final_year_only() {
        let projected =
            project_with_accrual(&btree_map! {2023 => 100.0}, &TEN_PERCENT, 2025, 0.5);

        // 2024 is a complete year and is the base for 2025
        assert_approx_eq!(f64, projected[&2024], 110.0, epsilon = 1e-9);
        assert_approx_eq!(f64, projected[&2025], 121.0 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_project_with_accrual_leaves_history_alone() {
        let series = btree_map! {2022 => 80.0, 2023 => 100.0};
        assert_eq!(
            project_with_accrual(&series, &TEN_PERCENT, 2023, 0.25),
            series
        );
    }

    #[test]
    fn test_project_set_uses_default_rule() {
        let set: SeriesSet<SectorID> = indexmap! {
            "IT".into() => btree_map! {2023 => 100.0},
            "Retail".into() => btree_map! {2023 => 200.0},
        };
        let rules = indexmap! {SectorID::new("IT") => GrowthRule::Constant { rate: 25.0 }};
        let projected = project_set(&set, &rules, &TEN_PERCENT, 2024, 1.0);

        // Order of categories is preserved
        assert_eq!(
            projected.keys().map(ToString::to_string).collect::<Vec<_>>(),
            ["IT", "Retail"]
        );
        assert_approx_eq!(f64, projected["IT"][&2024], 125.0, epsilon = 1e-9);
        assert_approx_eq!(f64, projected["Retail"][&2024], 220.0, epsilon = 1e-9);
    }
}
