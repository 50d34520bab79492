//! Growth rules describe how fast a metric grows from one year to the next.
use serde::{Deserialize, Serialize};

/// The growth rule applied to categories which don't have one of their own
pub const DEFAULT_GROWTH_RULE: GrowthRule = GrowthRule::Constant { rate: 10.0 };

/// A function mapping a year to an annual growth rate, expressed as a percentage.
///
/// In TOML, a constant rule is written as `{ rate = 25.0 }` and a ramp as
/// `{ base_rate = 4.5, pivot_year = 2024, increment = 0.5 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrowthRule {
    /// The same percentage every year
    Constant {
        /// Annual growth (%)
        rate: f64,
    },
    /// A percentage which increases linearly with each year past `pivot_year`
    Ramp {
        /// Annual growth in the pivot year (%)
        base_rate: f64,
        /// The year in which growth is equal to `base_rate`
        pivot_year: u32,
        /// Change in the growth rate per year (percentage points)
        increment: f64,
    },
}

impl GrowthRule {
    /// The growth rate for the given year, as a percentage
    pub fn rate(&self, year: u32) -> f64 {
        match *self {
            Self::Constant { rate } => rate,
            Self::Ramp {
                base_rate,
                pivot_year,
                increment,
            } => base_rate + (f64::from(year) - f64::from(pivot_year)) * increment,
        }
    }

    /// The multiplier taking the previous year's value to this year's
    pub fn factor(&self, year: u32) -> f64 {
        1.0 + self.rate(year) / 100.0
    }
}

impl Default for GrowthRule {
    fn default() -> Self {
        DEFAULT_GROWTH_RULE
    }
}
