//! Built-in data sets, plus loading of live replacements for them where available.
//!
//! Live data is always optional: if it cannot be fetched or doesn't make sense, the built-in
//! values are used instead (see [`fetch::load_or_fallback`]).
use crate::growth::GrowthRule;
use crate::id::SectorID;
use crate::network::InvestmentEdge;
use crate::projection::SeriesSet;
use crate::regional::RegionProfile;
use crate::settings::SourceSettings;
use crate::year::YearSeries;
use indexmap::IndexMap;
use serde::Deserialize;

pub mod fetch;
use fetch::{FetchError, Fetcher, Sourced, fetch_json, load_or_fallback};

/// Growth rule for the number of internet users
pub const INTERNET_USERS_GROWTH: GrowthRule = GrowthRule::Ramp {
    base_rate: 4.5,
    pivot_year: 2024,
    increment: 0.5,
};

/// Growth rule for average income
pub const INCOME_GROWTH: GrowthRule = GrowthRule::Ramp {
    base_rate: 3.2,
    pivot_year: 2024,
    increment: 0.3,
};

/// Sector investment history (billion roubles) and the annual growth (%) expected for each sector
const SECTORS: [(&str, [(u32, f64); 4], f64); 8] = [
    (
        "IT и технологии",
        [(2020, 312.0), (2021, 458.0), (2022, 623.0), (2023, 892.0)],
        25.0,
    ),
    (
        "Финансы и банкинг",
        [(2020, 234.0), (2021, 298.0), (2022, 345.0), (2023, 412.0)],
        15.0,
    ),
    (
        "Энергетика",
        [(2020, 412.0), (2021, 378.0), (2022, 456.0), (2023, 512.0)],
        8.0,
    ),
    (
        "Электронная коммерция",
        [(2020, 189.0), (2021, 267.0), (2022, 389.0), (2023, 567.0)],
        22.0,
    ),
    (
        "Телекоммуникации",
        [(2020, 278.0), (2021, 312.0), (2022, 356.0), (2023, 412.0)],
        12.0,
    ),
    (
        "Недвижимость",
        [(2020, 478.0), (2021, 512.0), (2022, 456.0), (2023, 523.0)],
        6.0,
    ),
    (
        "Транспорт и логистика",
        [(2020, 178.0), (2021, 201.0), (2022, 234.0), (2023, 278.0)],
        10.0,
    ),
    (
        "Медицина и фарма",
        [(2020, 156.0), (2021, 234.0), (2022, 312.0), (2023, 456.0)],
        18.0,
    ),
];

/// The sector reported on separately in the summary
pub const IT_SECTOR: &str = "IT и технологии";

/// Region, investment in the base year (billion roubles), annual growth (%) and IT share
const REGIONS: [(&str, f64, f64, f64); 10] = [
    ("Москва", 1890.0, 12.5, 0.35),
    ("Санкт-Петербург", 980.0, 11.2, 0.28),
    ("Московская область", 720.0, 10.8, 0.22),
    ("Татарстан", 620.0, 9.8, 0.25),
    ("Краснодарский край", 530.0, 9.5, 0.18),
    ("Новосибирская область", 480.0, 11.5, 0.32),
    ("Свердловская область", 430.0, 8.9, 0.20),
    ("Ленинградская область", 390.0, 10.2, 0.15),
    ("Башкортостан", 350.0, 8.5, 0.17),
    ("Красноярский край", 310.0, 7.8, 0.14),
];

/// Investments between countries (billion dollars)
const INVESTMENTS: [(&str, &str, f64, &str); 23] = [
    ("США", "Китай", 150.0, "Технологии"),
    ("США", "Германия", 80.0, "Автомобили"),
    ("США", "Япония", 60.0, "Электроника"),
    ("США", "Великобритания", 45.0, "Финансы"),
    ("США", "Канада", 30.0, "Энергетика"),
    ("Китай", "США", 120.0, "Технологии"),
    ("Китай", "Германия", 50.0, "Производство"),
    ("Китай", "Япония", 40.0, "Электроника"),
    ("Китай", "Австралия", 25.0, "Сырье"),
    ("Германия", "США", 70.0, "Автомобили"),
    ("Германия", "Франция", 35.0, "Люкс товары"),
    ("Германия", "Польша", 20.0, "Производство"),
    ("Япония", "США", 65.0, "Автомобили"),
    ("Япония", "Китай", 45.0, "Технологии"),
    ("Япония", "Южная Корея", 30.0, "Электроника"),
    ("Великобритания", "США", 55.0, "Финансы"),
    ("Великобритания", "Германия", 25.0, "Финансы"),
    ("Франция", "Германия", 30.0, "Люкс товары"),
    ("Франция", "Италия", 15.0, "Мода"),
    ("Нидерланды", "США", 40.0, "Технологии"),
    ("Швейцария", "США", 35.0, "Фармацевтика"),
    ("Канада", "США", 25.0, "Энергетика"),
    ("Сингапур", "Китай", 20.0, "Финансы"),
];

/// Historical values of the headline indicators
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndicatorHistory {
    /// Internet users (million people)
    pub internet_users: YearSeries,
    /// Average income (thousand roubles per month)
    pub income: YearSeries,
}

impl IndicatorHistory {
    /// Built-in values for the headline indicators
    pub fn fallback() -> Self {
        Self {
            internet_users: YearSeries::from([
                (2020, 118.2),
                (2021, 124.8),
                (2022, 130.1),
                (2023, 135.7),
            ]),
            income: YearSeries::from([(2020, 44.1), (2021, 47.8), (2022, 52.4), (2023, 58.9)]),
        }
    }

    /// Check that there is at least one value for each indicator
    fn validate(self) -> Result<Self, FetchError> {
        if self.internet_users.is_empty() || self.income.is_empty() {
            return Err(FetchError::MalformedPayload(
                "indicator series cannot be empty".into(),
            ));
        }

        Ok(self)
    }
}

/// Built-in history of investment by sector
pub fn sector_investments() -> SeriesSet<SectorID> {
    SECTORS
        .iter()
        .map(|(sector, history, _)| ((*sector).into(), YearSeries::from(*history)))
        .collect()
}

/// Expected growth for each sector
pub fn sector_growth_rules() -> IndexMap<SectorID, GrowthRule> {
    SECTORS
        .iter()
        .map(|(sector, _, rate)| ((*sector).into(), GrowthRule::Constant { rate: *rate }))
        .collect()
}

/// Built-in investment profiles for regions
pub fn region_profiles() -> Vec<RegionProfile> {
    REGIONS
        .iter()
        .map(|&(region, base, growth, it_share)| RegionProfile {
            region: region.into(),
            base,
            growth,
            it_share,
        })
        .collect()
}

/// A sample set of investments between countries
pub fn sample_investment_edges() -> Vec<InvestmentEdge> {
    INVESTMENTS
        .iter()
        .map(|&(source, target, amount, sector)| InvestmentEdge {
            source_country: source.into(),
            target_country: target.into(),
            investment_amount: amount,
            sector: sector.into(),
        })
        .collect()
}

/// Supplies the data sets, preferring live data where a source is configured
pub struct DataProvider<'a> {
    fetcher: Option<&'a dyn Fetcher>,
    sources: &'a SourceSettings,
}

impl<'a> DataProvider<'a> {
    /// Create a new [`DataProvider`].
    ///
    /// If `fetcher` is `None`, no network requests are made and built-in data is always used.
    pub fn new(fetcher: Option<&'a dyn Fetcher>, sources: &'a SourceSettings) -> Self {
        Self { fetcher, sources }
    }

    /// Try to fetch a JSON document from `url` (if both a fetcher and a URL are available)
    fn fetch<T>(&self, url: Option<&str>) -> Option<Result<T, FetchError>>
    where
        T: serde::de::DeserializeOwned,
    {
        let fetcher = self.fetcher?;
        let url = url.filter(|url| !url.is_empty())?;
        Some(fetch_json(fetcher, url))
    }

    /// Historical values for the headline indicators
    pub fn indicators(&self) -> Sourced<IndicatorHistory> {
        let fetched = self
            .fetch::<IndicatorHistory>(self.sources.indicators_url.as_deref())
            .map(|result| result.and_then(IndicatorHistory::validate));
        load_or_fallback("indicators", fetched, IndicatorHistory::fallback)
    }

    /// History of investment by sector
    pub fn sector_investments(&self) -> Sourced<SeriesSet<SectorID>> {
        let fetched = self
            .fetch::<SeriesSet<SectorID>>(self.sources.investments_url.as_deref())
            .map(|result| result.and_then(validate_series_set));
        load_or_fallback("sector investments", fetched, sector_investments)
    }
}

/// Check that a fetched set of series has at least one category and no empty series
fn validate_series_set(set: SeriesSet<SectorID>) -> Result<SeriesSet<SectorID>, FetchError> {
    if set.is_empty() {
        return Err(FetchError::MalformedPayload("no sectors found".into()));
    }
    if let Some((sector, _)) = set.iter().find(|(_, series)| series.is_empty()) {
        return Err(FetchError::MalformedPayload(format!(
            "no values for sector {sector}"
        )));
    }

    Ok(set)
}
