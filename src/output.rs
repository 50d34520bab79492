//! The module responsible for writing output data to disk.
//!
//! Each table is written as a CSV file, ready to be plotted by an external charting tool.
use crate::id::{CountryID, SectorID};
use crate::log::{LOG_ERROR_FILE_NAME, LOG_INFO_FILE_NAME};
use crate::network::{CountryStatsMap, FlowSummary};
use crate::projection::SeriesSet;
use crate::regional::RegionalInvestment;
use crate::year::YearSeries;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use metadata::METADATA_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "ecostat_results";

/// The output file name for the number of internet users
pub const INTERNET_USERS_FILE_NAME: &str = "internet_users.csv";

/// The output file name for average income
pub const INCOME_FILE_NAME: &str = "income.csv";

/// The output file name for investment by sector
const SECTOR_INVESTMENTS_FILE_NAME: &str = "sector_investments.csv";

/// The output file name for investment by region
const REGIONAL_INVESTMENTS_FILE_NAME: &str = "regional_investments.csv";

/// The output file name for per-country investment statistics
const COUNTRY_STATS_FILE_NAME: &str = "country_stats.csv";

/// The output file name for the largest investment flows
const LARGEST_FLOWS_FILE_NAME: &str = "largest_flows.csv";

/// Get the default output folder for the named report
pub fn get_output_dir(report_name: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, report_name].iter().collect()
}

/// The names of all the files the program writes to an output folder
const OUTPUT_FILE_NAMES: [&str; 9] = [
    INTERNET_USERS_FILE_NAME,
    INCOME_FILE_NAME,
    SECTOR_INVESTMENTS_FILE_NAME,
    REGIONAL_INVESTMENTS_FILE_NAME,
    COUNTRY_STATS_FILE_NAME,
    LARGEST_FLOWS_FILE_NAME,
    METADATA_FILE_NAME,
    LOG_INFO_FILE_NAME,
    LOG_ERROR_FILE_NAME,
];

/// Create a new output directory, if it doesn't already exist.
///
/// If the directory exists and contains files, it is only reused if `allow_overwrite` is true and
/// every entry in it is a file the program writes. Those files are then deleted; the folder itself
/// is kept.
///
/// # Returns
///
/// True if an existing folder with files in it is being overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let Ok(entries) = fs::read_dir(output_dir) else {
        // Try to create the directory, with parents
        fs::create_dir_all(output_dir)?;
        return Ok(false);
    };

    let entries: Vec<_> = entries.try_collect()?;
    if entries.is_empty() {
        // Folder exists and is empty: nothing to do
        return Ok(false);
    }

    ensure!(
        allow_overwrite,
        "Output folder already exists and is not empty. Please delete the folder or pass \
         the --overwrite command-line option."
    );

    for entry in &entries {
        let name = entry.file_name();
        ensure!(
            entry.file_type()?.is_file()
                && name.to_str().is_some_and(|name| OUTPUT_FILE_NAMES.contains(&name)),
            "Output folder contains {}, which was not written by this program. Refusing to \
             overwrite it.",
            name.to_string_lossy()
        );
    }
    for entry in entries {
        fs::remove_file(entry.path())?;
    }

    Ok(true)
}

/// A row in a CSV file for a single series
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SeriesRow {
    year: u32,
    value: f64,
}

/// A row in the sector investments CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SectorRow {
    sector: SectorID,
    year: u32,
    value: f64,
}

/// A row in the country stats CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CountryStatsRow {
    country: CountryID,
    out_investment: f64,
    in_investment: f64,
    net_flow: f64,
    out_degree: usize,
    in_degree: usize,
}

/// An object for writing tables to the output folder
pub struct DataWriter {
    output_path: PathBuf,
}

impl DataWriter {
    /// Create a writer for the given output folder, which must already exist
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
        }
    }

    /// Write the given rows to a CSV file in the output folder
    fn write_rows<T, I>(&self, file_name: &str, rows: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let file_path = self.output_path.join(file_name);
        let mut writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("Could not create {}", file_path.display()))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write a single series to a CSV file
    pub fn write_series(&self, file_name: &str, series: &YearSeries) -> Result<()> {
        self.write_rows(
            file_name,
            series
                .iter()
                .map(|(&year, &value)| SeriesRow { year, value }),
        )
    }

    /// Write investment by sector to a CSV file
    pub fn write_sector_investments(&self, investments: &SeriesSet<SectorID>) -> Result<()> {
        let rows = investments.iter().flat_map(|(sector, series)| {
            series.iter().map(|(&year, &value)| SectorRow {
                sector: sector.clone(),
                year,
                value,
            })
        });
        self.write_rows(SECTOR_INVESTMENTS_FILE_NAME, rows)
    }

    /// Write investment by region to a CSV file
    pub fn write_regional_investments(&self, investments: &[RegionalInvestment]) -> Result<()> {
        self.write_rows(REGIONAL_INVESTMENTS_FILE_NAME, investments)
    }

    /// Write per-country investment statistics to a CSV file
    pub fn write_country_stats(&self, stats: &CountryStatsMap) -> Result<()> {
        let rows = stats.iter().map(|(country, stats)| CountryStatsRow {
            country: country.clone(),
            out_investment: stats.out_investment,
            in_investment: stats.in_investment,
            net_flow: stats.net_flow,
            out_degree: stats.out_degree,
            in_degree: stats.in_degree,
        });
        self.write_rows(COUNTRY_STATS_FILE_NAME, rows)
    }

    /// Write the largest investment flows to a CSV file
    pub fn write_largest_flows(&self, flows: &[FlowSummary]) -> Result<()> {
        self.write_rows(LARGEST_FLOWS_FILE_NAME, flows)
    }
}
