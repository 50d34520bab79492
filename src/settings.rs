//! Code for loading program settings.
use crate::dataset::fetch::DEFAULT_FETCH_TIMEOUT;
use crate::get_ecostat_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::network::DEFAULT_MIN_INVESTMENT;
use anyhow::Result;
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for ecostat
# Uncomment a setting to change it from its default value.
";

/// The default endpoint for historical indicator data
const DEFAULT_INDICATORS_URL: &str = "https://rosstat.gov.ru/api/data";

/// The default endpoint for sector investment data
const DEFAULT_INVESTMENTS_URL: &str = "https://api.economy.gov.ru/api/data/investments";

/// The default number of entries in "top N" listings
const DEFAULT_TOP_COUNT: usize = 5;

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_min_investment() -> f64 {
    DEFAULT_MIN_INVESTMENT
}

fn default_top_count() -> usize {
    DEFAULT_TOP_COUNT
}

fn default_indicators_url() -> Option<String> {
    Some(DEFAULT_INDICATORS_URL.to_string())
}

fn default_investments_url() -> Option<String> {
    Some(DEFAULT_INVESTMENTS_URL.to_string())
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_ecostat_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Locations of live data sets.
///
/// Set a URL to an empty string to always use the built-in data for that data set.
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct SourceSettings {
    /// URL of a JSON document with `internet_users` and `income` series, keyed by year
    #[serde(default = "default_indicators_url")]
    pub indicators_url: Option<String>,
    /// URL of a JSON document with a series of investments for each sector, keyed by year
    #[serde(default = "default_investments_url")]
    pub investments_url: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            indicators_url: default_indicators_url(),
            investments_url: default_investments_url(),
        }
    }
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
    /// Whether to skip fetching live data and always use built-in data
    #[serde(default)]
    pub offline: bool,
    /// Time limit for fetching each live data set (seconds)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Investments smaller than this are left out of the investment network
    #[serde(default = "default_min_investment")]
    pub min_investment: f64,
    /// The number of entries to show in "top" listings
    #[serde(default = "default_top_count")]
    pub top_count: usize,
    /// Where to fetch live data from
    #[serde(default)]
    pub sources: SourceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            offline: false,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            min_investment: default_min_investment(),
            top_count: default_top_count(),
            sources: SourceSettings::default(),
        }
    }
}

impl Settings {
    /// Read the contents of the program settings file.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read from the specified path, returning default settings if the file doesn't exist
    pub(crate) fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }

    /// The time limit for fetching each live data set
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// The contents of the default settings file
    pub fn default_file_contents() -> String {
        // Settings object with default values set by serde
        let settings: Settings =
            toml::from_str("").expect("Cannot create settings from empty TOML file");

        // Convert to TOML
        let settings_raw = toml::to_string(&settings).expect("Could not convert settings to TOML");

        // Iterate through the generated TOML, commenting out lines and adding docs
        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        let mut in_sources_table = false;
        for line in settings_raw.split('\n') {
            let line = line.trim();
            if line.starts_with('[') {
                // Start of a sub-table
                in_sources_table = line == "[sources]";
                write!(&mut out, "\n# {line}\n").unwrap();
                continue;
            }

            if let Some(last) = line.find('=') {
                // Use doc comment to document parameter. All fields should have doc comments.
                let field = line[..last].trim();
                let docs = if in_sources_table {
                    SourceSettings::get_field_docs(field)
                } else {
                    Settings::get_field_docs(field)
                }
                .expect("Missing doc comment for field");
                for doc_line in docs.split('\n') {
                    write!(&mut out, "\n# # {}\n", doc_line.trim()).unwrap();
                }

                writeln!(&mut out, "# {line}").unwrap();
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = \"warn\"\nmin_investment = 50.0").unwrap();
            writeln!(file, "[sources]\ninvestments_url = \"\"").unwrap();
        }

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                min_investment: 50.0,
                sources: SourceSettings {
                    indicators_url: Some(DEFAULT_INDICATORS_URL.to_string()),
                    investments_url: Some(String::new()),
                },
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_settings_load_from_path_invalid() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&file_path, "top_count = \"five\"").unwrap();
        assert!(Settings::load_from_path(&file_path).is_err());
    }

    #[test]
    fn test_serde_defaults_match_default_impl() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# log_level = \"info\""));
        assert!(contents.contains("# [sources]"));
        assert!(contents.contains("# # Time limit for fetching each live data set (seconds)"));

        // Every setting is commented out, so the file parses to the defaults
        let settings: Settings = toml::from_str(&contents).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
