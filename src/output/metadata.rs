//! Code for writing metadata about a report to file
use crate::dataset::fetch::DataSource;
use crate::year::ReportDate;
use anyhow::Result;
use chrono::prelude::*;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
pub(crate) const METADATA_FILE_NAME: &str = "metadata.toml";

/// Information about a report, written alongside its data
#[derive(Serialize)]
pub struct Metadata<'a> {
    run: RunMetadata<'a>,
    program: ProgramMetadata,
    /// Where each data set came from
    sources: IndexMap<&'a str, DataSource>,
}

/// Information about the run which produced the report
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// The command which was run (e.g. "dashboard")
    command: &'a str,
    /// The date and time on which the run started
    datetime: String,
    /// The period the report describes (e.g. "2026 Q3")
    report_date: Option<String>,
}

#[derive(Serialize)]
struct ProgramMetadata {
    /// The program name
    name: &'static str,
    /// The program version as specified in Cargo.toml
    version: &'static str,
}

impl Default for ProgramMetadata {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl<'a> Metadata<'a> {
    /// Start recording metadata for a run of `command`
    pub fn new(command: &'a str, report_date: Option<ReportDate>) -> Self {
        Self {
            run: RunMetadata {
                command,
                datetime: Local::now().to_rfc2822(),
                report_date: report_date.map(|date| date.to_string()),
            },
            program: ProgramMetadata::default(),
            sources: IndexMap::new(),
        }
    }

    /// Record where the named data set came from
    pub fn add_source(&mut self, name: &'a str, source: DataSource) {
        self.sources.insert(name, source);
    }

    /// Write metadata to the specified output path in TOML format
    pub fn write(&self, output_path: &Path) -> Result<()> {
        let file_path = output_path.join(METADATA_FILE_NAME);
        fs::write(&file_path, toml::to_string(self)?)?;

        Ok(())
    }
}
