//! Common functionality for ecostat: projections of economic indicators and analysis of
//! investment flows between countries.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dataset;
pub mod growth;
pub mod id;
pub mod input;
pub mod log;
pub mod network;
pub mod output;
pub mod projection;
pub mod regional;
pub mod report;
pub mod settings;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// This will be *something like* `~/.config/ecostat` on Linux.
pub fn get_ecostat_config_dir() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_default();
    dir.push("ecostat");

    dir
}
