//! Integration tests for the `dashboard` command.
use ecostat::cli::{DashboardOpts, OutputOpts, handle_dashboard_command};
use ecostat::log::is_logger_initialised;
use ecostat::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// Dashboard options for an offline run writing to `output_dir`
fn offline_opts(output_dir: std::path::PathBuf) -> DashboardOpts {
    DashboardOpts {
        year: Some(2025),
        quarter: Some(2),
        offline: true,
        output: OutputOpts {
            output_dir: Some(output_dir),
            overwrite: false,
        },
    }
}

/// An integration test for the `dashboard` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_dashboard_command() {
    unsafe { std::env::set_var("ECOSTAT_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    handle_dashboard_command(&offline_opts(output_dir.clone()), Some(Settings::default()))
        .unwrap();

    assert!(is_logger_initialised());
    for file_name in [
        "internet_users.csv",
        "income.csv",
        "sector_investments.csv",
        "regional_investments.csv",
        "metadata.toml",
        "ecostat_info.log",
        "ecostat_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    let income = fs::read_to_string(output_dir.join("income.csv")).unwrap();
    assert!(income.starts_with("year,value\n2020,44.1\n"));
    assert_eq!(income.lines().count(), 7); // header + 2020-2025

    let metadata = fs::read_to_string(output_dir.join("metadata.toml")).unwrap();
    assert!(metadata.contains("report_date = \"2025 Q2\""));
    assert!(metadata.contains("indicators = \"fallback\""));

    // Second time will fail because the output folder is not empty
    assert!(
        handle_dashboard_command(&offline_opts(output_dir), Some(Settings::default())).is_err()
    );
}
