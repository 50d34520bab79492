//! Integration tests for the `network` command.
use ecostat::cli::{NetworkOpts, OutputOpts, handle_network_command};
use ecostat::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// An integration test for the `network` command, reading investments from a CSV file.
#[test]
fn test_handle_network_command() {
    unsafe { std::env::set_var("ECOSTAT_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let edges_path = tempdir.path().join("investments.csv");
    fs::write(
        &edges_path,
        "source_country,target_country,investment_amount,sector
A,B,150,Tech
A,C,80,Energy
B,A,50,Finance
C,B,10,Retail
",
    )
    .unwrap();

    let output_dir = tempdir.path().join("results");
    let opts = NetworkOpts {
        edges: Some(edges_path),
        min_investment: None,
        top: Some(2),
        output: OutputOpts {
            output_dir: Some(output_dir.clone()),
            overwrite: false,
        },
    };
    handle_network_command(&opts, Some(Settings::default())).unwrap();

    assert_eq!(
        fs::read_to_string(output_dir.join("country_stats.csv")).unwrap(),
        "country,out_investment,in_investment,net_flow,out_degree,in_degree
A,230.0,50.0,180.0,2,1
B,50.0,150.0,-100.0,1,1
C,0.0,80.0,-80.0,0,1
"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("largest_flows.csv")).unwrap(),
        "source_country,target_country,investment_amount,sector
A,B,150.0,Tech
A,C,80.0,Energy
"
    );
    assert!(output_dir.join("metadata.toml").is_file());

    // Second time will fail because the logging is already initialised
    let opts = NetworkOpts {
        output: OutputOpts {
            output_dir: Some(tempdir.path().join("more_results")),
            overwrite: false,
        },
        ..opts
    };
    assert_eq!(
        handle_network_command(&opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
