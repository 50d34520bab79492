//! The command line interface for the program.
use crate::dataset::fetch::{Fetcher, HttpFetcher};
use crate::dataset::{DataProvider, region_profiles, sample_investment_edges};
use crate::input::read_investment_edges;
use crate::log;
use crate::network::{InvestmentEdge, InvestmentNetwork};
use crate::output::metadata::Metadata;
use crate::output::{
    DataWriter, INCOME_FILE_NAME, INTERNET_USERS_FILE_NAME, create_output_directory,
    get_output_dir,
};
use crate::report::{Dashboard, network_summary_lines};
use crate::settings::Settings;
use crate::year::ReportDate;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The earliest year which can be given with `--year`
const MIN_REPORT_YEAR: i64 = 1900;

/// The latest year which can be given with `--year`
const MAX_REPORT_YEAR: i64 = 2200;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options controlling where results are written
#[derive(Args)]
pub struct OutputOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for the dashboard command
#[derive(Args)]
pub struct DashboardOpts {
    /// The year to report on (defaults to the current year)
    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_REPORT_YEAR..=MAX_REPORT_YEAR))]
    pub year: Option<u32>,
    /// The quarter to report on, 1-4 (defaults to the current quarter)
    #[arg(long)]
    pub quarter: Option<u32>,
    /// Use built-in data only, without fetching live data
    #[arg(long)]
    pub offline: bool,
    /// Output options
    #[command(flatten)]
    pub output: OutputOpts,
}

/// Options for the network command
#[derive(Args)]
pub struct NetworkOpts {
    /// CSV file of investments (defaults to a built-in sample)
    #[arg(long)]
    pub edges: Option<PathBuf>,
    /// Leave out investments smaller than this
    #[arg(long)]
    pub min_investment: Option<f64>,
    /// The number of countries and flows to list
    #[arg(long)]
    pub top: Option<usize>,
    /// Output options
    #[command(flatten)]
    pub output: OutputOpts,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Project economic indicators up to the report date.
    Dashboard {
        /// Dashboard options
        #[command(flatten)]
        opts: DashboardOpts,
    },
    /// Analyse a network of investments between countries.
    Network {
        /// Network options
        #[command(flatten)]
        opts: NetworkOpts,
    },
    /// Manage the program settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Dashboard { opts } => handle_dashboard_command(&opts, None),
            Self::Network { opts } => handle_network_command(&opts, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ ecostat --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Work out the report date from the command-line options.
///
/// Whichever of the year and quarter is not given is taken from today's date.
fn resolve_report_date(year: Option<u32>, quarter: Option<u32>) -> Result<ReportDate> {
    let (year, quarter) = match (year, quarter) {
        (Some(year), Some(quarter)) => (year, quarter),
        _ => {
            let today = ReportDate::today()?;
            (year.unwrap_or(today.year), quarter.unwrap_or(today.quarter))
        }
    };

    ReportDate::new(year, quarter)
}

/// Create the output folder and start the logger, which also writes to files in that folder.
///
/// # Returns
///
/// The path to the output folder.
fn prepare_output(opts: &OutputOpts, default_name: &str, settings: &Settings) -> Result<PathBuf> {
    let output_path = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| get_output_dir(default_name));

    let overwrite = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(&settings.log_level), Some(&output_path))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Print each line of a summary to the console
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Handle the `dashboard` command.
pub fn handle_dashboard_command(opts: &DashboardOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    let date = resolve_report_date(opts.year, opts.quarter)?;
    let output_path = prepare_output(
        &opts.output,
        &format!("{}_Q{}", date.year, date.quarter),
        &settings,
    )?;

    let http_fetcher = if opts.offline || settings.offline {
        info!("Running offline: built-in data will be used");
        None
    } else {
        match HttpFetcher::new(settings.fetch_timeout()) {
            Ok(fetcher) => Some(fetcher),
            Err(err) => {
                warn!("Could not create HTTP client ({err}): built-in data will be used");
                None
            }
        }
    };
    let fetcher = http_fetcher.as_ref().map(|fetcher| fetcher as &dyn Fetcher);
    let provider = DataProvider::new(fetcher, &settings.sources);
    let indicators = provider.indicators();
    let sector_history = provider.sector_investments();

    let dashboard = Dashboard::build(
        &indicators.data,
        &sector_history.data,
        &region_profiles(),
        date,
    );
    print_lines(&dashboard.summary_lines());

    let writer = DataWriter::new(&output_path);
    writer.write_series(INTERNET_USERS_FILE_NAME, &dashboard.internet_users)?;
    writer.write_series(INCOME_FILE_NAME, &dashboard.income)?;
    writer.write_sector_investments(&dashboard.sector_investments)?;
    writer.write_regional_investments(&dashboard.regional_investments)?;

    let mut metadata = Metadata::new("dashboard", Some(date));
    metadata.add_source("indicators", indicators.source);
    metadata.add_source("sector_investments", sector_history.source);
    metadata.write(&output_path)?;
    info!("Dashboard complete!");

    Ok(())
}

/// Handle the `network` command.
pub fn handle_network_command(opts: &NetworkOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output(&opts.output, "network", &settings)?;

    let edges = match opts.edges.as_deref() {
        Some(path) => load_edges(path)?,
        None => {
            info!("No investments file given: using built-in sample");
            sample_investment_edges()
        }
    };
    let min_investment = opts.min_investment.unwrap_or(settings.min_investment);
    let top_count = opts.top.unwrap_or(settings.top_count);

    let network = InvestmentNetwork::build(&edges, min_investment);
    info!(
        "Built network of {} countries from {} investments (threshold {min_investment})",
        network.node_count(),
        edges.len()
    );
    print_lines(&network_summary_lines(&network, top_count));

    let writer = DataWriter::new(&output_path);
    writer.write_country_stats(&network.country_stats())?;
    writer.write_largest_flows(&network.largest_flows(top_count))?;
    Metadata::new("network", None).write(&output_path)?;
    info!("Network analysis complete!");

    Ok(())
}

/// Read the investments from a CSV file
fn load_edges(path: &Path) -> Result<Vec<InvestmentEdge>> {
    let edges = read_investment_edges(path).context("Failed to load investments.")?;
    info!("Loaded investments from {}", path.display());

    Ok(edges)
}
