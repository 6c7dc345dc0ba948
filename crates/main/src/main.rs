mod config;

use std::error::Error;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use superhero_pdf::builder::{ReportBuilder, DEFAULT_FILE_NAME};
use superhero_pdf::client::SuperHeroClient;
use superhero_pdf::fetcher::{Fetcher, DEFAULT_MAX_ID, TARGET_COUNT, TARGET_PUBLISHER};
use superhero_pdf::grouping::GroupedRecords;

use crate::config::Config;

/// Builds a PDF of DC Comics heroes from the public superhero API.
///
/// Set `LOG_LEVEL=debug` or `DEBUG=1` for verbose output and `SUPERHERO_API_URL` to point at a
/// different API root.
#[derive(Parser)]
#[command(author, version, about = "Render DC Comics heroes into a paginated PDF")]
struct Cli {
    /// Base name of the generated file; `.pdf` is appended.
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    output: String,

    /// Highest hero identifier to probe before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ID)]
    max_id: u32,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();
    config.log.init();

    let client = SuperHeroClient::new(config.log.clone())
        .context("Failed to build HTTP client")?
        .with_base_url(config.base_url.as_str());

    let report = Fetcher::new(client, config.log.clone())
        .with_max_id(cli.max_id)
        .run();
    if report.is_short(TARGET_COUNT) {
        warn!(
            "Only {} {} heroes found up to id {}",
            report.heroes.len(),
            TARGET_PUBLISHER,
            report.last_id
        );
    }
    if !report.failed_ids.is_empty() {
        info!("Skipped ids after errors: {:?}", report.failed_ids);
    }

    let groups = GroupedRecords::from_records(report.heroes);
    ReportBuilder::new(cli.output)
        .write(&groups)
        .context("Failed to write the report")?;

    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
