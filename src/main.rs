// Entry point and high-level flow.
//
// One run loads `dataset_zonas.csv` (or the configured source), prepares and
// aggregates it, prints the sidebar to the console and writes the full
// dashboard bundle as JSON for the map front-end.
// Any source error is fatal: nothing is rendered and the process exits 1.
mod config;
mod error;
mod loader;
mod outline;
mod output;
mod pipeline;
mod reports;
mod types;
mod util;
mod zones;

use config::AppConfig;
use error::DashboardError;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PREVIEW_ROWS: usize = 15;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print a fatal error; a missing source also gets a hint about where the
/// file is expected.
fn report_fatal(err: &DashboardError) {
    eprintln!("Error: {}", err);
    if let DashboardError::SourceNotFound { path, .. } = err {
        eprintln!(
            "Make sure '{}' is in the working directory.",
            path.display()
        );
    }
}

fn run() -> Result<(), DashboardError> {
    let config = AppConfig::load_or_default(Path::new(config::CONFIG_FILE))?;
    info!(source = %config.source.display(), "Loading dashboard data");

    let dashboard = pipeline::build_dashboard(&config)?;

    output::print_sidebar(&dashboard, PREVIEW_ROWS);
    println!("{}", dashboard.labels.caption);
    output::write_json(&config.output, &dashboard)?;
    println!("(Dashboard exported to {})", config.output.display());
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_fatal(&e);
            ExitCode::FAILURE
        }
    }
}
