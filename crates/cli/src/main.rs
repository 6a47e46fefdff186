//! `health-report`: build one day's health report and print it.
//!
//! ```text
//! health-report                         # today, text
//! health-report --date 2025-01-15 --format json
//! health-report --config profile.toml --format markdown
//! ```
//!
//! Settings come from defaults, an optional TOML file, `HEALTH__*`
//! environment variables and `WGER_BASE_URL` / `WGER_TOKEN` (a `.env` file
//! is read first). Logs go to stderr; stdout carries only the report.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use health_report_core::errors::CoreError;
use health_report_core::models::settings::ReportSettings;
use health_report_core::services::render_service::{RenderService, ReportFormat};
use health_report_core::HealthReporter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "health-report",
    about = "Daily health report",
    long_about = "Aggregate weight, nutrition, activity and body composition for one day and derive BMR/TDEE, energy balance and trends"
)]
struct Args {
    /// Report date (YYYY-MM-DD), defaults to today in UTC
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output format: text, json or markdown
    #[arg(long, short = 'f', default_value = "text")]
    format: ReportFormat,

    /// TOML settings file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing(args.verbose);

    match run(&args).await {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = %e.kind(), error = %e, "report failed");
            println!("{}", RenderService::new().render_error(&e, args.format));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<String, CoreError> {
    let settings = ReportSettings::load(args.config.as_deref())?;
    let reporter = HealthReporter::new(settings)?;

    info!(
        date = ?args.date,
        format = %args.format,
        "generating report"
    );
    reporter.render_report(args.date, args.format).await
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
