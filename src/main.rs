//! # Football News Scraper
//!
//! Scrapes the news cards (league, title, link, picture) from a football
//! listing page that is rendered client-side, by driving a headless browser,
//! and writes them to a JSON file.
//!
//! ## Usage
//!
//! ```sh
//! football_news_scraper -o news.json
//! football_news_scraper --snapshot saved.html --report report.json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Navigating**: open the listing (or an alternate when geo-blocked)
//! 2. **Health check**: reject restriction notices and error pages
//! 3. **Locating**: find the card elements through fallback selector strategies
//! 4. **Extracting**: pull each field through its own fallback cascade
//! 5. **Output**: write the records; exit non-zero when nothing was scraped

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod errors;
mod models;
mod outputs;
mod page;
mod scrapers;
mod utils;

use cli::Cli;
use config::SiteConfig;
use models::RunReport;
use outputs::json;
use page::SnapshotPage;
use scrapers::pipeline::Pipeline;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("football_news_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let base = match &args.config {
        Some(path) => SiteConfig::from_yaml_file(path)?,
        None => SiteConfig::default(),
    };
    let pipeline = Pipeline::new(args.apply(base))?;

    // Early check: fail before launching a browser if we could not save anyway
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let report = match &args.snapshot {
        Some(path) => {
            let html = tokio::fs::read_to_string(path).await?;
            info!(path = %path.display(), bytes = html.len(), "Running over saved snapshot");
            let page = SnapshotPage::new().with_document(pipeline.config().primary_url.clone(), html);
            pipeline.run(page).await
        }
        None => run_live(&pipeline, &args).await?,
    };

    json::write_records(&report.records, &args.output).await?;
    if let Some(path) = &args.report {
        json::write_report(&report, path).await?;
    }

    if let Some(reason) = report.abort_reason() {
        error!(%reason, "Scraping aborted");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        records = report.records.len(),
        source = ?report.source_url,
        "Execution complete"
    );

    if report.records.is_empty() {
        error!("No news records scraped");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(feature = "chrome")]
async fn run_live(pipeline: &Pipeline, args: &Cli) -> Result<RunReport, Box<dyn Error>> {
    use models::AbortReason;
    use page::chrome::{ChromeOptions, ChromePage};

    let options = ChromeOptions {
        headless: !args.headful,
        binary: args.chrome_path.clone(),
        ..ChromeOptions::default()
    };
    match ChromePage::launch(&options) {
        Ok(page) => Ok(pipeline.run(page).await),
        Err(e) => {
            error!(error = %e, "Could not start browser session");
            Ok(RunReport::aborted(AbortReason::NavigationFailed, None))
        }
    }
}

#[cfg(not(feature = "chrome"))]
async fn run_live(_pipeline: &Pipeline, _args: &Cli) -> Result<RunReport, Box<dyn Error>> {
    Err("built without the `chrome` feature; pass --snapshot to scrape a saved page".into())
}
