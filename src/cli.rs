//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags override values from the optional YAML site config, which in turn
//! overrides the built-in defaults.

use crate::config::SiteConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the football news scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape the default listing with a headless browser
/// football_news_scraper
///
/// # Custom output and an extra alternate URL
/// football_news_scraper -o out/news.json --alternate https://www.tntsports.co.uk/football/news/
///
/// # Re-run extraction over a saved page, no browser involved
/// football_news_scraper --snapshot saved/football.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Where to write the scraped records
    #[arg(short, long, default_value = "news.json")]
    pub output: PathBuf,

    /// Optional path to a YAML site config
    #[arg(short, long, env = "NEWS_SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listing page to scrape (overrides the config)
    #[arg(short, long, env = "NEWS_SCRAPER_URL")]
    pub url: Option<String>,

    /// Alternate listing URL tried when the primary one is geo-blocked; repeatable
    #[arg(short, long = "alternate")]
    pub alternates: Vec<String>,

    /// Seconds to wait after each navigation for client-side rendering
    #[arg(long)]
    pub settle_secs: Option<u64>,

    /// Seconds to wait for the first article cards to appear
    #[arg(long)]
    pub wait_secs: Option<u64>,

    /// Only accept images carrying the high-resolution marker
    #[arg(long)]
    pub strict_images: bool,

    /// Run extraction over a saved HTML file instead of a live browser
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Also write the full run report (outcome and reason) to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,

    /// Browser binary to launch
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into a site config.
    pub fn apply(&self, mut config: SiteConfig) -> SiteConfig {
        if let Some(url) = &self.url {
            config.primary_url = url.clone();
        }
        if !self.alternates.is_empty() {
            config.alternate_urls = self.alternates.clone();
        }
        if let Some(secs) = self.settle_secs {
            config.settle_secs = secs;
        }
        if let Some(secs) = self.wait_secs {
            config.wait_secs = secs;
        }
        if self.strict_images {
            config.strict_images = true;
        }
        config
    }
}
