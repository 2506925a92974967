//! Site configuration for the scraping pipeline.
//!
//! Everything the pipeline needs to know about the target site lives in a
//! [`SiteConfig`] value handed to [`crate::scrapers::pipeline::Pipeline`] at
//! construction. The defaults target TNT Sports football; a YAML file can
//! override any subset of fields:
//!
//! ```yaml
//! primary_url: https://www.tntsports.co.uk/football/
//! alternate_urls:
//!   - https://www.tntsports.co.uk/football/news/
//! health:
//!   brand_token: TNT Sports
//! settle_secs: 5
//! ```

use crate::errors::ConfigError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Competition slug as it appears in article URLs, and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueKeyword {
    pub slug: String,
    pub name: String,
}

/// Priority-ordered table used when a card carries no league label.
///
/// Order matters: more specific slugs come before the generic ones they could
/// be confused with (`scottish-premiership` before `championship`).
pub static DEFAULT_LEAGUES: Lazy<Vec<LeagueKeyword>> = Lazy::new(|| {
    [
        ("premier-league", "Premier League"),
        ("champions-league", "Champions League"),
        ("europa-league", "Europa League"),
        ("conference-league", "Conference League"),
        ("fa-cup", "FA Cup"),
        ("carabao-cup", "Carabao Cup"),
        ("league-cup", "League Cup"),
        ("scottish-premiership", "Scottish Premiership"),
        ("championship", "Championship"),
        ("la-liga", "La Liga"),
        ("serie-a", "Serie A"),
        ("bundesliga", "Bundesliga"),
        ("ligue-1", "Ligue 1"),
        ("womens-super-league", "Women's Super League"),
        ("world-cup", "World Cup"),
        ("euro-2028", "Euro 2028"),
        ("nations-league", "Nations League"),
    ]
    .into_iter()
    .map(|(slug, name)| LeagueKeyword {
        slug: slug.to_string(),
        name: name.to_string(),
    })
    .collect()
});

/// Inputs to the page health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Phrases that mark a regional restriction page (matched case-insensitively).
    pub geo_phrases: Vec<String>,
    /// Token present in the title of every genuine page of the site.
    pub brand_token: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            geo_phrases: vec!["not available in your region".to_string()],
            brand_token: "TNT Sports".to_string(),
        }
    }
}

/// Everything the pipeline needs to know about the target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing page to scrape first.
    pub primary_url: String,
    /// Tried in order when the primary page is geo-blocked.
    pub alternate_urls: Vec<String>,
    /// Origin that relative links are resolved against.
    pub base_origin: String,
    /// Path prefix under which the site serves articles.
    pub content_path: String,
    /// Keyword an article href must contain in the global fallback scan.
    pub topic_keyword: String,
    pub health: HealthConfig,
    /// Substrings that identify a raster image URL.
    pub image_formats: Vec<String>,
    /// Only accept images carrying the high-resolution marker.
    pub strict_images: bool,
    pub leagues: Vec<LeagueKeyword>,
    /// Unconditional wait after each navigation.
    pub settle_secs: u64,
    /// Budget for the first article selector to appear.
    pub wait_secs: u64,
    /// Elements handed to field extraction.
    pub max_articles: usize,
    /// Anchors kept by the global fallback scan.
    pub fallback_scan_cap: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            primary_url: "https://www.tntsports.co.uk/football/".to_string(),
            alternate_urls: vec![
                "https://www.tntsports.co.uk/football/news/".to_string(),
                "https://www.tntsports.co.uk/football/premier-league/".to_string(),
            ],
            base_origin: "https://www.tntsports.co.uk".to_string(),
            content_path: "/football/".to_string(),
            topic_keyword: "football".to_string(),
            health: HealthConfig::default(),
            image_formats: ["jpeg", "jpg", "png", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            strict_images: false,
            leagues: DEFAULT_LEAGUES.to_vec(),
            settle_secs: 3,
            wait_secs: 15,
            max_articles: 10,
            fallback_scan_cap: 20,
        }
    }
}

impl SiteConfig {
    /// Load a YAML site file; fields missing from the file keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw)?;
        info!(primary = %config.primary_url, alternates = config.alternate_urls.len(), "Loaded site config");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.origin()?;
        Ok(config)
    }

    /// Parsed [`Self::base_origin`].
    pub fn origin(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_origin)?)
    }

    /// Host part of the base origin, used by the href-prefix locator strategy.
    pub fn host(&self) -> Option<String> {
        self.origin()
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn wait_budget(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}
