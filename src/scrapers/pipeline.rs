//! Extraction orchestrator.
//!
//! Drives one page session through the run:
//!
//! ```text
//! Navigating -> WaitingForContent -> HealthCheck -> Locating -> Extracting -> Done
//!      \______________\___________________\____________\
//!                                                       -> Aborted(reason)
//! ```
//!
//! A geo-blocked primary page makes the health check walk the configured
//! alternate URLs in order; the first one that is not geo-blocked is adopted.
//! Everything above the card level that goes wrong ends the run with an
//! [`AbortReason`]; everything at or below the card level is absorbed.
//!
//! The session is owned for the whole run and closed on every exit path.

use crate::config::SiteConfig;
use crate::errors::{ConfigError, DriverError};
use crate::models::{AbortReason, NewsRecord, PageHealth, RunOutcome, RunReport};
use crate::page::{Node, Page};
use crate::scrapers::fields::FieldExtractor;
use crate::scrapers::health::assess;
use crate::scrapers::locator::{locate, PRIMARY_SELECTOR};
use crate::utils::truncate_for_log;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Navigating,
    WaitingForContent,
    HealthCheck,
    Locating,
    Extracting,
    Done,
    Aborted,
}

/// Closes the page when the run ends, whichever way it ends.
struct Session<P: Page> {
    page: P,
}

impl<P: Page> Drop for Session<P> {
    fn drop(&mut self) {
        self.page.close();
    }
}

pub struct Pipeline {
    config: SiteConfig,
    fields: FieldExtractor,
}

fn enter(stage: Stage) {
    debug!(?stage, "Pipeline stage");
}

fn abort(reason: AbortReason, source_url: Option<String>) -> RunReport {
    enter(Stage::Aborted);
    warn!(%reason, "Run aborted");
    RunReport::aborted(reason, source_url)
}

fn read_health<P: Page>(page: &P, config: &SiteConfig) -> Result<PageHealth, DriverError> {
    let title = page.title()?;
    let body = page.body_text()?;
    let health = assess(&title, &body, &config.health);
    info!(title = %truncate_for_log(&title, 120), ?health, "Assessed page health");
    Ok(health)
}

impl Pipeline {
    pub fn new(config: SiteConfig) -> Result<Self, ConfigError> {
        let fields = FieldExtractor::new(&config)?;
        Ok(Self { config, fields })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the whole pipeline over `page`, consuming the session.
    #[instrument(level = "info", skip_all, fields(primary = %self.config.primary_url))]
    pub async fn run<P: Page>(&self, page: P) -> RunReport {
        let mut session = Session { page };
        let report = self.drive(&mut session.page).await;
        info!(
            outcome = ?report.outcome,
            located = report.located,
            records = report.records.len(),
            "Run finished"
        );
        report
    }

    async fn drive<P: Page>(&self, page: &mut P) -> RunReport {
        enter(Stage::Navigating);
        let primary = self.config.primary_url.clone();
        if let Err(e) = page.navigate(&primary) {
            error!(url = %primary, error = %e, navigation = e.is_navigation(), "Navigation failed");
            return abort(AbortReason::NavigationFailed, None);
        }
        self.settle().await;

        enter(Stage::HealthCheck);
        let health = match read_health(page, &self.config) {
            Ok(health) => health,
            Err(e) => {
                error!(error = %e, "Could not read page title/body");
                return abort(AbortReason::NavigationFailed, None);
            }
        };

        let (health, source_url) = match health {
            PageHealth::GeoBlocked => match self.try_alternates(page).await {
                Some(adopted) => adopted,
                None => return abort(AbortReason::GeoBlocked, None),
            },
            other => (other, primary),
        };
        if health == PageHealth::LoadError {
            return abort(AbortReason::LoadError, Some(source_url));
        }

        enter(Stage::Locating);
        let page: &P = page;
        if !page.wait_for(PRIMARY_SELECTOR, self.config.wait_budget()) {
            warn!(
                selector = PRIMARY_SELECTOR,
                budget_secs = self.config.wait_secs,
                "Primary card selector did not appear; trying fallbacks"
            );
        }
        let located = locate(page, &self.config);
        debug!(via = ?located.via, url = ?page.current_url(), "Locate finished");
        if health.after_locate(located.elements.len()) == PageHealth::EmptyContent {
            return abort(AbortReason::NoContentFound, Some(source_url));
        }

        enter(Stage::Extracting);
        let records = self.extract(&located.elements);
        info!(count = records.len(), "Scraped news items");

        enter(Stage::Done);
        RunReport {
            outcome: RunOutcome::Completed,
            source_url: Some(source_url),
            located: located.elements.len(),
            records,
        }
    }

    /// Unconditional post-navigation delay for client-side rendering.
    async fn settle(&self) {
        enter(Stage::WaitingForContent);
        let settle = self.config.settle();
        if !settle.is_zero() {
            debug!(secs = settle.as_secs(), "Waiting for content to render");
            sleep(settle).await;
        }
    }

    /// Walk the alternates in order; adopt the first one that is not geo-blocked.
    async fn try_alternates<P: Page>(&self, page: &mut P) -> Option<(PageHealth, String)> {
        warn!(
            alternates = self.config.alternate_urls.len(),
            "Primary page geo-blocked; trying alternate URLs"
        );
        for url in &self.config.alternate_urls {
            if let Err(e) = page.navigate(url) {
                warn!(%url, error = %e, "Alternate navigation failed; skipping");
                continue;
            }
            self.settle().await;
            match read_health(page, &self.config) {
                Ok(PageHealth::GeoBlocked) => info!(%url, "Alternate also geo-blocked"),
                Ok(health) => {
                    info!(%url, ?health, "Adopted alternate URL");
                    return Some((health, url.clone()));
                }
                Err(e) => warn!(%url, error = %e, "Alternate unreadable; skipping"),
            }
        }
        None
    }

    /// Build records for the first `max_articles` elements, skipping cards that
    /// cannot be read or carry neither title nor link.
    fn extract<N: Node>(&self, elements: &[N]) -> Vec<NewsRecord> {
        let cap = self.config.max_articles;
        if elements.len() > cap {
            info!(located = elements.len(), cap, "Capping elements passed to extraction");
        }
        let mut records = Vec::new();
        for (index, element) in elements.iter().take(cap).enumerate() {
            match self.fields.extract_record(element) {
                Ok(record) if record.is_emittable() => {
                    debug!(index, title = ?record.title, link = ?record.link, "Extracted card");
                    records.push(record);
                }
                Ok(_) => debug!(index, "Card has neither title nor link; dropped"),
                Err(e) => warn!(index, error = %e, "Card unreadable; skipped"),
            }
        }
        records
    }
}
