//! Article locator.
//!
//! Finds the repeating news-card elements on a rendered listing page. The
//! site's markup is not stable, so the locator walks an ordered list of
//! strategies from the most specific (the test attribute the cards currently
//! carry) to the most general (any anchor wrapping a level-3 heading). The
//! first strategy that matches anything wins; results of different strategies
//! are never merged, since they return elements of different shapes.
//!
//! When every strategy comes back empty, a global scan keeps anchors whose
//! href mentions the site's topic keyword, capped to bound later work.

use crate::config::SiteConfig;
use crate::errors::DriverError;
use crate::page::{Node, Page};
use tracing::{debug, info, instrument, warn};

/// Selector for the cards as the site renders them today.
pub const PRIMARY_SELECTOR: &str = r#"a[data-testid="link-undefined"]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateStrategy {
    Css(String),
    /// `article` elements holding at least one `a[href]`, one card per
    /// article however many anchors it wraps.
    ArticlesWithLink,
    /// Anchors containing an `h3`, checked structurally.
    AnchorsWithHeading,
}

/// How the returned elements were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatedBy {
    /// Index into [`strategies`].
    Strategy(usize),
    GlobalScan,
    Nothing,
}

#[derive(Debug)]
pub struct Located<N> {
    pub elements: Vec<N>,
    pub via: LocatedBy,
}

/// Ordered strategies, most specific first.
pub fn strategies(config: &SiteConfig) -> Vec<LocateStrategy> {
    let path = &config.content_path;
    let href_prefix = match config.host() {
        Some(host) => format!(r#"a[href^="{path}"], a[href*="{host}{path}"]"#),
        None => format!(r#"a[href^="{path}"]"#),
    };
    vec![
        LocateStrategy::Css(PRIMARY_SELECTOR.to_string()),
        LocateStrategy::ArticlesWithLink,
        LocateStrategy::Css(r#"a[class*="news"], a[class*="league"]"#.to_string()),
        LocateStrategy::Css(r#"a[data-testid*="link"]"#.to_string()),
        LocateStrategy::Css(href_prefix),
        LocateStrategy::AnchorsWithHeading,
    ]
}

fn run_strategy<'p, P: Page>(
    page: &'p P,
    strategy: &LocateStrategy,
) -> Result<Vec<P::Node<'p>>, DriverError> {
    match strategy {
        LocateStrategy::Css(selector) => page.find_all(selector),
        LocateStrategy::ArticlesWithLink => Ok(page
            .find_all("article")?
            .into_iter()
            .filter(|article| matches!(article.find_first("a[href]"), Ok(Some(_))))
            .collect()),
        LocateStrategy::AnchorsWithHeading => Ok(page
            .find_all("a")?
            .into_iter()
            .filter(|a| matches!(a.find_first("h3"), Ok(Some(_))))
            .collect()),
    }
}

fn global_scan<'p, P: Page>(page: &'p P, config: &SiteConfig) -> Vec<P::Node<'p>> {
    let keyword = config.topic_keyword.to_lowercase();
    let anchors = match page.find_all("a[href]") {
        Ok(anchors) => anchors,
        Err(e) => {
            warn!(error = %e, "Global anchor scan failed");
            return Vec::new();
        }
    };
    anchors
        .into_iter()
        .filter(|a| {
            a.attribute("href")
                .ok()
                .flatten()
                .is_some_and(|href| href.to_lowercase().contains(&keyword))
        })
        .take(config.fallback_scan_cap)
        .collect()
}

/// Locate article elements on the currently loaded page, in document order.
#[instrument(level = "info", skip_all)]
pub fn locate<'p, P: Page>(page: &'p P, config: &SiteConfig) -> Located<P::Node<'p>> {
    for (i, strategy) in strategies(config).iter().enumerate() {
        match run_strategy(page, strategy) {
            Ok(elements) if !elements.is_empty() => {
                info!(index = i, ?strategy, count = elements.len(), "Located article elements");
                return Located {
                    elements,
                    via: LocatedBy::Strategy(i),
                };
            }
            Ok(_) => debug!(index = i, ?strategy, "Strategy matched nothing"),
            Err(e) => debug!(index = i, ?strategy, error = %e, "Strategy failed"),
        }
    }

    let elements = global_scan(page, config);
    if elements.is_empty() {
        warn!("No article-like elements found");
        Located {
            elements,
            via: LocatedBy::Nothing,
        }
    } else {
        info!(count = elements.len(), "Located article elements by global anchor scan");
        Located {
            elements,
            via: LocatedBy::GlobalScan,
        }
    }
}
