//! Page health classification.
//!
//! Decides from a page's title and visible text whether the listing actually
//! rendered, or whether the site served a regional restriction notice or an
//! error page instead. Pure string matching; reading the title and body is the
//! caller's job.

use crate::config::HealthConfig;
use crate::models::PageHealth;
use tracing::debug;

const ERROR_MARKERS: &[&str] = &["404", "error"];

/// Classify one page load.
///
/// Geo-restriction wins over load errors. A title that mentions an error is
/// only treated as one when it lacks the brand token, so a genuine article
/// titled "VAR error costs ..." on a branded page is not a failed load.
/// `PageHealth::EmptyContent` is never returned here; see
/// [`PageHealth::after_locate`].
pub fn assess(title: &str, body: &str, config: &HealthConfig) -> PageHealth {
    let title_lc = title.to_lowercase();
    let body_lc = body.to_lowercase();

    let geo_hit = config
        .geo_phrases
        .iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty())
        .find(|p| title_lc.contains(p.as_str()) || body_lc.contains(p.as_str()));
    if let Some(phrase) = geo_hit {
        debug!(%phrase, "Regional restriction phrase found");
        return PageHealth::GeoBlocked;
    }

    let error_in_title = ERROR_MARKERS.iter().any(|m| title_lc.contains(m));
    let brand = config.brand_token.to_lowercase();
    let branded = !brand.is_empty() && title_lc.contains(&brand);
    if error_in_title && !branded {
        debug!(%title, "Error marker in unbranded title");
        return PageHealth::LoadError;
    }

    PageHealth::Ok
}
