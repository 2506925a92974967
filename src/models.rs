//! Data models for scraped news cards and the outcome of a scraping run.
//!
//! - [`NewsRecord`]: one news card as written to the output file
//! - [`PageHealth`]: classification of a single page load
//! - [`AbortReason`] / [`RunOutcome`]: how a run ended
//! - [`RunReport`]: everything the pipeline hands back to `main`

use serde::{Deserialize, Serialize};

/// A single news card scraped from the listing page.
///
/// Field order is the serialization order. The image URL is written under the
/// key `pic` to stay compatible with the existing `news.json` consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    /// Competition name, from the card markup or inferred from the link.
    pub league: Option<String>,
    /// Headline with whitespace collapsed.
    pub title: Option<String>,
    /// Absolute article URL.
    pub link: Option<String>,
    /// Absolute image URL.
    #[serde(rename = "pic")]
    pub image: Option<String>,
}

impl NewsRecord {
    /// A record is worth emitting only when it carries a title or a link.
    pub fn is_emittable(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.title) || filled(&self.link)
    }
}

/// Classification of one page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageHealth {
    Ok,
    GeoBlocked,
    LoadError,
    EmptyContent,
}

impl PageHealth {
    /// Refine an `Ok` classification once the locate step has run.
    pub fn after_locate(self, located: usize) -> Self {
        match self {
            Self::Ok if located == 0 => Self::EmptyContent,
            other => other,
        }
    }
}

/// Why a run stopped before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbortReason {
    NavigationFailed,
    GeoBlocked,
    LoadError,
    NoContentFound,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NavigationFailed => "NAVIGATION_FAILED",
            Self::GeoBlocked => "GEO_BLOCKED",
            Self::LoadError => "LOAD_ERROR",
            Self::NoContentFound => "NO_CONTENT_FOUND",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum RunOutcome {
    Completed,
    Aborted(AbortReason),
}

/// Result of one pipeline run.
///
/// An aborted run still carries a (empty) record list, so callers can always
/// write output and decide on the exit code from `outcome`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// URL whose content was extracted, once a page passed the health check.
    pub source_url: Option<String>,
    /// Number of elements the locator returned, before the extraction cap.
    pub located: usize,
    pub records: Vec<NewsRecord>,
}

impl RunReport {
    pub fn aborted(reason: AbortReason, source_url: Option<String>) -> Self {
        Self {
            outcome: RunOutcome::Aborted(reason),
            source_url,
            located: 0,
            records: Vec::new(),
        }
    }

    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self.outcome {
            RunOutcome::Aborted(reason) => Some(reason),
            RunOutcome::Completed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>, link: Option<&str>) -> NewsRecord {
        NewsRecord {
            league: Some("Premier League".into()),
            title: title.map(String::from),
            link: link.map(String::from),
            image: None,
        }
    }

    #[test]
    fn test_record_serializes_in_fixed_order() {
        let r = NewsRecord {
            league: None,
            title: Some("Late winner".into()),
            link: Some("https://www.tntsports.co.uk/football/a".into()),
            image: None,
        };
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            r#"{"league":null,"title":"Late winner","link":"https://www.tntsports.co.uk/football/a","pic":null}"#
        );
    }

    #[test]
    fn test_emission_requires_title_or_link() {
        assert!(record(Some("t"), None).is_emittable());
        assert!(record(None, Some("https://x")).is_emittable());
        assert!(!record(None, None).is_emittable());
        assert!(!record(Some(""), Some("")).is_emittable());
    }

    #[test]
    fn test_health_after_locate() {
        assert_eq!(PageHealth::Ok.after_locate(0), PageHealth::EmptyContent);
        assert_eq!(PageHealth::Ok.after_locate(3), PageHealth::Ok);
        assert_eq!(PageHealth::LoadError.after_locate(0), PageHealth::LoadError);
    }

    #[test]
    fn test_abort_reason_codes() {
        assert_eq!(AbortReason::NoContentFound.to_string(), "NO_CONTENT_FOUND");
        let json = serde_json::to_string(&RunOutcome::Aborted(AbortReason::GeoBlocked)).unwrap();
        assert_eq!(json, r#"{"status":"aborted","reason":"GEO_BLOCKED"}"#);
    }
}
