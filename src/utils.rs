//! Utility functions for text normalization, URL handling and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace collapsing for text read out of the DOM
//! - URL scheme detection and resolution against the site origin
//! - String truncation for logging
//! - Output path validation

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme regex is valid"));

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// Returns `None` when nothing but whitespace is left, so callers never carry
/// an empty string forward as a field value.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  Late\n  winner "), Some("Late winner".into()));
/// assert_eq!(collapse_whitespace(" \t\n"), None);
/// ```
pub fn collapse_whitespace(s: &str) -> Option<String> {
    let collapsed = s.split_whitespace().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Whether `s` starts with a URL scheme such as `https:` or `data:`.
pub fn has_scheme(s: &str) -> bool {
    SCHEME.is_match(s)
}

/// Turn an `href` into an absolute URL.
///
/// Values that already carry a scheme come back unchanged. Root-relative
/// paths, queries and fragments are appended to `origin` verbatim, so
/// `/football/x` becomes `{origin}/football/x` with no normalization or
/// percent-encoding. A bare relative path (`football/x`) gets a `/`
/// between the two.
/// Blank input yields `None`.
pub fn resolve_link(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if has_scheme(href) {
        return Some(href.to_string());
    }
    let base = origin.as_str().trim_end_matches('/');
    if href.starts_with(['/', '?', '#']) {
        Some(format!("{base}{href}"))
    } else {
        Some(format!("{base}/{href}"))
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (moved back to a char boundary) with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `path` exists and is writable.
///
/// Creates missing parent directories, then writes and removes a probe file
/// next to the target.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;
    let probe = dir.join("..__probe_write__");
    fs::write(&probe, b"").await?;
    let _ = fs::remove_file(&probe).await;
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
