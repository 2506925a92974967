//! Error types for the browser capability and site configuration seams.
//!
//! Run-level failures (geo-block, load error, missing content) are not errors
//! in this sense: they are reported through [`crate::models::AbortReason`] so
//! the caller always gets a report back. The types here describe what can go
//! wrong while talking to the page or reading configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("element unreadable: {0}")]
    Element(String),

    #[error("no document loaded")]
    NotLoaded,

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("driver error: {0}")]
    Driver(String),
}

impl DriverError {
    /// Whether the failure happened while reaching the page rather than while
    /// reading an already loaded one.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigation { .. } | Self::Launch(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid url in config: {0}")]
    Url(#[from] url::ParseError),
}
