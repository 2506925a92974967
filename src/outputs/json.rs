//! JSON output for scraped records.
//!
//! # Output Structure
//!
//! The records file is a plain array, pretty printed with two-space
//! indentation, one object per card in page order:
//!
//! ```text
//! [
//!   {
//!     "league": "Premier League",
//!     "title": "Arsenal go top",
//!     "link": "https://www.tntsports.co.uk/football/...",
//!     "pic": "https://.../image.jpeg"
//!   }
//! ]
//! ```
//!
//! The optional report file carries the run outcome next to the records.

use crate::models::{NewsRecord, RunReport};
use crate::utils::ensure_writable_parent;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

async fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    ensure_writable_parent(path).await?;
    if let Err(e) = fs::write(path, json).await {
        error!(path = %path.display(), error = %e, "Failed to write JSON");
        return Err(e.into());
    }
    Ok(())
}

/// Write the record list to `path`, creating parent directories as needed.
///
/// An empty slice is written as `[]`, so downstream consumers always find a
/// well-formed file after a run.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_records(records: &[NewsRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    write_pretty(records, path).await?;
    info!(count = records.len(), "Saved news records");
    Ok(())
}

/// Write the full run report (outcome, source URL, counts, records).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &RunReport, path: &Path) -> Result<(), Box<dyn Error>> {
    write_pretty(report, path).await?;
    info!(outcome = ?report.outcome, "Saved run report");
    Ok(())
}
