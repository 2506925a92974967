//! Output generation for scraped records.
//!
//! # Submodules
//!
//! - [`json`]: writes the record list (and optionally the run report) to disk
//!
//! # Output Structure
//!
//! ```text
//! news.json          # record array, always written
//! report.json        # outcome + records, with --report
//! ```

pub mod json;
