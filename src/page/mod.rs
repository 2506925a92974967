//! Page capability used by the extraction pipeline.
//!
//! The pipeline never talks to a browser directly. It needs a handful of
//! operations, expressed by two traits:
//!
//! - [`Page`]: navigate, read title/body, find elements in the document
//! - [`Node`]: find elements within an element, read attributes and text
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | In-memory DOM | [`snapshot`] | `scraper` parse of a saved document; tests and `--snapshot` |
//! | Headless Chrome | [`chrome`] | live rendering, behind the `chrome` feature |

use crate::errors::DriverError;
use std::time::Duration;

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod snapshot;

pub use snapshot::SnapshotPage;

/// A DOM element handle.
pub trait Node: Sized {
    /// Descendants of this element matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError>;

    /// Raw attribute value, `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;

    /// Text content of the element, uncollapsed.
    fn text(&self) -> Result<String, DriverError>;

    /// First descendant matching `selector`.
    fn find_first(&self, selector: &str) -> Result<Option<Self>, DriverError> {
        Ok(self.find_all(selector)?.into_iter().next())
    }
}

/// A browser tab (or an equivalent) showing one document at a time.
pub trait Page {
    type Node<'a>: Node
    where
        Self: 'a;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    fn current_url(&self) -> Option<String>;

    fn title(&self) -> Result<String, DriverError>;

    fn body_text(&self) -> Result<String, DriverError>;

    /// Elements of the whole document matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, DriverError>;

    /// Wait up to `budget` for `selector` to match. Returns whether it did.
    fn wait_for(&self, selector: &str, _budget: Duration) -> bool {
        self.find_all(selector).is_ok_and(|found| !found.is_empty())
    }

    /// Release the underlying session. Called exactly once per run.
    fn close(&mut self) {}
}
