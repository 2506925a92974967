//! The resilient extraction pipeline for the football news listing.
//!
//! The listing is rendered client-side and its markup changes without
//! notice, so every step has fallbacks:
//!
//! 1. **Health**: [`health`] tells a real listing apart from a regional
//!    restriction notice or an error page
//! 2. **Locating**: [`locator`] finds the repeating card elements through an
//!    ordered list of selector strategies
//! 3. **Fields**: [`fields`] pulls league, title, link and image out of each
//!    card through per-field cascades
//! 4. **Orchestration**: [`pipeline`] runs the steps against one page session
//!    and reports either the records or a specific abort reason
//!
//! # Failure Handling
//!
//! | Level | Failure | Handling |
//! |-------|---------|----------|
//! | Run | navigation, geo-block, load error, no content | abort with reason |
//! | Card | card element unreadable | card skipped, logged |
//! | Field | strategy errors or finds nothing | next strategy, else `None` |

pub mod fields;
pub mod health;
pub mod locator;
pub mod pipeline;
