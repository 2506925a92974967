//! In-memory page backed by `scraper`.
//!
//! A [`SnapshotPage`] holds already rendered HTML documents keyed by URL.
//! Navigating parses the registered document; navigating to an unknown URL
//! fails the way a dead link would. This gives the pipeline a deterministic
//! DOM to run against, both in tests and for `--snapshot` runs over a saved
//! page.

use super::{Node, Page};
use crate::errors::DriverError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

fn parse_selector(selector: &str) -> Result<Selector, DriverError> {
    Selector::parse(selector).map_err(|e| DriverError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text nodes concatenated as-is; inline markup adds no separator.
fn joined_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

impl<'a> Node for ElementRef<'a> {
    fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError> {
        let selector = parse_selector(selector)?;
        Ok(self.select(&selector).collect())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.value().attr(name).map(str::to_string))
    }

    fn text(&self) -> Result<String, DriverError> {
        Ok(joined_text(*self))
    }
}

#[derive(Default)]
pub struct SnapshotPage {
    documents: HashMap<String, String>,
    current: Option<(String, Html)>,
}

impl SnapshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML served for `url`.
    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }

    fn document(&self) -> Result<&Html, DriverError> {
        self.current
            .as_ref()
            .map(|(_, html)| html)
            .ok_or(DriverError::NotLoaded)
    }
}

impl Page for SnapshotPage {
    type Node<'a>
        = ElementRef<'a>
    where
        Self: 'a;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        let raw = self
            .documents
            .get(url)
            .ok_or_else(|| DriverError::Navigation {
                url: url.to_string(),
                reason: "no snapshot registered for url".to_string(),
            })?;
        debug!(%url, bytes = raw.len(), "Loading snapshot document");
        self.current = Some((url.to_string(), Html::parse_document(raw)));
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.current.as_ref().map(|(url, _)| url.clone())
    }

    fn title(&self) -> Result<String, DriverError> {
        let doc = self.document()?;
        let selector = parse_selector("title")?;
        Ok(doc
            .select(&selector)
            .next()
            .map(joined_text)
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn body_text(&self) -> Result<String, DriverError> {
        let doc = self.document()?;
        let selector = parse_selector("body")?;
        Ok(doc.select(&selector).next().map(joined_text).unwrap_or_default())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, DriverError> {
        let doc = self.document()?;
        let selector = parse_selector(selector)?;
        Ok(doc.select(&selector).collect())
    }

    fn close(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.tntsports.co.uk/football/";

    fn page(html: &str) -> SnapshotPage {
        let mut page = SnapshotPage::new().with_document(URL, html);
        page.navigate(URL).unwrap();
        page
    }

    #[test]
    fn test_not_loaded_before_navigation() {
        let page = SnapshotPage::new();
        assert!(matches!(page.title(), Err(DriverError::NotLoaded)));
        assert!(page.current_url().is_none());
    }

    #[test]
    fn test_unknown_url_is_navigation_error() {
        let mut page = SnapshotPage::new();
        let err = page.navigate("https://nowhere.example").unwrap_err();
        assert!(err.is_navigation());
    }

    #[test]
    fn test_title_and_body() {
        let p = page("<html><head><title> Football | TNT Sports </title></head><body><p>Hello</p></body></html>");
        assert_eq!(p.title().unwrap(), "Football | TNT Sports");
        assert!(p.body_text().unwrap().contains("Hello"));
        assert_eq!(p.current_url().as_deref(), Some(URL));
    }

    #[test]
    fn test_scoped_find_and_attributes() {
        let p = page(
            r#"<body>
                <a href="/football/a"><h3>One</h3></a>
                <a href="/football/b"><h3>Two</h3></a>
            </body>"#,
        );
        let anchors = p.find_all("a").unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[1].attribute("href").unwrap().as_deref(), Some("/football/b"));
        assert_eq!(anchors[0].attribute("title").unwrap(), None);
        let heading = anchors[0].find_first("h3").unwrap().unwrap();
        assert_eq!(Node::text(&heading).unwrap(), "One");
        assert!(anchors[0].find_first("img").unwrap().is_none());
    }

    #[test]
    fn test_inline_markup_adds_no_spaces() {
        let p = page("<body><h3>Arsenal<em>'s</em> late <b>win</b></h3></body>");
        let heading = p.find_all("h3").unwrap().remove(0);
        assert_eq!(Node::text(&heading).unwrap(), "Arsenal's late win");
    }

    #[test]
    fn test_bad_selector_is_error() {
        let p = page("<body></body>");
        assert!(matches!(p.find_all("a[").unwrap_err(), DriverError::Selector { .. }));
    }

    #[test]
    fn test_wait_for_and_close() {
        let mut p = page("<body><article></article></body>");
        assert!(p.wait_for("article", std::time::Duration::ZERO));
        assert!(!p.wait_for("section", std::time::Duration::ZERO));
        p.close();
        assert!(matches!(p.body_text(), Err(DriverError::NotLoaded)));
    }
}
