//! Live page backed by a headless Chrome session.
//!
//! The session is launched with the same hardening the site needs to serve
//! its client-rendered listing to an automated browser: a desktop window
//! size, a regular desktop user agent and `navigator.webdriver` hidden before
//! any page script runs.
//!
//! The browser process lives as long as the [`ChromePage`]; [`Page::close`]
//! closes the tab and dropping the page shuts the browser down.

use super::{Node, Page};
use crate::errors::DriverError;
use headless_chrome::protocol::cdp::Page as Cdp;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Locations checked for a system browser when none is configured, in order.
const BROWSER_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    /// Explicit browser binary; falls back to [`BROWSER_CANDIDATES`].
    pub binary: Option<PathBuf>,
    /// Default timeout for driver calls.
    pub timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            headless: true,
            binary: None,
            timeout: Duration::from_secs(20),
        }
    }
}

/// First browser binary that exists on this machine.
pub fn discover_binary() -> Option<PathBuf> {
    BROWSER_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

fn driver_err(e: impl std::fmt::Display) -> DriverError {
    DriverError::Driver(e.to_string())
}

fn nav_err(url: &str, e: impl std::fmt::Display) -> DriverError {
    DriverError::Navigation {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

impl<'a> Node for Element<'a> {
    fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError> {
        // headless_chrome reports "no match" as an error; an empty scope is not one here
        Ok(self.find_elements(selector).unwrap_or_default())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.get_attribute_value(name)
            .map_err(|e| DriverError::Element(e.to_string()))
    }

    fn text(&self) -> Result<String, DriverError> {
        self.get_inner_text()
            .map_err(|e| DriverError::Element(e.to_string()))
    }
}

pub struct ChromePage {
    // kept alive for the tab; dropping it kills the browser process
    _browser: Browser,
    tab: Arc<Tab>,
    closed: bool,
}

impl ChromePage {
    #[instrument(level = "info", skip_all, fields(headless = options.headless))]
    pub fn launch(options: &ChromeOptions) -> Result<Self, DriverError> {
        let binary = options.binary.clone().or_else(discover_binary);
        match &binary {
            Some(path) => info!(path = %path.display(), "Using browser binary"),
            None => warn!("No browser binary found; relying on headless_chrome discovery"),
        }

        let args = vec![
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-blink-features=AutomationControlled"),
        ];
        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .path(binary)
            .args(args)
            .idle_browser_timeout(options.timeout * 6)
            .build()
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let browser = Browser::new(launch).map_err(|e| DriverError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Launch(e.to_string()))?;
        tab.set_default_timeout(options.timeout);
        tab.set_user_agent(USER_AGENT, Some("en-GB,en"), None)
            .map_err(driver_err)?;
        tab.call_method(Cdp::AddScriptToEvaluateOnNewDocument {
            source: HIDE_WEBDRIVER.to_string(),
            world_name: None,
            include_command_line_api: None,
            run_immediately: None,
        })
        .map_err(driver_err)?;

        info!("Browser session started");
        Ok(Self {
            _browser: browser,
            tab,
            closed: false,
        })
    }
}

impl Page for ChromePage {
    type Node<'a>
        = Element<'a>
    where
        Self: 'a;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.tab.navigate_to(url).map_err(|e| nav_err(url, e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| nav_err(url, e))?;
        debug!(%url, "Navigation finished");
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        Some(self.tab.get_url())
    }

    fn title(&self) -> Result<String, DriverError> {
        self.tab.get_title().map_err(driver_err)
    }

    fn body_text(&self) -> Result<String, DriverError> {
        self.tab
            .find_element("body")
            .and_then(|body| body.get_inner_text())
            .map_err(driver_err)
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, DriverError> {
        Ok(self.tab.find_elements(selector).unwrap_or_default())
    }

    fn wait_for(&self, selector: &str, budget: Duration) -> bool {
        self.tab
            .wait_for_element_with_custom_timeout(selector, budget)
            .is_ok()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.tab.close(true) {
            warn!(error = %e, "Failed to close browser tab");
        } else {
            info!("Browser session closed");
        }
    }
}
