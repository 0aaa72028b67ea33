use crate::error::{Result, ScrapeError};
use crate::scrapers::dom::DomSnapshot;
use crate::scrapers::traits::{BrowserPage, BrowserSession};
use anyhow::Context;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Browser session backed by a headless Chrome process
///
/// Tabs are opened in the browser's default context, so cookies set by one
/// page are visible to the next. The Chrome process is shut down when the
/// session is dropped.
pub struct ChromeSession {
    browser: Browser,
}

impl ChromeSession {
    /// Launch Chrome. `idle_timeout` must exceed the longest expected page load.
    pub fn launch(headless: bool, idle_timeout: Duration) -> anyhow::Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .idle_browser_timeout(idle_timeout)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options)
            .context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    async fn open_page(&self) -> Result<ChromePage> {
        let tab = self.browser.new_tab().map_err(ScrapeError::Browser)?;
        Ok(ChromePage {
            tab,
            dom: DomSnapshot::default(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "chrome"
    }
}

/// One Chrome tab plus the markup captured after its last load or wait
pub struct ChromePage {
    tab: Arc<Tab>,
    dom: DomSnapshot,
}

impl ChromePage {
    fn capture(&mut self) -> Result<()> {
        let html = self.tab.get_content().map_err(ScrapeError::Browser)?;
        self.dom = DomSnapshot::new(html);
        debug!("Captured {} bytes of HTML", self.dom.byte_len());
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("{e:#}"),
            })?;
        self.capture()
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        if let Err(e) = self.tab.wait_for_element_with_custom_timeout(selector, timeout) {
            debug!("Waiting for {:?} failed: {:#}", selector, e);
            return Err(ScrapeError::MarkerTimeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        // The element may have been rendered after the navigation snapshot
        self.capture()
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.dom.texts(selector)
    }

    fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        self.dom.attributes(selector, name)
    }

    async fn close(&mut self) {
        if let Err(e) = self.tab.close(true) {
            warn!("Failed to close tab: {:#}", e);
        }
    }
}
