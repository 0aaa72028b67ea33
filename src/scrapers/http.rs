use crate::error::{Result, ScrapeError};
use crate::scrapers::dom::DomSnapshot;
use crate::scrapers::traits::{BrowserPage, BrowserSession};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Session that fetches raw markup over HTTP without running scripts
///
/// Suitable when the site renders its listings server side. All pages share
/// one client and therefore one cookie jar.
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client))
    }

    /// Use an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    type Page = HttpPage;

    async fn open_page(&self) -> Result<HttpPage> {
        Ok(HttpPage {
            client: self.client.clone(),
            dom: DomSnapshot::default(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

pub struct HttpPage {
    client: Client,
    dom: DomSnapshot,
}

impl HttpPage {
    async fn fetch(&self, url: &str, timeout: Duration) -> reqwest::Result<String> {
        self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl BrowserPage for HttpPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let html = self
            .fetch(url, timeout)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Downloaded {} bytes of HTML", html.len());
        self.dom = DomSnapshot::new(html);
        Ok(())
    }

    /// Static markup never changes after the fetch, so this only checks presence.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        if self.dom.contains(selector)? {
            Ok(())
        } else {
            Err(ScrapeError::MarkerTimeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.dom.texts(selector)
    }

    fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        self.dom.attributes(selector, name)
    }

    async fn close(&mut self) {
        self.dom = DomSnapshot::default();
    }
}
