use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A browsing session whose pages share cookies and storage
///
/// Crawl logic only talks to this trait, so any engine able to open a page
/// (headless Chrome, plain HTTP, a fake in tests) can drive a crawl.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: BrowserPage;

    /// Open a fresh page in the shared context
    async fn open_page(&self) -> Result<Self::Page>;

    /// Name of the backend, for logging
    fn backend_name(&self) -> &'static str;
}

/// A single page/tab
#[async_trait]
pub trait BrowserPage: Send {
    /// Load `url`, returning once the document has been parsed
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `selector` is present
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Text content of every element matching `selector`
    fn texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Value of attribute `name` on every matching element that has it
    fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>>;

    /// Text content of the first element matching `selector`
    fn text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.texts(selector)?.into_iter().next())
    }

    /// Release the page. Errors are logged, not returned.
    async fn close(&mut self);
}
