//! In-memory browser session for exercising crawl logic without a browser.

use crate::error::{Result, ScrapeError};
use crate::scrapers::dom::DomSnapshot;
use crate::scrapers::traits::{BrowserPage, BrowserSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct SiteState {
    pages: Mutex<HashMap<String, String>>,
    /// Remaining forced navigation failures per URL
    failures: Mutex<HashMap<String, u32>>,
    visits: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// Serves canned HTML per URL and records what the crawler did
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<SiteState>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.state
            .pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.into());
        self
    }

    /// Make the next `times` navigations to `url` fail
    pub fn failing(self, url: &str, times: u32) -> Self {
        self.state
            .failures
            .lock()
            .unwrap()
            .insert(url.to_string(), times);
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.state.visits.lock().unwrap().clone()
    }

    pub fn visit_count(&self, url: &str) -> usize {
        self.visits().iter().filter(|v| v.as_str() == url).count()
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserSession for FakeSite {
    type Page = FakePage;

    async fn open_page(&self) -> Result<FakePage> {
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            state: Arc::clone(&self.state),
            dom: DomSnapshot::default(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakePage {
    state: Arc<SiteState>,
    dom: DomSnapshot,
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.state.visits.lock().unwrap().push(url.to_string());

        let forced_failure = {
            let mut failures = self.state.failures.lock().unwrap();
            match failures.get_mut(url) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if forced_failure {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "simulated timeout".to_string(),
            });
        }

        let html = self.state.pages.lock().unwrap().get(url).cloned();
        match html {
            Some(html) => {
                self.dom = DomSnapshot::new(html);
                Ok(())
            }
            None => Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            }),
        }
    }

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
        self.state.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Listing page markup with the given hrefs and an optional "next" control
pub fn listing_html(hrefs: &[&str], has_next: bool) -> String {
    let pager: &[&str] = if has_next { &["1", "2", "&gt;"] } else { &["1", "2"] };
    listing_html_with_pager(hrefs, pager)
}

/// Listing page markup whose pager anchors carry exactly `labels`
pub fn listing_html_with_pager(hrefs: &[&str], labels: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">ver</a>"#))
        .collect();
    let pager: String = labels
        .iter()
        .map(|label| format!(r##"<a href="#">{label}</a>"##))
        .collect();
    format!(
        r#"<html><body><div class="listado">{anchors}</div>
        <div id="paginador">{pager}</div></body></html>"#
    )
}

/// Detail page markup in the site's layout
pub fn detail_html(title: &str, address: &str, price: &str, datums: &[&str]) -> String {
    let paragraphs: String = datums.iter().map(|d| format!("<p>{d}</p>")).collect();
    format!(
        r#"<html><body>
        <h1 class="titulo">{title}</h1>
        <h2 class="direccion">{address}</h2>
        <span class="precio">{price}</span>
        <div class="wrapperDatos">{paragraphs}</div>
        </body></html>"#
    )
}
