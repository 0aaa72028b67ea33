use crate::error::Result;
use crate::models::{CrawlOutcome, CrawlReport, FailedLink, PropertyRecord};
use crate::scrapers::detail::extract_property;
use crate::scrapers::links::{collect_links, LinkSet};
use crate::scrapers::traits::{BrowserPage, BrowserSession};
use crate::scrapers::types::CrawlConfig;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

/// Everything a crawl accumulates while it runs
#[derive(Debug)]
pub struct CrawlState {
    /// Listing page to load next, 1-based
    pub page: u32,
    pub pages_visited: u32,
    pub links: LinkSet,
    pub records: Vec<PropertyRecord>,
    pub failures: Vec<FailedLink>,
    started_at: DateTime<Utc>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            page: 1,
            pages_visited: 0,
            links: LinkSet::new(),
            records: Vec::new(),
            failures: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn is_full(&self, max_properties: usize) -> bool {
        self.records.len() >= max_properties
    }

    fn finish(self, aborted: Option<String>) -> CrawlOutcome {
        let report = CrawlReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            pages_visited: self.pages_visited,
            links_discovered: self.links.len(),
            records_extracted: self.records.len(),
            failed_links: self.failures,
            aborted,
        };

        CrawlOutcome {
            records: self.records,
            report,
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Pagination driver: walks listing pages and drains their detail links
pub struct Crawler<'a, S> {
    session: &'a S,
    config: &'a CrawlConfig,
}

impl<'a, S: BrowserSession> Crawler<'a, S> {
    pub fn new(session: &'a S, config: &'a CrawlConfig) -> Self {
        Self { session, config }
    }

    /// Crawl until `max_properties` records exist or the pager has no next
    /// control.
    ///
    /// Never fails: a listing page that cannot be loaded ends the crawl, and
    /// the outcome carries the records gathered so far plus the reason.
    pub async fn run(&self) -> CrawlOutcome {
        info!(
            "Crawling {} via {} (max {} properties)",
            self.config.base_url,
            self.session.backend_name(),
            self.config.max_properties
        );

        let mut state = CrawlState::new();
        let aborted = match self.crawl(&mut state).await {
            Ok(()) => None,
            Err(e) => {
                error!("Crawl aborted on page {}: {}", state.page, e);
                Some(e.to_string())
            }
        };

        state.finish(aborted)
    }

    async fn crawl(&self, state: &mut CrawlState) -> Result<()> {
        if state.is_full(self.config.max_properties) {
            return Ok(());
        }

        let mut listing = self.session.open_page().await?;
        let result = self.paginate(&mut listing, state).await;
        listing.close().await;
        result
    }

    async fn paginate(&self, listing: &mut S::Page, state: &mut CrawlState) -> Result<()> {
        while !state.is_full(self.config.max_properties) {
            let url = self.config.page_url(state.page);
            info!("Processing page {}: {}", state.page, url);

            self.load_listing(listing, &url).await?;
            state.pages_visited += 1;

            let added = collect_links(listing, self.config, &mut state.links)?;
            info!(
                "Page {} yielded {} new links ({} pending)",
                state.page,
                added,
                state.links.pending()
            );

            self.drain_pending(state).await;

            if !has_next_page(listing, self.config)? {
                info!("No next page after page {}", state.page);
                break;
            }
            state.page += 1;
        }

        Ok(())
    }

    async fn load_listing(&self, listing: &mut S::Page, url: &str) -> Result<()> {
        let attempts = self.config.listing_retries + 1;
        let mut attempt = 1;
        loop {
            match listing.navigate(url, self.config.page_timeout).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Visit pending links in discovery order until none are left or the
    /// record limit is hit. Failed links are recorded and never retried.
    async fn drain_pending(&self, state: &mut CrawlState) {
        while !state.is_full(self.config.max_properties) {
            let Some(link) = state.links.next_pending() else {
                break;
            };

            match extract_property(self.session, &link, self.config).await {
                Ok(record) => {
                    debug!("Extracted {:?} from {}", record.title, link);
                    state.records.push(record);
                }
                Err(e) => {
                    warn!("Error processing {}: {}", link, e);
                    state.failures.push(FailedLink {
                        url: link,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Whether the pager of the loaded listing page offers a next page
pub fn has_next_page<P: BrowserPage>(page: &P, config: &CrawlConfig) -> Result<bool> {
    let labels = page.texts(&config.selectors.pager_links)?;
    Ok(labels.iter().any(|label| *label == config.selectors.next_marker))
}
