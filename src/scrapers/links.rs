use crate::error::Result;
use crate::scrapers::traits::BrowserPage;
use crate::scrapers::types::CrawlConfig;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Detail links end with `-` and an eight digit listing id, nothing after it.
fn listing_id_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-[0-9]{8}$").unwrap())
}

/// Detail-page URLs in discovery order, unique by value
///
/// Also the crawl frontier: links before the cursor have been attempted,
/// the rest are pending. The set never shrinks.
#[derive(Debug, Default)]
pub struct LinkSet {
    seen: HashSet<String>,
    order: Vec<String>,
    cursor: usize,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the URL was already known
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.order.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Hand out the oldest link not yet attempted
    pub fn next_pending(&mut self) -> Option<String> {
        let url = self.order.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Absolute detail URL for `href`, or `None` if it is not a detail link
pub fn candidate_url(href: &str, validation_prefix: &str, origin: &str) -> Option<String> {
    if !href.starts_with(validation_prefix) {
        return None;
    }

    if !listing_id_suffix().is_match(href) {
        return None;
    }

    if href.starts_with("http") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        Some(format!("{}{}", origin.trim_end_matches('/'), href))
    } else {
        Some(format!("{}/{}", origin.trim_end_matches('/'), href))
    }
}

/// Add every detail link on the loaded listing page to `links`
///
/// Returns how many links were new.
pub fn collect_links<P: BrowserPage>(
    page: &P,
    config: &CrawlConfig,
    links: &mut LinkSet,
) -> Result<usize> {
    let hrefs = page.attributes(&config.selectors.anchors, "href")?;

    let mut added = 0;
    for href in &hrefs {
        if let Some(url) = candidate_url(href, &config.validation_prefix, &config.origin) {
            if links.insert(url) {
                added += 1;
            }
        }
    }

    debug!(
        "Scanned {} anchors, {} new links, {} known",
        hrefs.len(),
        added,
        links.len()
    );
    Ok(added)
}
