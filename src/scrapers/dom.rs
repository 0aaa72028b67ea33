use crate::error::{Result, ScrapeError};
use scraper::{Html, Selector};

/// Captured markup of a page, queried with CSS selectors
///
/// Backends refresh the snapshot after every navigation or wait, so queries
/// see the document as it was at that point. Parsing happens per query to
/// keep the snapshot `Send`.
#[derive(Debug, Clone, Default)]
pub struct DomSnapshot {
    html: String,
}

impl DomSnapshot {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn byte_len(&self) -> usize {
        self.html.len()
    }

    /// Whether at least one element matches
    pub fn contains(&self, selector: &str) -> Result<bool> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }

    /// Text content of every matching element, in document order
    pub fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect())
    }

    /// Values of `name` on matching elements that carry it
    pub fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document
            .select(&selector)
            .filter_map(|el| el.value().attr(name))
            .map(str::to_string)
            .collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        tracing::debug!("Rejected selector {:?}: {:?}", selector, e);
        ScrapeError::InvalidSelector(selector.to_string())
    })
}
