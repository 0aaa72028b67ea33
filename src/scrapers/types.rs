use std::path::PathBuf;
use std::time::Duration;

/// CSS selectors and markers for the target site's markup
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Every anchor considered by the link collector
    pub anchors: String,
    /// Anchors inside the pager widget of a listing page
    pub pager_links: String,
    /// Exact text of the pager control that leads to the next page
    pub next_marker: String,
    /// Container whose presence means a detail page is ready
    pub marker: String,
    pub title: String,
    pub address: String,
    pub price: String,
    /// Descriptive fragments inside the marker container
    pub datums: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            anchors: "a".to_string(),
            pager_links: "#paginador a".to_string(),
            next_marker: ">".to_string(),
            marker: "div.wrapperDatos".to_string(),
            title: "h1.titulo".to_string(),
            address: "h2.direccion".to_string(),
            price: "span.precio".to_string(),
            datums: "div.wrapperDatos p".to_string(),
        }
    }
}

/// Crawl parameters
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Listing URL without the page parameter
    pub base_url: String,
    /// Only hrefs starting with this prefix are followed
    pub validation_prefix: String,
    /// Scheme and host prepended to relative hrefs
    pub origin: String,
    /// Query parameter carrying the listing page number
    pub page_param: String,
    pub output: PathBuf,
    pub max_properties: usize,
    /// Bound on listing and detail page loads
    pub page_timeout: Duration,
    /// Bound on waiting for the detail page marker
    pub marker_timeout: Duration,
    /// Extra attempts for a listing page before the crawl gives up
    pub listing_retries: u32,
    pub selectors: SiteSelectors,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gallito.com.uy/inmuebles/venta/montevideo".to_string(),
            validation_prefix: "https://www.gallito.com.uy".to_string(),
            origin: "https://www.gallito.com.uy".to_string(),
            page_param: "pag".to_string(),
            output: PathBuf::from("data/inmuebles.csv"),
            max_properties: 2000,
            page_timeout: Duration::from_secs(60),
            marker_timeout: Duration::from_secs(15),
            listing_retries: 2,
            selectors: SiteSelectors::default(),
        }
    }
}

impl CrawlConfig {
    /// URL of listing page `page` (1-based)
    pub fn page_url(&self, page: u32) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.base_url, separator, self.page_param, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_appends_page_parameter() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.page_url(1),
            "https://www.gallito.com.uy/inmuebles/venta/montevideo?pag=1"
        );
        assert_eq!(
            config.page_url(12),
            "https://www.gallito.com.uy/inmuebles/venta/montevideo?pag=12"
        );
    }

    #[test]
    fn page_url_extends_existing_query() {
        let config = CrawlConfig {
            base_url: "https://example.com/list?orden=precio".to_string(),
            ..CrawlConfig::default()
        };
        assert_eq!(config.page_url(3), "https://example.com/list?orden=precio&pag=3");
    }
}
