use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output header, in column order: title, address, price, operation,
/// neighborhood, bedrooms, bathrooms, area, url.
///
/// Existing consumers of the CSV read these Spanish names.
pub const CSV_COLUMNS: [&str; 9] = [
    "titulo",
    "direccion",
    "precio",
    "operacion",
    "barrio",
    "dormitorios",
    "banos",
    "metros",
    "url",
];

/// One scraped listing
///
/// Every field is a trimmed string; an empty string means the page did not
/// carry that piece of information. Field order matches [`CSV_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "precio")]
    pub price: String,
    /// Free text such as "Venta" or "Alquiler"
    #[serde(rename = "operacion")]
    pub operation: String,
    #[serde(rename = "barrio")]
    pub neighborhood: String,
    #[serde(rename = "dormitorios")]
    pub bedrooms: String,
    #[serde(rename = "banos")]
    pub bathrooms: String,
    #[serde(rename = "metros")]
    pub area: String,
    pub url: String,
}

/// A detail page that produced no record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedLink {
    pub url: String,
    pub reason: String,
}

/// Summary of one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages_visited: u32,
    pub links_discovered: usize,
    pub records_extracted: usize,
    pub failed_links: Vec<FailedLink>,
    /// Set when the crawl stopped because a listing page could not be loaded
    pub aborted: Option<String>,
}

/// Everything a crawl hands back to the caller
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub records: Vec<PropertyRecord>,
    pub report: CrawlReport,
}
