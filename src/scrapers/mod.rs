pub mod browser;
pub mod crawler;
pub mod detail;
pub mod dom;
pub mod http;
pub mod links;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use browser::ChromeSession;
pub use crawler::Crawler;
pub use http::HttpSession;
pub use traits::{BrowserPage, BrowserSession};
pub use types::{CrawlConfig, SiteSelectors};
