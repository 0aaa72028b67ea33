use anyhow::Result;
use clap::{Parser, ValueEnum};
use gallito_scout::models::CrawlOutcome;
use gallito_scout::output;
use gallito_scout::scrapers::{BrowserSession, ChromeSession, CrawlConfig, Crawler, HttpSession};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Headless Chrome, renders scripts
    Chrome,
    /// Plain HTTP fetches of the server-rendered markup
    Http,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Gallito Scout - real-estate listings scraper")]
struct Args {
    /// Path to output CSV file (columns: titulo, direccion, precio, operacion,
    /// barrio, dormitorios, banos, metros, url)
    #[arg(short, long, default_value = "data/inmuebles.csv")]
    output: PathBuf,

    /// Maximum number of properties to extract
    #[arg(short, long, default_value_t = 2000)]
    max_properties: usize,

    /// Listing URL, without the page parameter
    #[arg(long, default_value = "https://www.gallito.com.uy/inmuebles/venta/montevideo")]
    base_url: String,

    /// Only links starting with this prefix are followed
    #[arg(long, default_value = "https://www.gallito.com.uy")]
    validation_prefix: String,

    /// Scheme and host used to complete relative links
    #[arg(long, default_value = "https://www.gallito.com.uy")]
    origin: String,

    /// Engine used to load pages
    #[arg(long, value_enum, default_value_t = Backend::Chrome)]
    backend: Backend,

    /// Show the Chrome window instead of running headless
    #[arg(long)]
    show_browser: bool,

    /// Timeout for loading a listing or detail page
    #[arg(long, default_value_t = 60)]
    page_timeout_secs: u64,

    /// Timeout for a detail page's data block to appear
    #[arg(long, default_value_t = 15)]
    marker_timeout_secs: u64,

    /// Extra attempts for a listing page before giving up
    #[arg(long, default_value_t = 2)]
    listing_retries: u32,

    /// Also write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            base_url: self.base_url.clone(),
            validation_prefix: self.validation_prefix.clone(),
            origin: self.origin.clone(),
            output: self.output.clone(),
            max_properties: self.max_properties,
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            marker_timeout: Duration::from_secs(self.marker_timeout_secs),
            listing_retries: self.listing_retries,
            ..CrawlConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.crawl_config();

    info!("🏠 Gallito Scout");
    info!("================");

    let outcome = match args.backend {
        Backend::Chrome => {
            let session = ChromeSession::launch(!args.show_browser, config.page_timeout * 2)?;
            crawl_with(session, &config).await
        }
        Backend::Http => crawl_with(HttpSession::new()?, &config).await,
    };

    // Records are saved even when the crawl stopped early
    output::write_csv(&outcome.records, &config.output).await?;
    if let Some(path) = &args.report {
        output::write_report(&outcome.report, path).await?;
    }

    info!(
        "✅ Scraping finished. Saved {} properties to '{}' ({} pages, {} failed links)",
        outcome.records.len(),
        config.output.display(),
        outcome.report.pages_visited,
        outcome.report.failed_links.len()
    );

    if let Some(reason) = &outcome.report.aborted {
        anyhow::bail!("Crawl stopped before completion: {}", reason);
    }

    Ok(())
}

/// Run a crawl and release the session before handing back the outcome
async fn crawl_with<S: BrowserSession>(session: S, config: &CrawlConfig) -> CrawlOutcome {
    let outcome = Crawler::new(&session, config).run().await;
    drop(session);
    info!("Browser session closed");
    outcome
}
