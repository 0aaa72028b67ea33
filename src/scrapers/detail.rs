use crate::error::Result;
use crate::models::PropertyRecord;
use crate::scrapers::traits::{BrowserPage, BrowserSession};
use crate::scrapers::types::CrawlConfig;
use tracing::{debug, info};

const OPERATION_KEYWORDS: [&str; 2] = ["venta", "alquiler"];
const AREA_KEYWORD: &str = "mts";
const BATHROOM_KEYWORD: &str = "baño";
const BEDROOM_KEYWORD: &str = "dormitorio";

/// Field a descriptive fragment ("datum") is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatumKind {
    Operation,
    Area,
    Bathrooms,
    Bedrooms,
    Neighborhood,
}

impl DatumKind {
    /// Case-insensitive keyword match, first rule wins
    pub fn of(datum: &str) -> Self {
        let lower = datum.to_lowercase();
        if OPERATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            DatumKind::Operation
        } else if lower.contains(AREA_KEYWORD) {
            DatumKind::Area
        } else if lower.contains(BATHROOM_KEYWORD) {
            DatumKind::Bathrooms
        } else if lower.contains(BEDROOM_KEYWORD) {
            DatumKind::Bedrooms
        } else {
            DatumKind::Neighborhood
        }
    }
}

/// Classified datums of one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatumFields {
    pub operation: String,
    pub area: String,
    pub bathrooms: String,
    pub bedrooms: String,
    pub neighborhood: String,
}

impl DatumFields {
    /// Assign each datum to its field. A later datum of the same kind
    /// replaces an earlier one.
    ///
    /// Neighborhood is the catch-all, so a page with several unrecognised
    /// datums keeps only the last of them.
    pub fn classify<S: AsRef<str>>(datums: &[S]) -> Self {
        let mut fields = Self::default();
        for datum in datums {
            let datum = datum.as_ref();
            let slot = match DatumKind::of(datum) {
                DatumKind::Operation => &mut fields.operation,
                DatumKind::Area => &mut fields.area,
                DatumKind::Bathrooms => &mut fields.bathrooms,
                DatumKind::Bedrooms => &mut fields.bedrooms,
                DatumKind::Neighborhood => &mut fields.neighborhood,
            };
            *slot = datum.trim().to_string();
        }
        fields
    }
}

/// Visit one detail page in a fresh page of `session` and build its record
///
/// The page is closed whether or not extraction succeeds. Any error means
/// the URL yields no record.
pub async fn extract_property<S: BrowserSession>(
    session: &S,
    url: &str,
    config: &CrawlConfig,
) -> Result<PropertyRecord> {
    let mut page = session.open_page().await?;
    info!("Extracting: {}", url);

    let result = scrape_detail(&mut page, url, config).await;
    page.close().await;
    result
}

async fn scrape_detail<P: BrowserPage>(
    page: &mut P,
    url: &str,
    config: &CrawlConfig,
) -> Result<PropertyRecord> {
    let selectors = &config.selectors;

    page.navigate(url, config.page_timeout).await?;
    page.wait_for_selector(&selectors.marker, config.marker_timeout).await?;

    let title = page.text(&selectors.title)?.unwrap_or_default();
    let address = page.text(&selectors.address)?.unwrap_or_default();
    let price = page.text(&selectors.price)?.unwrap_or_default();
    let datums = page.texts(&selectors.datums)?;
    debug!("Found {} datums on {}", datums.len(), url);

    let fields = DatumFields::classify(datums.as_slice());

    Ok(PropertyRecord {
        title: title.trim().to_string(),
        address: address.trim().to_string(),
        price: price.trim().to_string(),
        operation: fields.operation,
        neighborhood: fields.neighborhood,
        bedrooms: fields.bedrooms,
        bathrooms: fields.bathrooms,
        area: fields.area,
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::scrapers::testing::{detail_html, FakeSite};

    const URL: &str = "https://www.gallito.com.uy/apartamento-en-pocitos-24811207";

    #[test]
    fn classifies_the_usual_datums() {
        let fields =
            DatumFields::classify(&["Venta", "120 mts", "2 dormitorios", "1 baño", "Pocitos"]);
        assert_eq!(fields.operation, "Venta");
        assert_eq!(fields.area, "120 mts");
        assert_eq!(fields.bedrooms, "2 dormitorios");
        assert_eq!(fields.bathrooms, "1 baño");
        assert_eq!(fields.neighborhood, "Pocitos");
    }

    #[test]
    fn last_unclassified_datum_wins() {
        let fields = DatumFields::classify(&["Pocitos", "Edificio Torre"]);
        assert_eq!(fields.neighborhood, "Edificio Torre");
    }

    #[test]
    fn earlier_rules_take_precedence() {
        assert_eq!(DatumKind::of("ALQUILER"), DatumKind::Operation);
        assert_eq!(DatumKind::of("Venta 85 mts"), DatumKind::Operation);
        assert_eq!(DatumKind::of("45 mts, 1 baño"), DatumKind::Area);
        assert_eq!(DatumKind::of("2 BAÑOS, 3 dormitorios"), DatumKind::Bathrooms);
        assert_eq!(DatumKind::of("Monoambiente"), DatumKind::Neighborhood);
    }

    #[tokio::test]
    async fn builds_a_trimmed_record() {
        let html = detail_html(
            "  Apartamento en Pocitos\n",
            " Av. Brasil 2500 ",
            " U$S 185.000 ",
            &[" Venta ", "120 mts", "2 dormitorios", "1 baño", " Pocitos "],
        );
        let site = FakeSite::new().page(URL, html);

        let record = extract_property(&site, URL, &CrawlConfig::default())
            .await
            .unwrap();

        assert_eq!(
            record,
            PropertyRecord {
                title: "Apartamento en Pocitos".to_string(),
                address: "Av. Brasil 2500".to_string(),
                price: "U$S 185.000".to_string(),
                operation: "Venta".to_string(),
                neighborhood: "Pocitos".to_string(),
                bedrooms: "2 dormitorios".to_string(),
                bathrooms: "1 baño".to_string(),
                area: "120 mts".to_string(),
                url: URL.to_string(),
            }
        );
        assert_eq!(site.opened(), 1);
        assert_eq!(site.closed(), 1);
    }

    #[tokio::test]
    async fn missing_scalars_become_empty_strings() {
        let html = r#"<html><body><div class="wrapperDatos"><p>Alquiler</p></div></body></html>"#;
        let site = FakeSite::new().page(URL, html);

        let record = extract_property(&site, URL, &CrawlConfig::default())
            .await
            .unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.address, "");
        assert_eq!(record.price, "");
        assert_eq!(record.operation, "Alquiler");
    }

    #[tokio::test]
    async fn missing_marker_fails_and_still_closes_the_page() {
        let html = r#"<html><body><h1 class="titulo">Casa</h1></body></html>"#;
        let site = FakeSite::new().page(URL, html);

        let err = extract_property(&site, URL, &CrawlConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::MarkerTimeout { .. }));
        assert_eq!(site.closed(), 1);
    }

    #[tokio::test]
    async fn navigation_failure_closes_the_page() {
        let site = FakeSite::new();

        let err = extract_property(&site, URL, &CrawlConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Navigation { .. }));
        assert_eq!(site.opened(), 1);
        assert_eq!(site.closed(), 1);
    }
}
