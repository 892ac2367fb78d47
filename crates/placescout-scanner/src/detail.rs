use placescout_core::{DetailRecord, DetailSelectors, NOT_AVAILABLE};
use scraper::{Html, Selector};

/// Extracts address, website and phone from a rendered detail page.
///
/// Each field is extracted independently; a field that cannot be found
/// falls back to [`NOT_AVAILABLE`] without affecting the others.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    selectors: DetailSelectors,
}

impl DetailExtractor {
    pub fn new(selectors: DetailSelectors) -> Self {
        Self { selectors }
    }

    pub fn extract(&self, html: &str) -> DetailRecord {
        let document = Html::parse_document(html);

        let address = Self::texts(&document, "address", &self.selectors.address);
        let website = Self::texts(&document, "website", &self.selectors.website);
        let phone = Self::texts(&document, "phone", &self.selectors.phone_candidates);

        DetailRecord {
            address: Self::or_not_available("address", address.into_iter().next()),
            website: Self::or_not_available("website", website.into_iter().next()),
            // Any block containing '+' is taken as the phone number. Other
            // fields containing '+' are misread as phones.
            phone: Self::or_not_available(
                "phone",
                phone.into_iter().find(|text| text.contains('+')),
            ),
        }
    }

    /// Trimmed text of every element matching `selector`, in document order.
    fn texts(document: &Html, field: &str, selector: &str) -> Vec<String> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid {} selector '{}': {}", field, selector, e);
                return Vec::new();
            }
        };

        document
            .select(&parsed)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }

    fn or_not_available(field: &str, text: Option<String>) -> String {
        match text {
            Some(text) if !text.is_empty() => text,
            _ => {
                tracing::debug!("No {} found on detail page", field);
                NOT_AVAILABLE.to_string()
            }
        }
    }
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new(DetailSelectors::default())
    }
}
