//! Bezrealitky adapter, scraping the server-rendered listing page.

use crate::error::SourceError;
use crate::models::{AdRecord, Layout};
use crate::sources::fetch::PageFetcher;
use crate::sources::parse::{parse_floor_area, parse_price};
use crate::sources::traits::AdSource;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const SOURCE_NAME: &str = "bezrealitky";
const BASE_URL: &str = "https://www.bezrealitky.cz";
const LISTING_URL: &str = "https://www.bezrealitky.cz/vypis/nabidka-prodej/byt/praha";

/// Scrapes apartment sale listings from www.bezrealitky.cz.
pub struct BezrealitkySource {
    fetcher: Arc<dyn PageFetcher>,
}

impl BezrealitkySource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl AdSource for BezrealitkySource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_latest(&self) -> Result<Vec<AdRecord>, SourceError> {
        let html = self
            .fetcher
            .fetch(LISTING_URL)
            .await
            .map_err(|e| SourceError::fetch(SOURCE_NAME, e))?;
        let records = parse_listing(&html);
        debug!("Parsed {} ads from {}", records.len(), SOURCE_NAME);
        Ok(records)
    }
}

/// Extract ad records from the listing page. Cards that are missing the
/// required fields (title, absolute URL) are skipped with a warning rather
/// than failing the whole page.
fn parse_listing(html: &str) -> Vec<AdRecord> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("article.propertyCard").unwrap();
    let title_selector = Selector::parse("h2.propertyCard-title a").unwrap();
    let address_selector = Selector::parse("p.propertyCard-address").unwrap();
    let price_selector = Selector::parse("strong.propertyCard-price").unwrap();
    let text_selector = Selector::parse("p.propertyCard-description").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let base = Url::parse(BASE_URL).unwrap();
    let mut records = Vec::new();

    for (idx, card) in document.select(&card_selector).enumerate() {
        let Some(title_el) = card.select(&title_selector).next() else {
            warn!("Skipping card {}: no title element", idx);
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();

        let href = title_el.value().attr("href").unwrap_or("");
        let url = match base.join(href) {
            Ok(u) if !href.is_empty() => u.to_string(),
            _ => {
                warn!("Skipping card {} ('{}'): no usable link", idx, title);
                continue;
            }
        };

        let address = card
            .select(&address_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let text = card
            .select(&text_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let price_text = card
            .select(&price_selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();
        let (price, price_comment, currency) = parse_price(&price_text);

        let image_url = card
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| base.join(src).ok())
            .map(|u| u.to_string());

        records.push(AdRecord {
            source: SOURCE_NAME.to_string(),
            title: title.clone(),
            text,
            price,
            price_comment,
            currency,
            layout: Layout::parse(&title),
            address,
            floor_area: parse_floor_area(&title),
            extra_fees: None,
            url,
            image_url,
            published_at: None,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use rust_decimal::Decimal;

    const FIXTURE: &str = r#"
        <html><body>
        <article class="propertyCard">
            <h2 class="propertyCard-title">
                <a href="/nemovitosti-byty-domy/812345-nabidka-prodej-bytu">Prodej bytu 2+kk, 45 m²</a>
            </h2>
            <p class="propertyCard-address">Vršovická, Praha 10</p>
            <p class="propertyCard-description">Světlý byt po rekonstrukci.</p>
            <strong class="propertyCard-price">5 195 000 Kč</strong>
            <img src="https://cdn.bezrealitky.cz/812345.jpg" />
        </article>
        <article class="propertyCard">
            <h2 class="propertyCard-title">
                <a href="/nemovitosti-byty-domy/812346-nabidka-prodej-bytu">Prodej bytu 3+1, 72 m²</a>
            </h2>
            <p class="propertyCard-address">Veveří, Brno</p>
            <strong class="propertyCard-price">Cena dohodou</strong>
        </article>
        <article class="propertyCard">
            <h2 class="propertyCard-title"><a href="">Bez odkazu</a></h2>
        </article>
        </body></html>
    "#;

    #[test]
    fn parses_cards_from_listing_page() {
        let records = parse_listing(FIXTURE);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.source, "bezrealitky");
        assert_eq!(first.title, "Prodej bytu 2+kk, 45 m²");
        assert_eq!(first.text, "Světlý byt po rekonstrukci.");
        assert_eq!(first.address, "Vršovická, Praha 10");
        assert_eq!(first.price, Decimal::from(5_195_000));
        assert_eq!(first.currency, Currency::Czk);
        assert_eq!(first.layout, Layout::TwoPlusKk);
        assert_eq!(first.floor_area, Decimal::from(45));
        assert_eq!(
            first.url,
            "https://www.bezrealitky.cz/nemovitosti-byty-domy/812345-nabidka-prodej-bytu"
        );
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://cdn.bezrealitky.cz/812345.jpg")
        );

        let second = &records[1];
        assert_eq!(second.price, Decimal::ZERO);
        assert_eq!(second.price_comment.as_deref(), Some("Cena dohodou"));
        assert_eq!(second.text, "");
    }

    #[test]
    fn zero_cards_is_empty_not_error() {
        assert!(parse_listing("<html><body></body></html>").is_empty());
    }
}
