//! Sreality adapter, backed by the portal's JSON listing API.

use crate::error::SourceError;
use crate::models::{AdRecord, Currency, Layout};
use crate::sources::fetch::PageFetcher;
use crate::sources::parse::parse_floor_area;
use crate::sources::traits::AdSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

const SOURCE_NAME: &str = "sreality";
const LISTING_URL: &str =
    "https://www.sreality.cz/api/cs/v2/estates?category_main_cb=1&category_type_cb=1&per_page=60";

/// Scrapes apartment sale listings from www.sreality.cz.
pub struct SrealitySource {
    fetcher: Arc<dyn PageFetcher>,
}

impl SrealitySource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl AdSource for SrealitySource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_latest(&self) -> Result<Vec<AdRecord>, SourceError> {
        let body = self
            .fetcher
            .fetch(LISTING_URL)
            .await
            .map_err(|e| SourceError::fetch(SOURCE_NAME, e))?;
        let records = parse_estates(&body).map_err(|e| SourceError::parse(SOURCE_NAME, e))?;
        debug!("Parsed {} ads from {}", records.len(), SOURCE_NAME);
        Ok(records)
    }
}

/// Map the API payload to ad records. An empty estates array is a valid
/// zero-ad page; a payload without the estates array at all is malformed.
fn parse_estates(body: &str) -> Result<Vec<AdRecord>, String> {
    let doc: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("invalid json: {e}"))?;
    let estates = doc["_embedded"]["estates"]
        .as_array()
        .ok_or_else(|| "missing _embedded.estates".to_string())?;

    let mut records = Vec::with_capacity(estates.len());
    for estate in estates {
        let Some(hash_id) = estate["hash_id"].as_i64() else {
            warn!("Skipping estate without hash_id");
            continue;
        };
        let title = estate["name"].as_str().unwrap_or("").to_string();
        let address = match &estate["locality"] {
            serde_json::Value::String(s) => s.clone(),
            other => other["value"].as_str().unwrap_or("").to_string(),
        };

        let raw_price = estate["price_czk"]["value_raw"].as_i64().unwrap_or(0);
        let (price, price_comment) = if raw_price > 0 {
            (Decimal::from(raw_price), None)
        } else {
            let comment = estate["price_czk"]["name"]
                .as_str()
                .map(|s| s.to_string());
            (Decimal::ZERO, comment)
        };

        let image_url = estate["_links"]["images"]
            .as_array()
            .and_then(|imgs| imgs.first())
            .and_then(|img| img["href"].as_str())
            .map(|s| s.to_string());

        records.push(AdRecord {
            source: SOURCE_NAME.to_string(),
            title: title.clone(),
            text: String::new(),
            price,
            price_comment,
            currency: Currency::Czk,
            layout: Layout::parse(&title),
            address,
            floor_area: parse_floor_area(&title),
            extra_fees: None,
            url: format!("https://www.sreality.cz/detail/{hash_id}"),
            image_url,
            published_at: None,
        });
    }
    Ok(records)
}
