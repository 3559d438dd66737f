use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency a listing price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    Czk,
    Eur,
    Usd,
    #[default]
    Other,
}

/// Room layout categories used by Czech listing portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Layout {
    OnePlusKk,
    OnePlusOne,
    TwoPlusKk,
    TwoPlusOne,
    ThreePlusKk,
    ThreePlusOne,
    FourPlusKk,
    FourPlusOne,
    FivePlusKk,
    FivePlusOne,
    Other,
    #[default]
    NotSpecified,
}

impl Layout {
    /// Find a layout token ("2+kk", "3+1", ...) anywhere in free text.
    pub fn parse(text: &str) -> Layout {
        let lowered = text.to_lowercase();
        const TOKENS: [(&str, Layout); 10] = [
            ("1+kk", Layout::OnePlusKk),
            ("1+1", Layout::OnePlusOne),
            ("2+kk", Layout::TwoPlusKk),
            ("2+1", Layout::TwoPlusOne),
            ("3+kk", Layout::ThreePlusKk),
            ("3+1", Layout::ThreePlusOne),
            ("4+kk", Layout::FourPlusKk),
            ("4+1", Layout::FourPlusOne),
            ("5+kk", Layout::FivePlusKk),
            ("5+1", Layout::FivePlusOne),
        ];
        for (token, layout) in TOKENS {
            if lowered.contains(token) {
                return layout;
            }
        }
        if lowered.contains("atyp") {
            return Layout::Other;
        }
        Layout::NotSpecified
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Layout::OnePlusKk => "1+kk",
            Layout::OnePlusOne => "1+1",
            Layout::TwoPlusKk => "2+kk",
            Layout::TwoPlusOne => "2+1",
            Layout::ThreePlusKk => "3+kk",
            Layout::ThreePlusOne => "3+1",
            Layout::FourPlusKk => "4+kk",
            Layout::FourPlusOne => "4+1",
            Layout::FivePlusKk => "5+kk",
            Layout::FivePlusOne => "5+1",
            Layout::Other => "other",
            Layout::NotSpecified => "not specified",
        };
        f.write_str(s)
    }
}

/// One listing from one source at fetch time.
///
/// Title, text and address are never absent; the empty string stands in.
/// A zero price means "not parsed", with the portal's wording kept in
/// `price_comment`. A zero floor area means unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub source: String,
    pub title: String,
    pub text: String,
    pub price: Decimal,
    pub price_comment: Option<String>,
    pub currency: Currency,
    pub layout: Layout,
    pub address: String,
    pub floor_area: Decimal,
    pub extra_fees: Option<Decimal>,
    /// Canonical locator for the listing. Always an absolute URL.
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl AdRecord {
    /// A record with only the required fields filled in.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            text: String::new(),
            price: Decimal::ZERO,
            price_comment: None,
            currency: Currency::Other,
            layout: Layout::NotSpecified,
            address: String::new(),
            floor_area: Decimal::ZERO,
            extra_fees: None,
            url: url.into(),
            image_url: None,
            published_at: None,
        }
    }

    /// The identity key used for deduplication.
    pub fn identity(&self) -> AdIdentity {
        AdIdentity {
            source: self.source.clone(),
            title: self.title.clone(),
            text: self.text.clone(),
            price: self.price,
            address: self.address.clone(),
            url: self.url.clone(),
        }
    }
}

/// The subset of fields that decides whether two records are the same listing.
///
/// The URL alone is not enough, since some portals rotate query parameters
/// between visits, so it is combined with the stable descriptive fields.
/// Layout, floor area, price comment, fees, image URL and publish time are
/// excluded on purpose: a listing whose parsed layout or area changes between
/// polls is still the same ad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdIdentity {
    pub source: String,
    pub title: String,
    pub text: String,
    pub price: Decimal,
    pub address: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_non_identity_fields() {
        let mut a = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        a.floor_area = Decimal::from(45);
        let mut b = a.clone();
        b.floor_area = Decimal::from(50);
        b.layout = Layout::TwoPlusKk;
        b.image_url = Some("https://example.com/img.jpg".to_string());
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_distinguishes_url() {
        let a = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        let b = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/2");
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn identity_distinguishes_price() {
        let a = AdRecord::new("sreality", "Prodej bytu", "https://example.com/1");
        let mut b = a.clone();
        b.price = Decimal::from(5_195_000);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn layout_parse_finds_token_in_title() {
        assert_eq!(Layout::parse("Prodej bytu 2+kk, 45 m²"), Layout::TwoPlusKk);
        assert_eq!(Layout::parse("Pronájem bytu 3+1 Praha"), Layout::ThreePlusOne);
        assert_eq!(Layout::parse("Byt atypický, Brno"), Layout::Other);
        assert_eq!(Layout::parse("Prodej domu"), Layout::NotSpecified);
    }

    #[test]
    fn layout_displays_portal_notation() {
        assert_eq!(Layout::TwoPlusKk.to_string(), "2+kk");
        assert_eq!(Layout::NotSpecified.to_string(), "not specified");
    }
}
