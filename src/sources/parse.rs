//! Small parse helpers shared by the portal adapters.

use crate::models::Currency;
use rust_decimal::Decimal;

/// Parse a displayed price like "5 195 000 Kč" or "189 €".
///
/// Returns the amount, an optional comment and the detected currency. When
/// the text carries no digits at all ("Cena na vyžádání"), the amount is
/// zero and the trimmed text becomes the comment.
pub fn parse_price(text: &str) -> (Decimal, Option<String>, Currency) {
    let currency = detect_currency(text);
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let normalized = digits.replace(',', ".");
    match normalized.parse::<Decimal>() {
        Ok(amount) if amount > Decimal::ZERO => (amount, None, currency),
        _ => {
            let trimmed = text.trim();
            let comment = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
            (Decimal::ZERO, comment, currency)
        }
    }
}

/// Extract a floor area from text like "Prodej bytu 2+kk, 45,5 m²".
///
/// Returns zero when no area is present.
pub fn parse_floor_area(text: &str) -> Decimal {
    let Some(m2_pos) = text.find("m²").or_else(|| text.find("m2")) else {
        return Decimal::ZERO;
    };
    let chars: Vec<char> = text[..m2_pos].chars().collect();
    let mut end = chars.len();
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    // Walk backwards over the digit run; a separator only counts while a
    // digit keeps the run going, so "3+1, 72,5" stops at the comma.
    let mut start = end;
    while start > 0 {
        let c = chars[start - 1];
        if c.is_ascii_digit() {
            start -= 1;
        } else if (c == ',' || c == '.' || c == ' ')
            && start >= 2
            && chars[start - 2].is_ascii_digit()
        {
            start -= 1;
        } else {
            break;
        }
    }
    let number: String = chars[start..end].iter().collect();
    let cleaned = number.replace(' ', "").replace(',', ".");
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

fn detect_currency(text: &str) -> Currency {
    if text.contains("Kč") || text.to_lowercase().contains("czk") {
        Currency::Czk
    } else if text.contains('€') || text.to_lowercase().contains("eur") {
        Currency::Eur
    } else if text.contains('$') || text.to_lowercase().contains("usd") {
        Currency::Usd
    } else {
        Currency::Other
    }
}
