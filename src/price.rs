//! Free-text price parsing

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numbers::parse_number;

/// Currency symbols and ISO codes, longest first so `R$` wins over `$`.
static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"R\$|C\$|A\$|NZ\$|HK\$|US\$|zł|Kč|\$|€|£|¥|₹|₽|₩|₺|₴|₪|₫|฿|\b(?:USD|EUR|GBP|JPY|CAD|AUD|NZD|CHF|SEK|NOK|DKK|PLN|CZK|HUF|INR|BRL|RUB|CNY|TRY|UAH|MXN|ZAR)\b",
    )
    .expect("valid currency regex")
});

/// First number-like run, group separators included.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9][0-9.,' \u{a0}]*[0-9]|[0-9]").expect("valid amount regex")
});

/// A price as found in a page: the parsed amount, the currency marker and the
/// raw amount text it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub amount_text: Option<String>,
}

impl Price {
    /// Parse a price from text, preferring a currency found in `currency_hint`.
    pub fn from_text(text: Option<&str>, currency_hint: Option<&str>) -> Self {
        let currency = currency_hint
            .and_then(find_currency)
            .or_else(|| text.and_then(find_currency));
        let amount_text = text.and_then(find_amount_text);
        let amount = amount_text.as_deref().and_then(parse_number);

        Self {
            amount,
            currency: currency.map(str::to_owned),
            amount_text,
        }
    }
}

fn find_currency(text: &str) -> Option<&str> {
    CURRENCY_RE.find(text).map(|m| m.as_str())
}

fn find_amount_text(text: &str) -> Option<String> {
    AMOUNT_RE
        .find(text)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}
