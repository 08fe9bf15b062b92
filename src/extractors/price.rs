//! Price extraction from nodes

use rust_decimal::Decimal;

use crate::node::Input;
use crate::price::Price;
use crate::text::extract_text;

fn input_text(input: Input<'_>) -> Option<String> {
    match input {
        Input::Text(text) => Some(text.to_owned()),
        other => other.node().and_then(extract_text),
    }
}

/// Extract a price value from a node that contains it.
pub fn extract_price<'a>(input: impl Into<Input<'a>>) -> Option<Decimal> {
    extract_price_full(input, None).amount
}

/// Extract the full price (amount, currency, raw amount text). The currency
/// hint may be text or a node holding the currency, e.g. a separate `<sup>`.
pub fn extract_price_full<'a>(
    input: impl Into<Input<'a>>,
    currency_hint: Option<Input<'_>>,
) -> Price {
    let text = input_text(input.into());
    let hint = currency_hint.and_then(input_text);
    Price::from_text(text.as_deref(), hint.as_deref())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::node::test_support::{first_element, fragment, select};

    #[rstest]
    #[case("<p></p>", None)]
    #[case("<p>23.5</p>", Some("23.5"))]
    #[case("<p>$23.5</p>", Some("23.5"))]
    #[case("<p><span>1 299</span>,<sup>99</sup> zł</p>", Some("1299.99"))]
    fn test_extract_price(#[case] html: &str, #[case] expected: Option<&str>) {
        let doc = fragment(html);
        assert_eq!(
            extract_price(first_element(&doc)),
            expected.map(|e| Decimal::from_str(e).unwrap())
        );
    }

    #[test]
    fn test_extract_price_with_node_hint() {
        let doc = fragment(r#"<div><span class="amount">19,90</span><span class="cur">EUR</span></div>"#);
        let price = extract_price_full(select(&doc, ".amount"), Some(select(&doc, ".cur").into()));
        assert_eq!(
            price,
            Price {
                amount: Some(Decimal::from_str("19.90").unwrap()),
                currency: Some("EUR".to_owned()),
                amount_text: Some("19,90".to_owned()),
            }
        );
    }

    #[test]
    fn test_extract_price_from_text() {
        assert_eq!(extract_price("£7.99"), Some(Decimal::from_str("7.99").unwrap()));
    }
}
