//! Product field extractors
//!
//! Each module extracts one product field from the node that holds it. The
//! request types below let a host pipeline run several extractions over one
//! document in a single call.

mod aggregate_rating;
mod brand;
mod breadcrumbs;
mod gtin;
mod price;
mod review;
mod star_rating;

pub use aggregate_rating::*;
pub use brand::*;
pub use breadcrumbs::*;
pub use gtin::*;
pub use price::*;
pub use review::*;
pub use star_rating::*;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{BrandOptions, BreadcrumbOptions};
use crate::error::{ExtractError, Result};
use crate::node::HtmlNode;

/// Request sent by the host pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub specs: Vec<ExtractSpec>,
}

impl ExtractionRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ExtractError::InvalidRequest)
    }
}

/// Product field an [`ExtractSpec`] asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Breadcrumbs,
    Brand,
    Gtin,
    Price,
    AggregateRating,
    ReviewCount,
    RatingStars,
}

/// Single extraction specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSpec {
    pub field: FieldKind,
    /// CSS selector of the node holding the field; the document root when
    /// absent. Only the first match is used.
    #[serde(default)]
    pub selector: Option<String>,
    /// Key of the value in the result
    pub alias: String,
    #[serde(flatten)]
    pub breadcrumbs: BreadcrumbOptions,
    #[serde(flatten)]
    pub brand: BrandOptions,
}

impl ExtractSpec {
    pub fn new(field: FieldKind, selector: Option<&str>, alias: &str) -> Self {
        Self {
            field,
            selector: selector.map(str::to_owned),
            alias: alias.to_owned(),
            breadcrumbs: BreadcrumbOptions::default(),
            brand: BrandOptions::default(),
        }
    }

    /// Run the extractor this spec names on `node`.
    pub fn extract(&self, node: HtmlNode<'_>) -> Result<Option<Value>> {
        match self.field {
            FieldKind::Breadcrumbs => self.to_json(extract_breadcrumbs(node, &self.breadcrumbs)),
            FieldKind::Brand => self.to_json(extract_brand(node, self.brand)),
            FieldKind::Gtin => self.to_json(extract_gtin(node)),
            FieldKind::Price => {
                let price = extract_price_full(node, None);
                self.to_json(price.amount.is_some().then_some(price))
            }
            FieldKind::AggregateRating => {
                let rating = extract_rating(node);
                let found = rating.rating_value.is_some() || rating.best_rating.is_some();
                self.to_json(found.then_some(rating))
            }
            FieldKind::ReviewCount => self.to_json(extract_review_count(node)),
            FieldKind::RatingStars => self.to_json(extract_rating_stars(node)),
        }
    }

    fn to_json<T: Serialize>(&self, value: Option<T>) -> Result<Option<Value>> {
        value
            .map(|value| {
                serde_json::to_value(value).map_err(|source| ExtractError::Serialize {
                    context: format!("value of {}", self.alias),
                    source,
                })
            })
            .transpose()
    }
}

/// Result returned to the host pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExtractionResult {
    pub values: Vec<ExtractedValue>,
}

impl ExtractionResult {
    /// Value extracted under `alias`, if any.
    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|v| v.alias == alias)
            .and_then(|v| v.value.as_ref())
    }
}

/// Single extracted value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedValue {
    pub alias: String,
    pub value: Option<Value>,
}

/// Run every spec of `request` against `html`.
///
/// A spec whose selector matches nothing yields a `None` value; a selector
/// that does not parse fails the whole request.
pub fn extract_all(html: &str, request: &ExtractionRequest) -> Result<ExtractionResult> {
    let document = Html::parse_document(html);

    let mut values = Vec::with_capacity(request.specs.len());
    for spec in &request.specs {
        let node = match &spec.selector {
            Some(css) => {
                let selector = Selector::parse(css).map_err(|_| ExtractError::InvalidSelector {
                    alias: spec.alias.clone(),
                    selector: css.clone(),
                })?;
                let node = document.select(&selector).next().map(HtmlNode::from);
                if node.is_none() {
                    tracing::debug!(alias = %spec.alias, selector = %css, "selector matched nothing");
                }
                node
            }
            None => Some(HtmlNode::from(document.root_element())),
        };

        let value = match node {
            Some(node) => spec.extract(node)?,
            None => None,
        };
        values.push(ExtractedValue {
            alias: spec.alias.clone(),
            value,
        });
    }

    Ok(ExtractionResult { values })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const PAGE: &str = r#"
    <html>
    <body>
        <nav class="breadcrumbs">
            <a href="/">Home</a> &gt; <a href="/tools">Tools</a> &gt; <span>Hammer</span>
        </nav>
        <div class="brand"><img src="/logo.png" alt="Acme"></div>
        <div class="price">€ 12,50</div>
        <div class="rating">4.5 out of 5</div>
        <div class="reviews">(128 reviews)</div>
        <div class="stars" title="4.5 stars"></div>
        <div class="ean">EAN: 7350053850019</div>
    </body>
    </html>
    "#;

    #[test]
    fn test_request_deserialization_defaults() {
        let request = ExtractionRequest::from_json(
            r#"{"specs": [
                {"field": "breadcrumbs", "selector": "nav", "alias": "crumbs", "base_url": "https://shop.example"},
                {"field": "brand", "alias": "brand", "search_depth": 2}
            ]}"#,
        )
        .unwrap();

        let crumbs = &request.specs[0];
        assert_eq!(crumbs.field, FieldKind::Breadcrumbs);
        assert_eq!(crumbs.breadcrumbs.base_url.as_deref(), Some("https://shop.example"));
        assert_eq!(crumbs.breadcrumbs.max_search_depth, 10);

        let brand = &request.specs[1];
        assert_eq!(brand.selector, None);
        assert_eq!(brand.brand.search_depth, 2);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = ExtractionRequest::from_json(r#"{"specs": [{"field": "color", "alias": "c"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(_)));
    }

    #[test]
    fn test_extract_all() {
        let mut crumbs = ExtractSpec::new(FieldKind::Breadcrumbs, Some("nav.breadcrumbs"), "crumbs");
        crumbs.breadcrumbs.base_url = Some("https://shop.example".to_owned());
        let mut brand = ExtractSpec::new(FieldKind::Brand, Some(".brand"), "brand");
        brand.brand.search_depth = 1;

        let request = ExtractionRequest {
            specs: vec![
                crumbs,
                brand,
                ExtractSpec::new(FieldKind::Price, Some(".price"), "price"),
                ExtractSpec::new(FieldKind::AggregateRating, Some(".rating"), "rating"),
                ExtractSpec::new(FieldKind::ReviewCount, Some(".reviews"), "reviews"),
                ExtractSpec::new(FieldKind::RatingStars, Some(".stars"), "stars"),
                ExtractSpec::new(FieldKind::Gtin, Some(".ean"), "ean"),
                ExtractSpec::new(FieldKind::Gtin, Some(".missing"), "missing"),
            ],
        };

        let result = extract_all(PAGE, &request).unwrap();
        assert_eq!(result.values.len(), 8);
        assert_eq!(
            result.get("crumbs"),
            Some(&json!([
                {"name": "Home", "url": "https://shop.example/"},
                {"name": "Tools", "url": "https://shop.example/tools"},
                {"name": "Hammer", "url": null},
            ]))
        );
        assert_eq!(result.get("brand"), Some(&json!({"name": "Acme"})));
        assert_eq!(
            result.get("price"),
            Some(&json!({"amount": "12.50", "currency": "€", "amount_text": "12,50"}))
        );
        assert_eq!(
            result.get("rating"),
            Some(&json!({"bestRating": 5.0, "ratingValue": 4.5}))
        );
        assert_eq!(result.get("reviews"), Some(&json!(128)));
        assert_eq!(result.get("stars"), Some(&json!(4.5)));
        assert_eq!(
            result.get("ean"),
            Some(&json!({"type": "gtin13", "value": "7350053850019"}))
        );
        assert_eq!(result.get("missing"), None);
    }

    #[test]
    fn test_invalid_selector() {
        let request = ExtractionRequest {
            specs: vec![ExtractSpec::new(FieldKind::Price, Some("div[[["), "price")],
        };
        let err = extract_all(PAGE, &request).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSelector { ref alias, .. } if alias == "price"));
    }

    #[test]
    fn test_empty_rating_is_null() {
        let request = ExtractionRequest {
            specs: vec![ExtractSpec::new(FieldKind::AggregateRating, Some(".brand"), "rating")],
        };
        let result = extract_all(PAGE, &request).unwrap();
        assert_eq!(
            result.values,
            vec![ExtractedValue {
                alias: "rating".to_owned(),
                value: None
            }]
        );
    }
}
