//! Aggregate rating ("4.5 out of 5") extraction

use serde::{Deserialize, Serialize};

use crate::node::{HtmlNode, Input};
use crate::numbers::rating_numbers;
use crate::text::extract_text;

/// Scales a rating is plausibly out of.
const POSSIBLE_BEST_RATINGS: [f64; 6] = [4.0, 5.0, 6.0, 10.0, 20.0, 100.0];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    pub best_rating: Option<f64>,
    pub rating_value: Option<f64>,
}

/// Extract rating data from a node, or from its text directly.
///
/// Two numbers are read as value and scale. A lone number is the value and
/// the scale may follow in the node's tail or in the next element ("4.1"
/// then "of 5"). More numbers than that only give the value.
pub fn extract_rating<'a>(input: impl Into<Input<'a>>) -> AggregateRating {
    let (text, node) = match input.into() {
        Input::Text(text) => (Some(text.to_owned()), None),
        other => {
            let node = other.node();
            (node.and_then(extract_text), node)
        }
    };
    let Some(text) = text else {
        return AggregateRating::default();
    };

    match rating_numbers(&text).as_slice() {
        [] => AggregateRating::default(),
        [value] => AggregateRating {
            rating_value: Some(*value),
            best_rating: node.and_then(|node| best_rating_after(node, *value)),
        },
        [value, best] => AggregateRating {
            rating_value: Some(*value),
            best_rating: Some(*best),
        },
        [value, ..] => AggregateRating {
            rating_value: Some(*value),
            best_rating: None,
        },
    }
}

/// First number of the tail, else of the next element, if it is a valid
/// scale for `rating_value`.
fn best_rating_after(node: HtmlNode<'_>, rating_value: f64) -> Option<f64> {
    let candidates = [node.tail(), node.next_node().and_then(extract_text)];
    let best = candidates
        .iter()
        .flatten()
        .find_map(|text| rating_numbers(text).first().copied())?;

    (best >= rating_value && POSSIBLE_BEST_RATINGS.contains(&best)).then_some(best)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::node::test_support::{first_element, fragment, select};

    fn rating(value: Option<f64>, best: Option<f64>) -> AggregateRating {
        AggregateRating {
            best_rating: best,
            rating_value: value,
        }
    }

    #[rstest]
    #[case("<div>4.1</div>", rating(Some(4.1), None))]
    #[case("<div>4.1 of 5</div>", rating(Some(4.1), Some(5.0)))]
    #[case("<div><span>4.1</span><span>of 5</span></div>", rating(Some(4.1), Some(5.0)))]
    #[case("<div></div>", rating(None, None))]
    #[case("<div>no rating yet</div>", rating(None, None))]
    #[case("<div>4.5 out of 5 based on 2 reviews</div>", rating(Some(4.5), None))]
    fn test_extract_rating(#[case] html: &str, #[case] expected: AggregateRating) {
        let doc = fragment(html);
        assert_eq!(extract_rating(first_element(&doc)), expected);
    }

    #[test]
    fn test_extract_rating_tail() {
        let doc = fragment("<p><span>5</span> of 6</p>");
        let expected = rating(Some(5.0), Some(6.0));
        assert_eq!(extract_rating(select(&doc, "p")), expected);
        assert_eq!(extract_rating(select(&doc, "span")), expected);
    }

    #[test]
    fn test_extract_rating_next_sibling() {
        let doc = fragment("<div><b>3,5</b><i>/ 10</i></div>");
        assert_eq!(extract_rating(select(&doc, "b")), rating(Some(3.5), Some(10.0)));
    }

    #[rstest]
    #[case("<div><b>4</b> of 7</div>")]
    #[case("<div><b>8</b> of 5</div>")]
    #[case("<div><b>4</b><i>22.43</i></div>")]
    fn test_implausible_scale_is_dropped(#[case] html: &str) {
        let doc = fragment(html);
        assert_eq!(extract_rating(select(&doc, "b")).best_rating, None);
    }

    #[test]
    fn test_extract_rating_from_text() {
        assert_eq!(extract_rating("4.1 of 5"), rating(Some(4.1), Some(5.0)));
        assert_eq!(extract_rating("4.1"), rating(Some(4.1), None));
    }

    #[test]
    fn test_serialized_keys() {
        assert_eq!(
            serde_json::to_value(rating(Some(4.5), Some(5.0))).unwrap(),
            serde_json::json!({"bestRating": 5.0, "ratingValue": 4.5})
        );
    }
}
