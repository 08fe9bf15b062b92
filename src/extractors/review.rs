//! Review count extraction

use crate::node::Input;
use crate::numbers::{count_tokens, normalize_to_int, parenthesized};
use crate::text::extract_text;

/// Extract a review count from a node containing it, or from its text.
pub fn extract_review_count<'a>(input: impl Into<Input<'a>>) -> Option<u64> {
    match input.into() {
        Input::Text(text) => extract_review_count_from_text(text),
        other => extract_review_count_from_text(&extract_text(other.node()?)?),
    }
}

/// Review count in `text`.
///
/// A single number is the count. With several numbers, a single number in
/// parentheses is taken as the count ("4.5/5 (23 reviews)"). Other cases are
/// ambiguous.
pub fn extract_review_count_from_text(text: &str) -> Option<u64> {
    match count_tokens(text).as_slice() {
        [] => None,
        [only] => normalize_to_int(only),
        _ => match count_tokens(parenthesized(text)?).as_slice() {
            [only] => normalize_to_int(only),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::node::test_support::{first_element, fragment};

    #[rstest]
    #[case("(2)", Some(2))]
    #[case("23 Reviews", Some(23))]
    #[case("0 review(s)", Some(0))]
    #[case("6", Some(6))]
    #[case("0", Some(0))]
    #[case("No Reviews Yet", None)]
    #[case("Review count : 23", Some(23))]
    #[case("4.5/5 (23 reviews)", Some(23))]
    #[case("4 out of 5 based on 5 review", None)]
    #[case("Rating: 4.5 (9 Reviews)", Some(9))]
    #[case("Rating: 3.2 (34)", Some(34))]
    #[case("Review(s) 12", Some(12))]
    #[case("8 Review(s)", Some(8))]
    #[case("8 avaliações", Some(8))]
    #[case("(0 Reviews)", Some(0))]
    #[case("60 ratings", Some(60))]
    #[case("17 omdömen", Some(17))]
    #[case("77369", Some(77369))]
    #[case("Average Rating (86):", Some(86))]
    #[case("You have not rated this yet", None)]
    #[case("6,000 ratings", Some(6000))]
    #[case("13,237 ratings", Some(13237))]
    #[case("4.5/5 (10,237)", Some(10237))]
    #[case("rating, reviews : 10,237)", Some(10237))]
    #[case("reviews : 10 237", Some(10237))]
    #[case("10,23", None)]
    #[case("", None)]
    fn test_review_count_from_text(#[case] text: &str, #[case] expected: Option<u64>) {
        assert_eq!(extract_review_count_from_text(text), expected);
    }

    #[test]
    fn test_review_count_from_node() {
        let doc = fragment("<a href='#reviews'><span>4.5/5</span> (<b>1,024</b> reviews)</a>");
        assert_eq!(extract_review_count(first_element(&doc)), Some(1024));

        let doc = fragment("<span></span>");
        assert_eq!(extract_review_count(first_element(&doc)), None);
    }
}
