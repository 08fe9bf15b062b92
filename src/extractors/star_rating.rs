//! Star rating widgets
//!
//! Ratings drawn as stars are encoded in many ways: an accessible label, the
//! image file name, a CSS class, a row of identical icons or an inline width.
//! Every element of the widget is run through all detectors and the result is
//! only trusted when the detectors agree.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{HtmlNode, Input};
use crate::numbers::single_like_a_number;
use crate::text::normalize_whitespace;

/// Rating scale assumed by all detectors.
const BEST_RATING: f64 = 5.0;

/// Icons in a row of stars.
const STAR_COUNT: usize = 5;

/// Attribute that toggles icon state on the client; it makes filled and
/// empty icons serialize differently for the wrong reason.
const STATE_TOGGLE_ATTR: &str = "ng-class";

const LABEL_ATTRS: &[&str] = &["title", "alt", "aria-label"];

/// Label patterns, most specific first.
static LABEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^([0-9]+\.?[0-9]*) stars",
        r"^([0-9]+\.?[0-9]*) (out )?of 5 stars",
        r"^rated ([0-9]+\.?[0-9]*) (out )?of 5\b",
        r"\b([0-9]+\.?[0-9]*) (out )?of 5\b",
        r"^([0-9]+\.?[0-9]*)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid label pattern"))
    .collect()
});

/// Width percentages of a clipped 5-star bar, indexed by rating - 1.
const STAR_WIDTHS: [u32; 5] = [20, 40, 60, 80, 100];

/// Extract a rating value from a node containing rating stars.
///
/// Values outside 1..=5 are discarded. A single distinct value is returned as
/// is. Two values where one is the 5-star maximum (a "4 of 5" label next to a
/// full-star icon) resolve to the other one. Anything else is ambiguous.
pub fn extract_rating_stars<'a>(input: impl Into<Input<'a>>) -> Option<f64> {
    let node = input.into().node()?;

    let skip_attr = node
        .iter()
        .any(is_star_row)
        .then_some(STATE_TOGGLE_ATTR);

    let mut candidates: Vec<f64> = Vec::new();
    for subnode in node.iter() {
        let found = [
            from_label(subnode),
            from_image(subnode),
            from_class(subnode),
            from_star_row(subnode, skip_attr),
            from_style_width(subnode),
        ];
        for value in found.into_iter().flatten() {
            if (1.0..=BEST_RATING).contains(&value) && !candidates.contains(&value) {
                candidates.push(value);
            }
        }
    }
    tracing::debug!(?candidates, "star rating candidates");

    match candidates.as_slice() {
        [value] => Some(*value),
        [a, b] if a.max(*b) == BEST_RATING => Some(a.min(*b)),
        _ => None,
    }
}

/// "4 of 5 stars", "Rated 4 out of 5", "4" in title, alt or aria-label.
fn from_label(node: HtmlNode<'_>) -> Option<f64> {
    let texts: Vec<String> = LABEL_ATTRS
        .iter()
        .filter_map(|attr| node.attr(attr))
        .map(|value| normalize_whitespace(value).to_lowercase())
        .filter(|value| !value.is_empty())
        .collect();

    LABEL_PATTERNS.iter().find_map(|pattern| {
        texts.iter().find_map(|text| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    })
}

/// `stars_4.5.png`, `rating-large4.png?t=1`.
fn from_image(node: HtmlNode<'_>) -> Option<f64> {
    let src = node.attr("src")?.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }
    single_like_a_number(file_name(src))
}

/// Last path segment of a possibly relative URL, query and fragment removed.
fn file_name(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    let path = match path.split_once("//") {
        Some((scheme, rest)) if is_scheme_prefix(scheme) => {
            rest.find('/').map_or("", |start| &rest[start..])
        }
        _ => path,
    };
    let segment = path.rsplit('/').next().unwrap_or_default();
    segment.split(';').next().unwrap_or_default()
}

fn is_scheme_prefix(prefix: &str) -> bool {
    prefix.is_empty()
        || prefix.strip_suffix(':').is_some_and(|scheme| {
            scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
}

/// `star-4`, `rate-1`, `star-rating--filled-4_5`. Only trusted when the
/// rating-ish classes carry exactly one in-range number.
fn from_class(node: HtmlNode<'_>) -> Option<f64> {
    let classes = node.attr("class")?.to_lowercase();

    let mut matches: Vec<f64> = Vec::new();
    for class in classes.split_whitespace() {
        if !(class.contains("star") || class.contains("rate") || class.contains("rating")) {
            continue;
        }
        if let Some(number) = single_like_a_number(class) {
            if (1.0..=BEST_RATING).contains(&number) && !matches.contains(&number) {
                matches.push(number);
            }
        }
    }

    match matches.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Five children of the same kind.
fn is_star_row(node: HtmlNode<'_>) -> bool {
    let mut tags = node.children().map(|child| child.tag());
    let Some(first) = tags.next() else {
        return false;
    };
    let mut count = 1;
    for tag in tags {
        if tag != first {
            return false;
        }
        count += 1;
    }
    count == STAR_COUNT
}

/// A row of icons: the first n identical, the rest identical and different.
fn from_star_row(node: HtmlNode<'_>, skip_attr: Option<&str>) -> Option<f64> {
    if !is_star_row(node) {
        return None;
    }

    let icons: Vec<String> = node
        .children()
        .map(|child| child.to_markup(skip_attr).trim().to_owned())
        .collect();
    debug_assert_eq!(icons.len(), STAR_COUNT);
    let all_same = |group: &[String]| group.iter().all(|icon| *icon == group[0]);

    if all_same(&icons) {
        return Some(STAR_COUNT as f64);
    }
    (1..STAR_COUNT)
        .find(|&filled| {
            let (on, off) = icons.split_at(filled);
            all_same(on) && all_same(off) && on[0] != off[0]
        })
        .map(|filled| filled as f64)
}

/// `style="width: 80%"` on the clipped foreground of a star bar.
fn from_style_width(node: HtmlNode<'_>) -> Option<f64> {
    let style = node.attr("style")?.to_lowercase().replace(' ', "");
    STAR_WIDTHS
        .iter()
        .position(|width| style.contains(&format!("width:{width}%")))
        .map(|idx| (idx + 1) as f64)
}
