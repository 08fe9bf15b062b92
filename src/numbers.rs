//! Number-like tokens in free text
//!
//! Ratings, review counts, prices and file names all carry numbers written in
//! slightly different ways. The scanners here find the tokens; callers decide
//! what a token means.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Rating values, with either `.` or `,` as the decimal separator.
static RATING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]*,[0-9]+|[0-9]*\.[0-9]+|[0-9]+").expect("valid rating regex"));

/// Counts, with `,` or a space as a possible group separator.
static COUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+?,[0-9]+|[0-9]+? [0-9]+|[0-9]+").expect("valid count regex"));

/// Numbers as they show up in file names and CSS classes: `5.0`, `5-0`, `5_0`, `50`.
static LOOSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[.\-_,]?[0-9]*").expect("valid loose number regex"));

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("valid parentheses regex"));

/// All rating-like numbers in `text`, in order. Decimal commas become points.
pub fn rating_numbers(text: &str) -> Vec<f64> {
    RATING_NUMBER_RE
        .find_iter(text)
        .filter_map(|m| normalize_rating(m.as_str()))
        .collect()
}

/// Parse a rating token such as `4,5` or `4.5`; NaN is treated as absent.
pub fn normalize_rating(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}

/// All count-like tokens in `text` (`13,237`, `10 237`, `60`).
pub fn count_tokens(text: &str) -> Vec<&str> {
    COUNT_NUMBER_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Content of the first parenthesized group in `text`.
pub fn parenthesized(text: &str) -> Option<&str> {
    PARENTHESIZED_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Locale-aware number parsing.
///
/// Spaces and apostrophes are group separators. The last `.` or `,` is the
/// decimal separator when 1-2 or 4+ digits follow it; exactly 3 digits mean
/// it separates thousands.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let num: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if num.is_empty() {
        return None;
    }

    let normalized = match decimal_separator(&num) {
        None => num.replace(['.', ','], ""),
        Some('.') => num.replace(',', ""),
        Some(_) => num.replace('.', "").replace(',', "."),
    };
    Decimal::from_str(&normalized).ok()
}

fn decimal_separator(num: &str) -> Option<char> {
    let pos = num.rfind(['.', ','])?;
    let sep = num[pos..].chars().next()?;
    let fraction = &num[pos + 1..];
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    matches!(fraction.len(), 1 | 2 | 4..).then_some(sep)
}

/// Parse `text` as a count; fractional values are rejected.
pub fn normalize_to_int(text: &str) -> Option<u64> {
    let value = parse_number(text)?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u64()
}

/// The single number-like token in `text`, if there is exactly one.
///
/// `-`, `_` and `,` separators read as a decimal point. Values of 20, 30, 40
/// and 50 are taken as tenths of a 5-point scale; 10 is left alone since it
/// may just as well be a 10-point maximum.
pub fn single_like_a_number(text: &str) -> Option<f64> {
    let mut numbers = LOOSE_NUMBER_RE.find_iter(text);
    let only = numbers.next()?;
    if numbers.next().is_some() {
        return None;
    }

    let value = only.as_str().replace(['-', '_', ','], ".").parse::<f64>().ok()?;
    if [20.0, 30.0, 40.0, 50.0].contains(&value) {
        Some(value / 10.0)
    } else {
        Some(value)
    }
}
