//! GTIN family code extraction
//!
//! Cleans a code out of free text ("ISBN-13: 978-1607439677") and classifies
//! it by the first checksum scheme that accepts it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::checksum::{is_valid_gtin, is_valid_isbn, is_valid_ismn, is_valid_issn};
use crate::node::Input;
use crate::text::extract_text;

/// Label prefixes that contain digits of their own. `ean13` has to go
/// before its digits are mistaken for part of the code.
static NUMERIC_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)isbn13|isbn10|ean13|gtin8|gtin12|gtin13|gtin14").expect("valid prefix regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GtinType {
    Isbn10,
    Isbn13,
    Issn,
    Ismn,
    Upc,
    Gtin8,
    Gtin13,
    Gtin14,
}

impl GtinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GtinType::Isbn10 => "isbn10",
            GtinType::Isbn13 => "isbn13",
            GtinType::Issn => "issn",
            GtinType::Ismn => "ismn",
            GtinType::Upc => "upc",
            GtinType::Gtin8 => "gtin8",
            GtinType::Gtin13 => "gtin13",
            GtinType::Gtin14 => "gtin14",
        }
    }
}

impl fmt::Display for GtinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gtin {
    #[serde(rename = "type")]
    pub kind: GtinType,
    pub value: String,
}

/// Extract a GTIN from a node, or from text directly.
///
/// Supported types are `isbn10`, `isbn13`, `issn`, `ismn`, `upc`, `gtin8`,
/// `gtin13` and `gtin14`; the value is the bare digit string.
pub fn extract_gtin<'a>(input: impl Into<Input<'a>>) -> Option<Gtin> {
    let text = match input.into() {
        Input::Text(text) => Some(text.to_owned()),
        other => other.node().and_then(extract_text),
    }?;

    let value = extract_gtin_id(&text)?;
    let kind = gtin_classification(&value)?;
    Some(Gtin { kind, value })
}

/// Digits of the code in `text`, with labels and punctuation removed.
///
/// Letters between the digits disqualify the text: "TSF8UP-R407-26A44" is a
/// SKU, not a GTIN with some noise.
pub fn extract_gtin_id(text: &str) -> Option<String> {
    let alphanumeric: String = text.chars().filter(char::is_ascii_alphanumeric).collect();
    let without_prefix = remove_numeric_prefix(&alphanumeric);
    let center = without_prefix.trim_matches(|c: char| !c.is_ascii_digit());

    if center.is_empty() || !center.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(center.to_owned())
}

/// Drop a prefix such as `ean13` only when exactly that many digits remain,
/// so a code that itself starts with 13 keeps its digits.
fn remove_numeric_prefix(code: &str) -> String {
    if let Some(prefix) = NUMERIC_PREFIX_RE.find(code) {
        let expected_len: usize = prefix
            .as_str()
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or_default();
        let rest = format!("{}{}", &code[..prefix.start()], &code[prefix.end()..]);
        let digits = rest.chars().filter(char::is_ascii_digit).count();
        if digits == expected_len {
            return rest;
        }
    }
    code.to_owned()
}

/// Type of the code in `text`: ISMN, then ISBN, then ISSN, then the generic
/// GTIN checksum keyed by length.
pub fn gtin_classification(text: &str) -> Option<GtinType> {
    let code = extract_gtin_id(text)?;

    let kind = if is_valid_ismn(&code) {
        Some(GtinType::Ismn)
    } else if is_valid_isbn(&code) {
        match code.len() {
            10 => Some(GtinType::Isbn10),
            _ => Some(GtinType::Isbn13),
        }
    } else if is_valid_issn(&code) {
        Some(GtinType::Issn)
    } else if is_valid_gtin(&code) {
        match code.len() {
            8 => Some(GtinType::Gtin8),
            14 => Some(GtinType::Gtin14),
            13 => Some(GtinType::Gtin13),
            12 => Some(GtinType::Upc),
            _ => None,
        }
    } else {
        None
    };

    tracing::trace!(code = %code, kind = ?kind, "classified gtin");
    kind
}
