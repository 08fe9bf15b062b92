//! Product page field extraction for the crawler pipeline
//!
//! Heuristic extractors turning the node that holds a product field into a
//! typed value:
//! - Breadcrumb trails (markup- or separator-based filtering)
//! - Star rating widgets (labels, images, classes, icon rows, widths)
//! - Aggregate ratings and review counts
//! - Brand names (text or logo alt/title)
//! - GTIN family codes (ISBN, ISSN, ISMN, UPC, EAN/GTIN)
//! - Prices
//!
//! Extractors take an [`Input`]: a node of a `scraper` document, a whole
//! document, or for the text-only fields plain text. The [`ffi`] module
//! exposes a JSON batch interface to the host.

pub mod checksum;
pub mod config;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod node;
pub mod numbers;
pub mod price;
pub mod text;

pub use config::*;
pub use error::{ExtractError, Result};
pub use extractors::*;
pub use ffi::*;
pub use node::{HtmlNode, Input};
pub use price::Price;
pub use text::{extract_link, extract_text, strip_urljoin, LinkOptions};
