//! Per-call options for the tree extractors.
//!
//! All option structs deserialize from partial JSON, missing keys falling
//! back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::text::LinkOptions;

/// Default depth limit of the breadcrumb tree walk.
pub const DEFAULT_BREADCRUMB_DEPTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbOptions {
    /// Base URL relative breadcrumb links are resolved against.
    pub base_url: Option<String>,
    /// Maximum depth searched below the breadcrumb node.
    pub max_search_depth: usize,
    /// Percent-encode links and force `https` on scheme-less base URLs.
    pub force_safe_links: bool,
}

impl Default for BreadcrumbOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            max_search_depth: DEFAULT_BREADCRUMB_DEPTH,
            force_safe_links: false,
        }
    }
}

impl BreadcrumbOptions {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub(crate) fn link_options(&self) -> LinkOptions {
        LinkOptions {
            force_safe: self.force_safe_links,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandOptions {
    /// How many levels below the node images are searched for alt/title text.
    pub search_depth: usize,
}
