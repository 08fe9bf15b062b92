//! Visible text and link extraction

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::node::HtmlNode;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Tags whose content is never visible text.
const INVISIBLE_TAGS: &[&str] = &["script", "style"];

/// Characters escaped in relative links when safe mode is on: everything
/// outside RFC 3986 reserved/unreserved, `%` and `|`.
const UNSAFE_URL_CHARS: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Whitespace characters as defined by the HTML5 spec.
const HTML5_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0c'];

/// How links are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Percent-encode unsafe characters and give scheme-less base URLs `https`.
    pub force_safe: bool,
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Visible text of a node with whitespace collapsed, `None` if there is none.
///
/// The node's own tail is not part of its text. Comments have no text.
pub fn extract_text(node: HtmlNode<'_>) -> Option<String> {
    if node.is_comment() {
        return None;
    }

    let mut out = String::new();
    let mut prev: Option<&str> = None;
    for raw in node.text_chunks(INVISIBLE_TAGS) {
        let chunk = normalize_whitespace(raw);
        if chunk.is_empty() {
            continue;
        }
        if let Some(prev) = prev {
            if needs_space(prev, &chunk) {
                out.push(' ');
            }
        }
        out.push_str(&chunk);
        prev = Some(raw);
    }

    let out = out.trim();
    (!out.is_empty()).then(|| out.to_owned())
}

/// Whether a space goes between the previous raw chunk and the next one.
fn needs_space(prev: &str, next: &str) -> bool {
    if prev.ends_with(char::is_whitespace) {
        return true;
    }
    let punct_after = next.starts_with([',', ':', ';', '.', '!', '?', '"', ')']);
    let bracket_before = prev.ends_with('(');
    !(punct_after || bracket_before)
}

/// Check if the URL is meant to be handled by JS rather than followed.
pub fn is_js_url(url: &str) -> bool {
    let normed = url.trim().to_lowercase();
    normed.starts_with("javascript:") || normed.starts_with('#')
}

/// Strip HTML5 whitespace around `url` and resolve it against `base_url`.
///
/// Without a usable base URL the link is returned as is, normalized when it
/// is already absolute. `None` when the join itself fails.
pub fn strip_urljoin(base_url: Option<&str>, url: &str) -> Option<String> {
    let url = url.trim_matches(HTML5_WHITESPACE);
    let Some(base) = base_url.filter(|b| !b.is_empty()) else {
        return Some(url.to_owned());
    };
    match Url::parse(base) {
        Ok(base) => base.join(url).ok().map(String::from),
        Err(_) => Some(Url::parse(url).map_or_else(|_| url.to_owned(), String::from)),
    }
}

/// Absolute URL of an anchor-like node.
///
/// Reads `href`, then `data-url`. JS pseudo-links, fragments and empty links
/// give `None`, as does any failure to resolve.
pub fn extract_link(node: HtmlNode<'_>, base_url: Option<&str>, options: LinkOptions) -> Option<String> {
    let link = node
        .attr("href")
        .filter(|l| !l.is_empty())
        .or_else(|| node.attr("data-url"))
        .filter(|l| !l.is_empty())?;

    if is_js_url(link) {
        return None;
    }

    let resolved = if options.force_safe {
        let base = base_url.map(|base| with_default_scheme(base, true));
        strip_urljoin(base.as_deref(), link).map(|url| safe_url(&with_default_scheme(&url, false)))
    } else {
        strip_urljoin(base_url, link)
    };

    if resolved.is_none() {
        tracing::trace!(link, ?base_url, "could not resolve link");
    }
    resolved
}

/// Give a protocol-relative or bare-host URL an `https` scheme. Other
/// relative URLs are returned unchanged unless `host_first` says the URL
/// starts with a host anyway, as a base URL does.
fn with_default_scheme(url: &str, host_first: bool) -> String {
    let url = url.trim();
    if url.is_empty() || Url::parse(url).is_ok() {
        url.to_owned()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if host_first || is_bare_host(url) {
        format!("https://{url}")
    } else {
        url.to_owned()
    }
}

/// `example.com/shop`, `www.example.com`: a host name without scheme, as
/// opposed to a relative path such as `page.html` or `docs/a`.
fn is_bare_host(url: &str) -> bool {
    let (host, rest) = url.split_once('/').map_or((url, None), |(h, r)| (h, Some(r)));
    let Some((_, tld)) = host.rsplit_once('.') else {
        return false;
    };
    let host_chars = host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':'));
    let tld_like = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    host_chars && !host.starts_with('.') && tld_like && (rest.is_some() || host.starts_with("www."))
}

/// Percent-encode characters that are never valid in a URL.
fn safe_url(url: &str) -> String {
    utf8_percent_encode(url, UNSAFE_URL_CHARS).to_string()
}
