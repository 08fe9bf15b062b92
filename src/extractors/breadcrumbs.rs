//! Breadcrumb trail extraction
//!
//! Walks the breadcrumb component in pre-order and turns anchors and leaf
//! elements (plus loose text between them) into breadcrumb items. The raw
//! items are then filtered using semantic markup when the page has it, or the
//! position of separator glyphs when it does not.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::BreadcrumbOptions;
use crate::node::{HtmlNode, Input};
use crate::text::{extract_link, extract_text};

/// Glyphs used between breadcrumb items.
const SEPARATORS: &str = "ᐊᐅ<>ᐸᐳ‹›≺≻≪≫«»⋘⋙❬❭❮❯❰❱⟨⟩⟪⟫⫷⫸〈〉《》⦉⦊⭅⭆⭠⭢←→↤↦⇐⇒⇠⇢\
⇦⇨⇽⇾⟵⟶⟸⟹⟻⟼⟽⟾⮘⮚⮜⮞⯇⯈⊲⊳◀▶◁▷◂▸◃▹◄►◅▻➜➝➞➟➠➡➢➣➤➧➨➩\
➪➫➬➭➮➯➱➲/⁄\\⟋⟍⫻⫼⫽|𐬻¦‖∣⎪⎟⎸⎹│┃┆┇┊┋❘❙❚.,+:-";

/// Class name fragments of list elements that are menus, not trails.
const DROPDOWN_CLASSES: &[&str] = &["dropdown", "actions"];

fn separator_class() -> String {
    format!("[{}]", regex::escape(SEPARATORS))
}

fn separator_group() -> String {
    format!("({}+|->)", separator_class())
}

static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(^|\s+){}+($|\s+)", separator_class())).expect("valid split regex")
});
static SEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}$", separator_group())).expect("valid separator regex")
});
static LSTRIP_SEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}\s+", separator_group())).expect("valid left separator regex")
});
static RSTRIP_SEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\s+{}$", separator_group())).expect("valid right separator regex")
});

/// A single item of a breadcrumb trail. At least one field is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: None,
        }
    }
}

/// Semantic markup that marks an element as a breadcrumb item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    DataVocabulary,
    Schema,
}

/// A raw item found during the walk, with the context post-processing needs.
#[derive(Debug, Clone, PartialEq)]
struct CrumbRecord {
    breadcrumb: Breadcrumb,
    markup: Vec<Markup>,
    right_sep: Option<String>,
}

/// Split text into left separator, clean name and right separator.
///
/// Text made only of separators is reported as a left separator.
pub fn parse_breadcrumb_name(name: Option<&str>) -> (Option<&str>, Option<&str>, Option<&str>) {
    let Some(stripped) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None, None);
    };
    if SEP_RE.is_match(stripped) {
        return (Some(stripped), None, None);
    }

    let (left_sep, rest) = match LSTRIP_SEP_RE.captures(stripped) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            (caps.get(1).map(|m| m.as_str()), &stripped[whole..])
        }
        None => (None, stripped),
    };

    if SEP_RE.is_match(rest) {
        return (left_sep, None, Some(rest.trim()));
    }

    let (name, right_sep) = match RSTRIP_SEP_RE.captures(rest) {
        Some(caps) => {
            let start = caps.get(0).map_or(rest.len(), |m| m.start());
            (&rest[..start], caps.get(1).map(|m| m.as_str()))
        }
        None => (rest, None),
    };

    (left_sep, Some(name).filter(|n| !n.is_empty()), right_sep)
}

/// Extract breadcrumb items from the node representing the breadcrumb
/// component.
///
/// Items are collected in pre-order, which handles both flat trails (all
/// anchors at the same depth) and nested ones (each item inside the previous
/// one). Nested lists and lists classed as dropdowns are not entered, buttons
/// are ignored, and names are cleaned of separator glyphs. Relative links are
/// joined with `options.base_url`.
///
/// Returns `None` when nothing looking like a breadcrumb item was found.
pub fn extract_breadcrumbs<'a>(
    input: impl Into<Input<'a>>,
    options: &BreadcrumbOptions,
) -> Option<Vec<Breadcrumb>> {
    let node = input.into().node()?;

    let mut walker = Walker {
        options,
        records: Vec::new(),
    };
    walker.visit(node, 0, false, &[]);

    postprocess(walker.records)
}

struct Walker<'o> {
    options: &'o BreadcrumbOptions,
    records: Vec<CrumbRecord>,
}

impl Walker<'_> {
    fn visit(&mut self, node: HtmlNode<'_>, depth: usize, inside_list: bool, hierarchy: &[Markup]) {
        if node.is_tag("button") {
            return;
        }

        if node.is_tag("a") || !node.has_children() {
            let name = extract_text(node).or_else(|| {
                node.attr("title")
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
            });
            let url = extract_link(
                node,
                self.options.base_url.as_deref(),
                self.options.link_options(),
            );

            let (left_sep, name, right_sep) = parse_breadcrumb_name(name.as_deref());
            self.attach_left_separator(left_sep);
            if name.is_some() || url.is_some() {
                self.push(
                    Breadcrumb {
                        name: name.map(str::to_owned),
                        url,
                    },
                    hierarchy,
                    right_sep,
                );
            }
        } else {
            let is_list = node.is_tag("ul") || node.is_tag("ol");
            let skip_list = is_list && (inside_list || has_dropdown_class(node.attr("class")));

            if depth < self.options.max_search_depth && !skip_list {
                let mut child_hierarchy = hierarchy.to_vec();
                child_hierarchy.extend(markup_type(node));
                for child in node.children() {
                    self.visit(child, depth + 1, inside_list || is_list, &child_hierarchy);
                }
            }
        }

        if let Some(tail) = node.tail() {
            let (left_sep, name, right_sep) = parse_breadcrumb_name(Some(tail.as_str()));
            self.attach_left_separator(left_sep);
            if let Some(name) = name {
                self.push(Breadcrumb::named(name), hierarchy, right_sep);
            }
        }
    }

    /// A separator to the left of an item closes the previous item if that
    /// one had no separator of its own.
    fn attach_left_separator(&mut self, left_sep: Option<&str>) {
        if let (Some(sep), Some(last)) = (left_sep, self.records.last_mut()) {
            if last.right_sep.is_none() {
                last.right_sep = Some(sep.to_owned());
            }
        }
    }

    fn push(&mut self, breadcrumb: Breadcrumb, hierarchy: &[Markup], right_sep: Option<&str>) {
        self.records.push(CrumbRecord {
            breadcrumb,
            markup: hierarchy.to_vec(),
            right_sep: right_sep.map(str::to_owned),
        });
    }
}

/// Filter raw items down to the trail.
///
/// * A single name-only item is split on separators into several items.
/// * With semantic markup present, marked items are kept along with their
///   unmarked direct neighbours (usually home and the current product).
/// * Otherwise items next to the most common separator are kept.
fn postprocess(records: Vec<CrumbRecord>) -> Option<Vec<Breadcrumb>> {
    if records.is_empty() {
        return None;
    }

    if let [only] = records.as_slice() {
        if let (Some(name), None) = (&only.breadcrumb.name, &only.breadcrumb.url) {
            return Some(split_unsegmented(name));
        }
    }

    let kept = if records.iter().any(|r| !r.markup.is_empty()) {
        tracing::debug!(items = records.len(), "filtering breadcrumbs by markup");
        filter_by_markup(records)
    } else {
        tracing::debug!(items = records.len(), "filtering breadcrumbs by separators");
        filter_by_separators(records)
    };

    Some(remove_go_back_item(kept))
}

fn split_unsegmented(name: &str) -> Vec<Breadcrumb> {
    SPLIT_RE
        .split(name)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Breadcrumb::named)
        .collect()
}

fn filter_by_markup(records: Vec<CrumbRecord>) -> Vec<Breadcrumb> {
    let first = records.iter().position(|r| !r.markup.is_empty());
    let last = records.iter().rposition(|r| !r.markup.is_empty());

    // unmarked neighbours of the marked run
    let before_first = first.and_then(|idx| idx.checked_sub(1));
    let after_last = last.map(|idx| idx + 1);

    records
        .into_iter()
        .enumerate()
        .filter(|(idx, r)| {
            !r.markup.is_empty() || Some(*idx) == before_first || Some(*idx) == after_last
        })
        .map(|(_, r)| r.breadcrumb)
        .collect()
}

fn filter_by_separators(records: Vec<CrumbRecord>) -> Vec<Breadcrumb> {
    let Some(main_sep) = most_common_separator(&records) else {
        return records.into_iter().map(|r| r.breadcrumb).collect();
    };
    tracing::trace!(main_sep = %main_sep, "main breadcrumb separator");

    let is_main = |sep: &Option<String>| sep.as_deref() == Some(main_sep.as_str());
    let keep: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            is_main(&r.right_sep) || (idx > 0 && is_main(&records[idx - 1].right_sep))
        })
        .collect();

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, keep)| keep.then_some(r.breadcrumb))
        .collect()
}

/// Most frequent right separator; ties go to the one seen first.
fn most_common_separator(records: &[CrumbRecord]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sep in records.iter().filter_map(|r| r.right_sep.as_deref()) {
        match counts.iter_mut().find(|(s, _)| *s == sep) {
            Some((_, count)) => *count += 1,
            None => counts.push((sep, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (sep, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((sep, count));
        }
    }
    best.map(|(sep, _)| sep.to_owned())
}

/// Drop a "go back" link duplicating another item's URL, trying the first
/// item before the last.
fn remove_go_back_item(mut breadcrumbs: Vec<Breadcrumb>) -> Vec<Breadcrumb> {
    let len = breadcrumbs.len();
    if len < 2 {
        return breadcrumbs;
    }

    let url_in = |range: &[Breadcrumb], url: &str| {
        range.iter().any(|b| b.url.as_deref() == Some(url))
    };

    if let Some(first) = breadcrumbs[0].url.as_deref() {
        if url_in(&breadcrumbs[1..], first) {
            breadcrumbs.remove(0);
            return breadcrumbs;
        }
    }
    if let Some(last) = breadcrumbs[len - 1].url.as_deref() {
        if url_in(&breadcrumbs[1..len - 1], last) {
            breadcrumbs.pop();
        }
    }
    breadcrumbs
}

fn markup_type(node: HtmlNode<'_>) -> Option<Markup> {
    let schema_contains = |needle: &str| {
        ["itemtype", "typeof"]
            .iter()
            .filter_map(|attr| node.attr(attr))
            .any(|value| value.to_lowercase().contains(needle))
    };

    if schema_contains("data-vocabulary.org/breadcrumb") {
        Some(Markup::DataVocabulary)
    } else if schema_contains("listitem") {
        Some(Markup::Schema)
    } else {
        None
    }
}

/// Whether a class attribute names a dropdown-ish menu ("dropdown",
/// "drop-down", "DropDown", "actions", ...).
fn has_dropdown_class(class_attr: Option<&str>) -> bool {
    class_attr.is_some_and(|classes| {
        classes.split_whitespace().any(|class| {
            let folded: String = class
                .chars()
                .filter(|c| !c.is_ascii_punctuation())
                .collect::<String>()
                .to_lowercase();
            DROPDOWN_CLASSES.iter().any(|name| folded.contains(name))
        })
    })
}
