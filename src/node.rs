//! Tree access over scraper's DOM
//!
//! Extractors see the page through [`HtmlNode`], an element or comment node
//! with the handful of navigation primitives the heuristics need: tag,
//! attributes, element children, next sibling, trailing text ("tail") and a
//! canonical markup serialization. Text nodes never appear as `HtmlNode`s.

use std::fmt;

use ego_tree::NodeRef;
use scraper::{node::Node, ElementRef, Html};

/// HTML elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// An element or comment node of a parsed document.
#[derive(Clone, Copy)]
pub struct HtmlNode<'a> {
    node: NodeRef<'a, Node>,
}

impl<'a> HtmlNode<'a> {
    /// Wrap a raw tree node; text, doctype and document nodes are rejected.
    pub fn new(node: NodeRef<'a, Node>) -> Option<Self> {
        match node.value() {
            Node::Element(_) | Node::Comment(_) => Some(Self { node }),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<ElementRef<'a>> {
        ElementRef::wrap(self.node)
    }

    pub fn is_comment(&self) -> bool {
        self.node.value().is_comment()
    }

    /// Lower-cased tag name, `None` for comments.
    pub fn tag(&self) -> Option<&'a str> {
        self.node.value().as_element().map(|el| el.name())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.value().as_element().and_then(|el| el.attr(name))
    }

    /// Element and comment children, in document order.
    pub fn children(&self) -> impl Iterator<Item = HtmlNode<'a>> + 'a {
        self.node.children().filter_map(HtmlNode::new)
    }

    pub fn has_children(&self) -> bool {
        self.children().next().is_some()
    }

    /// The next element or comment sibling, skipping text.
    pub fn next_node(&self) -> Option<HtmlNode<'a>> {
        self.node.next_siblings().find_map(HtmlNode::new)
    }

    /// Text directly following this node up to the next element or comment.
    ///
    /// Returns `None` when no text node follows at all, `Some` (possibly
    /// whitespace only) otherwise.
    pub fn tail(&self) -> Option<String> {
        let mut tail: Option<String> = None;
        for sibling in self.node.next_siblings() {
            match sibling.value() {
                Node::Text(text) => tail.get_or_insert_with(String::new).push_str(text),
                _ => break,
            }
        }
        tail
    }

    /// Pre-order walk over this node and all element/comment descendants.
    pub fn iter(&self) -> impl Iterator<Item = HtmlNode<'a>> + 'a {
        self.node.descendants().filter_map(HtmlNode::new)
    }

    /// Raw text nodes of the subtree, in document order, skipping the
    /// subtrees of elements whose tag is in `skip_tags`.
    pub(crate) fn text_chunks(&self, skip_tags: &[&str]) -> Vec<&'a str> {
        let mut chunks = Vec::new();
        collect_text(self.node, skip_tags, &mut chunks);
        chunks
    }

    /// Canonical serialization of the subtree followed by its tail text.
    ///
    /// Attributes are emitted sorted by name so two structurally identical
    /// nodes always serialize the same; attributes named `skip_attr` are left
    /// out everywhere in the subtree.
    pub fn to_markup(&self, skip_attr: Option<&str>) -> String {
        let mut out = String::new();
        write_markup(self.node, skip_attr, &mut out);
        if let Some(tail) = self.tail() {
            escape_text(&tail, &mut out);
        }
        out
    }
}

impl<'a> From<ElementRef<'a>> for HtmlNode<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { node: *element }
    }
}

impl fmt::Debug for HtmlNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "HtmlNode(<{tag}>)"),
            None => f.write_str("HtmlNode(<!---->)"),
        }
    }
}

/// What an extractor can be handed by the calling pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// A node already located in a parsed document.
    Node(HtmlNode<'a>),
    /// A parsed document or fragment; its root element is used.
    Document(&'a Html),
    /// Raw text, accepted by the text-only extractors.
    Text(&'a str),
}

impl<'a> Input<'a> {
    /// Normalize to a tree node. `Text` has none.
    pub fn node(self) -> Option<HtmlNode<'a>> {
        match self {
            Input::Node(node) => Some(node),
            Input::Document(html) => Some(html.root_element().into()),
            Input::Text(_) => None,
        }
    }
}

impl<'a> From<HtmlNode<'a>> for Input<'a> {
    fn from(node: HtmlNode<'a>) -> Self {
        Input::Node(node)
    }
}

impl<'a> From<ElementRef<'a>> for Input<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Input::Node(element.into())
    }
}

impl<'a> From<&'a Html> for Input<'a> {
    fn from(html: &'a Html) -> Self {
        Input::Document(html)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

fn collect_text<'a>(node: NodeRef<'a, Node>, skip_tags: &[&str], chunks: &mut Vec<&'a str>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => chunks.push(text),
            Node::Element(el) if !skip_tags.contains(&el.name()) => {
                collect_text(child, skip_tags, chunks);
            }
            _ => {}
        }
    }
}

fn write_markup(node: NodeRef<'_, Node>, skip_attr: Option<&str>, out: &mut String) {
    match node.value() {
        Node::Text(text) => escape_text(text, out),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(el) => {
            let mut attrs: Vec<(&str, &str)> = el
                .attrs()
                .filter(|(name, _)| Some(*name) != skip_attr)
                .collect();
            attrs.sort_unstable();

            out.push('<');
            out.push_str(el.name());
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.name()) {
                return;
            }
            for child in node.children() {
                write_markup(child, skip_attr, out);
            }
            out.push_str("</");
            out.push_str(el.name());
            out.push('>');
        }
        _ => {}
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use scraper::{Html, Selector};

    use super::HtmlNode;

    pub fn fragment(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    /// First top-level element of a parsed fragment.
    pub fn first_element(html: &Html) -> HtmlNode<'_> {
        HtmlNode::from(html.root_element())
            .children()
            .find(|node| !node.is_comment())
            .expect("fragment has an element")
    }

    /// First element matching `css`; panics when nothing matches.
    pub fn select<'a>(html: &'a Html, css: &str) -> HtmlNode<'a> {
        let selector = Selector::parse(css).expect("valid test selector");
        html.select(&selector)
            .next()
            .map(HtmlNode::from)
            .unwrap_or_else(|| panic!("no element matches {css}"))
    }
}
