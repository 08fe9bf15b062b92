//! Brand name extraction
//!
//! Looks at the node's own text first and falls back to the `alt` and
//! `title` of images at or below the node (brand logos).

use serde::{Deserialize, Serialize};

use crate::config::BrandOptions;
use crate::node::{HtmlNode, Input};
use crate::text::extract_text;

/// Longer candidates are sentences, not brand names.
const BRAND_LENGTH_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
}

/// Extract a brand from a node that contains it.
pub fn extract_brand<'a>(input: impl Into<Input<'a>>, options: BrandOptions) -> Option<Brand> {
    extract_brand_name(input, options.search_depth).map(|name| Brand { name })
}

/// Extract a brand name from a node that contains it.
///
/// An `img` node only offers its own `alt` and `title`. Any other node offers
/// its visible text or, when it has none, the `alt` and `title` of images up
/// to `search_depth` levels down. The first candidate shorter than 50
/// characters wins.
pub fn extract_brand_name<'a>(input: impl Into<Input<'a>>, search_depth: usize) -> Option<String> {
    let node = input.into().node()?;

    let candidates = if node.is_tag("img") {
        image_texts(node, 0)
    } else {
        match extract_text(node) {
            Some(text) => vec![text],
            None => image_texts(node, search_depth),
        }
    };

    candidates
        .into_iter()
        .find(|name| name.chars().count() < BRAND_LENGTH_LIMIT)
}

/// Non-blank `alt` then `title` of every image within `depth` levels, in
/// document order.
pub fn image_texts(node: HtmlNode<'_>, depth: usize) -> Vec<String> {
    let mut images = Vec::new();
    collect_images(node, depth, &mut images);

    images
        .into_iter()
        .flat_map(|img| ["alt", "title"].map(|attr| img.attr(attr)))
        .flatten()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .collect()
}

fn collect_images<'a>(node: HtmlNode<'a>, depth: usize, images: &mut Vec<HtmlNode<'a>>) {
    if node.is_tag("img") {
        images.push(node);
    }
    if depth == 0 {
        return;
    }
    for child in node.children() {
        collect_images(child, depth - 1, images);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::node::test_support::{fragment, select};

    const HTML: &str = concat!(
        r#"<div id="brand">simple brand</div>"#,
        r#"<div id="wrapper">"#,
        r#"<img id="img-alt" alt="my alt brand" title="foo" src="image-alt.png"/>"#,
        r#"<IMG id="img-title" title="my title brand" src="image-title.png"/>"#,
        r#"<img id="img-bare" src="image-bare.png"/>"#,
        r#"<img id="img-long" alt="very LOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOONG brand" title="short brand"/>"#,
        r#"</div>"#,
        r#"<div id="deep"><p><span><img alt="too deep"></span></p></div>"#,
    );

    #[rstest]
    #[case("#brand", Some("simple brand"))]
    #[case("#img-alt", Some("my alt brand"))]
    #[case("#img-title", Some("my title brand"))]
    #[case("#img-bare", None)]
    #[case("#wrapper", Some("my alt brand"))]
    #[case("#img-long", Some("short brand"))]
    #[case("#deep", None)]
    fn test_extract_brand(#[case] css: &str, #[case] expected: Option<&str>) {
        let doc = fragment(HTML);
        let brand = extract_brand(select(&doc, css), BrandOptions { search_depth: 2 });
        assert_eq!(
            brand,
            expected.map(|name| Brand {
                name: name.to_owned()
            })
        );
    }

    #[test]
    fn test_search_depth_bounds_image_lookup() {
        let doc = fragment(HTML);
        let wrapper = select(&doc, "#wrapper");
        assert_eq!(extract_brand_name(wrapper, 0), None);
        assert_eq!(
            extract_brand_name(select(&doc, "#deep"), 3).as_deref(),
            Some("too deep")
        );
    }

    #[test]
    fn test_image_texts_order() {
        let doc = fragment(HTML);
        assert_eq!(
            image_texts(select(&doc, "#wrapper"), 1),
            vec![
                "my alt brand",
                "foo",
                "my title brand",
                "very LOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOONG brand",
                "short brand",
            ]
        );
    }
}
