//! Field extraction from rendered HTML.
//!
//! The page pipeline needs two semantic fields that only exist inside the
//! rendered markup: the title (first `<h1>`) and the teaser (first `<p>`).
//! This module parses the renderer's output into a tree once and answers
//! "first element named X, flattened to text" queries against it.
//!
//! The renderer is the sole producer of the HTML handled here, but entry
//! bodies may embed raw user HTML, so parsing stays tolerant: malformed
//! markup degrades rather than fails, and a missing element is a normal
//! outcome, not an error.

use tl::{ParserOptions, VDom};

/// Parse an HTML fragment into a traversable tree.
pub fn parse(html: &str) -> Result<VDom<'_>, tl::ParseError> {
    tl::parse(html, ParserOptions::default())
}

/// Flattened text of the first element named `name`, in document order.
///
/// Document order is a depth-first pre-order walk: an element is considered
/// before its children, and every child of every node is visited. The
/// flattened value concatenates the element's descendant text nodes in that
/// same order, with HTML entities decoded and no added separators:
/// `<h1>A<b>B</b></h1>` flattens to `AB`.
///
/// `None` means the document has no such element, which is expected for
/// entries without a heading or paragraph.
pub fn first_element(dom: &VDom<'_>, name: &str) -> Option<String> {
    let parser = dom.parser();
    for node in dom.nodes() {
        if let Some(tag) = node.as_tag()
            && tag.name().as_utf8_str() == name
        {
            let text = node.inner_text(parser);
            return Some(html_escape::decode_html_entities(&text).into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(html: &str, name: &str) -> Option<String> {
        let dom = parse(html).unwrap();
        first_element(&dom, name)
    }

    #[test]
    fn nested_markup_flattens_in_order() {
        assert_eq!(first("<h1>A<b>B</b></h1>", "h1").as_deref(), Some("AB"));
    }

    #[test]
    fn missing_element_is_none() {
        assert_eq!(first("<p>no heading here</p>", "h1"), None);
    }

    #[test]
    fn first_of_several_wins() {
        assert_eq!(
            first("<p>one</p><p>two</p><p>three</p>", "p").as_deref(),
            Some("one")
        );
    }

    #[test]
    fn element_found_at_depth() {
        assert_eq!(
            first("<div><section><h1>Deep</h1></section></div>", "h1").as_deref(),
            Some("Deep")
        );
    }

    #[test]
    fn empty_element_flattens_to_empty_string() {
        assert_eq!(first("<p></p>", "p").as_deref(), Some(""));
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(
            first("<p>Fish &amp; Chips</p>", "p").as_deref(),
            Some("Fish & Chips")
        );
    }

    #[test]
    fn only_text_nodes_contribute() {
        assert_eq!(
            first("<p>a<img src=\"x.png\">b<!-- note -->c</p>", "p").as_deref(),
            Some("abc")
        );
    }
}
