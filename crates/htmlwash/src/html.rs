//! HTML parsing support.
//!
//! Parses markup with scraper (html5ever) and converts the result to the
//! [`Node`] tree the engine works on.

use scraper::{Html, Node as ScraperNode};

use htmlwash_core::{Node, Result, WashError, DEFAULT_MAX_DEPTH};

/// Parse an HTML fragment into a [`Node`] tree.
///
/// The returned node is a fragment root holding the parsed top-level nodes.
/// Malformed markup is repaired the way browsers do. Comments, doctypes and
/// processing instructions are dropped. Fails with
/// [`WashError::DepthExceeded`] when elements nest deeper than
/// [`DEFAULT_MAX_DEPTH`].
///
/// # Example
///
/// ```rust
/// use htmlwash::parse_html;
///
/// let fragment = parse_html("<p>Hello <b>World</b></p>").unwrap();
/// assert!(fragment.is_fragment());
/// assert_eq!(fragment.inner_html(), "<p>Hello <b>World</b></p>");
/// ```
pub fn parse_html(html: &str) -> Result<Node> {
    parse_html_with_limit(html, DEFAULT_MAX_DEPTH)
}

/// Parse an HTML fragment, refusing element nesting deeper than `max_depth`.
///
/// The conversion keeps its own stack of open elements, so input depth never
/// turns into call depth; the returned tree is at most `max_depth` deep.
pub fn parse_html_with_limit(html: &str, max_depth: usize) -> Result<Node> {
    let document = Html::parse_fragment(html);

    // the fragment parser wraps its output in a synthetic <html> element;
    // each frame is a node under construction and its next unread child
    let mut stack = vec![(Node::fragment(), document.root_element().first_child())];

    while let Some((mut node, cursor)) = stack.pop() {
        let Some(child) = cursor else {
            match stack.last_mut() {
                Some((parent, _)) => parent.add_child(node),
                None => return Ok(node),
            }
            continue;
        };

        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
                stack.push((node, child.next_sibling()));
            }
            ScraperNode::Element(element) => {
                stack.push((node, child.next_sibling()));
                // the fragment frame sits at the bottom, so `stack.len()` is
                // the nesting level of `element`
                if stack.len() > max_depth {
                    return Err(WashError::DepthExceeded { limit: max_depth });
                }
                let opened = Node::element_with_attrs(element.name(), element.attrs().collect());
                stack.push((opened, child.first_child()));
            }
            _ => stack.push((node, child.next_sibling())),
        }
    }

    Ok(Node::fragment())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let node = parse_html("<p>Hello World</p>").unwrap();
        assert!(node.is_fragment());
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].tag_name(), "p");
        assert_eq!(node.text_content(), "Hello World");
    }

    #[test]
    fn test_parse_attributes_lowercased() {
        let node = parse_html(r#"<FONT Color="Red" SIZE=3>x</FONT>"#).unwrap();
        let font = &node.children[0];
        assert_eq!(font.tag_name(), "font");
        assert_eq!(font.attr("color"), Some("Red"));
        assert_eq!(font.attr("size"), Some("3"));
    }

    #[test]
    fn test_parse_keeps_sibling_order() {
        let node = parse_html("a<b>1</b>b<i>2<u>3</u></i>c").unwrap();
        assert_eq!(node.children.len(), 5);
        assert_eq!(node.inner_html(), "a<b>1</b>b<i>2<u>3</u></i>c");
    }

    #[test]
    fn test_parse_repairs_markup() {
        let node = parse_html("<p>unclosed <b>bold").unwrap();
        assert_eq!(node.inner_html(), "<p>unclosed <b>bold</b></p>");
    }

    #[test]
    fn test_entities_round_trip() {
        let node = parse_html("<p>a &amp; b &lt;c&gt;&nbsp;</p>").unwrap();
        assert_eq!(node.text_content(), "a & b <c>\u{a0}");
        assert_eq!(node.inner_html(), "<p>a &amp; b &lt;c&gt;&nbsp;</p>");
    }

    #[test]
    fn test_comments_are_dropped() {
        let node = parse_html("<p>a<!-- note -->b</p>").unwrap();
        assert_eq!(node.inner_html(), "<p>ab</p>");
    }

    #[test]
    fn test_empty_input() {
        let node = parse_html("").unwrap();
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let nested = |levels: usize| format!("{}x{}", "<span>".repeat(levels), "</span>".repeat(levels));

        assert!(parse_html_with_limit(&nested(3), 3).is_ok());
        let err = parse_html_with_limit(&nested(4), 3).unwrap_err();
        assert!(matches!(err, WashError::DepthExceeded { limit: 3 }));
    }

    #[test]
    fn test_nesting_far_past_the_limit() {
        let depth = 50_000;
        let html = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        let err = parse_html(&html).unwrap_err();
        assert!(matches!(
            err,
            WashError::DepthExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        ));
    }
}
