//! Sanitizer - the main entry point for HTML normalization.

#[cfg(feature = "html")]
use log::{debug, warn};

use htmlwash_core::{Config, Node, Result, Walker};

#[cfg(feature = "html")]
use crate::html::parse_html_with_limit;

/// The main service for normalizing HTML fragments.
///
/// A `Sanitizer` only reads its configuration, so one instance can serve
/// any number of threads. Every call builds and drops its own tree.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    config: Config,
}

impl Sanitizer {
    /// Create a Sanitizer with the built-in rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Sanitizer with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize an HTML fragment.
    ///
    /// Best effort: empty input, and any input the engine gives up on, is
    /// returned unchanged. That includes markup nested deeper than
    /// [`Config::max_depth`], which is refused while parsing.
    #[cfg(feature = "html")]
    pub fn clean_up(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let cleaned = parse_html_with_limit(html, self.config.max_depth).and_then(|mut tree| {
            self.clean_tree(&mut tree)?;
            Ok(tree.inner_html())
        });
        match cleaned {
            Ok(cleaned) => {
                debug!(
                    "Cleaned fragment: {} bytes in, {} bytes out",
                    html.len(),
                    cleaned.len()
                );
                cleaned
            }
            Err(err) => {
                warn!("Returning input unchanged: {}", err);
                html.to_string()
            }
        }
    }

    /// Normalize an already-built tree and serialize it.
    ///
    /// A fragment is cleaned as-is; any other node is cleaned as the single
    /// child of a fragment, so the node itself is subject to the rules too.
    pub fn clean_up_node(&self, node: Node) -> Result<String> {
        let mut root = if node.is_fragment() {
            node
        } else {
            Node::fragment().with_child(node)
        };
        self.clean_tree(&mut root)?;
        Ok(root.inner_html())
    }

    /// Normalize every descendant of `root` in place; `root` itself is kept.
    pub fn clean_tree(&self, root: &mut Node) -> Result<()> {
        Walker::new(&self.config).walk(root)
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use htmlwash_core::{TagRule, WashError};
    use test_log::test;

    #[test]
    fn test_font_color_to_span_class() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up(r#"<font color="red">x</font>"#),
            r#"<span class="color-red">x</span>"#
        );
    }

    #[test]
    fn test_colors_in_styles_and_attributes() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up(r#"<p style="color: rgb(255, 0, 0)">x</p>"#),
            r#"<p class="color-red">x</p>"#
        );
        assert_eq!(
            sanitizer.clean_up(r##"<p><font color="#f00">x</font> y</p>"##),
            r#"<p><span class="color-red">x</span> y</p>"#
        );
    }

    #[test]
    fn test_renames() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up("<p><b>bold</b> and <i>italic</i></p>"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn test_attributes_are_stripped() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up(
                r#"<p id="x" onclick="evil()" class="MsoNormal bold"><a href="/x" target="_blank">l</a></p>"#
            ),
            r#"<p class="bold"><a href="/x">l</a></p>"#
        );
    }

    #[test]
    fn test_remove_and_unwrap_rules() {
        let config = Config::default()
            .with_rule("script", TagRule::Remove)
            .with_rule("center", TagRule::Unwrap);
        let sanitizer = Sanitizer::with_config(config);

        assert_eq!(
            sanitizer.clean_up("<div>a<script>alert(1)</script>b</div>"),
            "<div>ab</div>"
        );
        assert_eq!(
            sanitizer.clean_up("<div>a<center>b<em>c</em></center>d</div>"),
            "<div>ab<em>c</em>d</div>"
        );
    }

    #[test]
    fn test_empty_tags() {
        let sanitizer = Sanitizer::with_config(Config::default().remove_empty_tags(true));
        assert_eq!(sanitizer.clean_up("<p>x<b></b><br>y</p>"), "<p>x<br>y</p>");
        assert_eq!(sanitizer.clean_up("<p> </p><br>"), "<br>");

        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up("<p>x<b></b></p>"),
            "<p>x<strong></strong></p>"
        );
    }

    #[test]
    fn test_span_collapsing() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up(r#"<div><span class="bold">hi</span></div>"#),
            r#"<div class="bold">hi</div>"#
        );
        assert_eq!(
            sanitizer.clean_up("<div><span>hi</span> text</div>"),
            "<div>hi text</div>"
        );
        assert_eq!(
            sanitizer.clean_up(r#"<div><span class="bold">hi</span> text</div>"#),
            r#"<div><span class="bold">hi</span> text</div>"#
        );
    }

    #[test]
    fn test_nbsp_is_content() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.clean_up(r#"<div>&nbsp;<span class="bold">x</span></div>"#),
            r#"<div>&nbsp;<span class="bold">x</span></div>"#
        );

        let sanitizer = Sanitizer::with_config(Config::default().remove_empty_tags(true));
        assert_eq!(
            sanitizer.clean_up("<p>&nbsp;</p><p> </p><p>x</p>"),
            "<p>&nbsp;</p><p>x</p>"
        );
    }

    #[test]
    fn test_rename_into_unwrapped_tag() {
        let config = Config::default()
            .with_rule("center", TagRule::Unwrap)
            .with_rule("u", TagRule::rename("center"));
        let sanitizer = Sanitizer::with_config(config);

        let once = sanitizer.clean_up("<p>a<u>b</u>c</p>");
        assert_eq!(once, "<p>abc</p>");
        assert_eq!(sanitizer.clean_up(&once), once);
    }

    #[test]
    fn test_rename_cycle_returns_input() {
        let sanitizer =
            Sanitizer::with_config(Config::default().with_rule("strong", TagRule::rename("b")));
        let input = "<p><b>x</b></p>";
        assert_eq!(sanitizer.clean_up(input), input);
    }

    #[test]
    fn test_empty_input_is_returned() {
        let sanitizer = Sanitizer::new();
        assert_eq!(sanitizer.clean_up(""), "");
    }

    #[test]
    fn test_depth_error_returns_input() {
        let sanitizer = Sanitizer::with_config(Config::default().max_depth(2));
        let input = "<div><div><div><b>x</b></div></div></div>";
        assert_eq!(sanitizer.clean_up(input), input);
    }

    #[test]
    fn test_clean_up_node() {
        let sanitizer = Sanitizer::new();
        let font = Node::element_with_attrs("font", vec![("size", "1"), ("face", "Arial")])
            .with_child(Node::text("small"));
        assert_eq!(
            sanitizer.clean_up_node(font).unwrap(),
            r#"<span class="fz-smallest">small</span>"#
        );

        let fragment = Node::fragment().with_child(Node::element("b").with_child(Node::text("x")));
        assert_eq!(
            sanitizer.clean_up_node(fragment).unwrap(),
            "<strong>x</strong>"
        );
    }

    #[test]
    fn test_clean_up_node_depth_error() {
        let sanitizer = Sanitizer::with_config(Config::default().max_depth(1));
        let tree = Node::element("div").with_child(Node::element("div"));
        let err = sanitizer.clean_up_node(tree).unwrap_err();
        assert!(matches!(err, WashError::DepthExceeded { limit: 1 }));
    }

    #[test]
    fn test_clean_tree_keeps_root() {
        let sanitizer = Sanitizer::new();
        let mut root = Node::element_with_attrs("b", vec![("onclick", "x")])
            .with_child(Node::element("i").with_child(Node::text("y")));
        sanitizer.clean_tree(&mut root).unwrap();
        assert_eq!(root.outer_html(), r#"<b onclick="x"><em>y</em></b>"#);
    }

    #[test]
    fn test_sanitizer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sanitizer>();
    }
}
