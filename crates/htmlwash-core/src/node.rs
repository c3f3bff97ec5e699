//! Owned DOM tree used by the normalization engine.
//!
//! Any HTML parser can build this structure; the `htmlwash` crate ships one
//! based on html5ever. Nodes own their children and carry no parent pointer:
//! the walker always edits a child through its parent's child vector, which is
//! what lets it replace, remove or splice the node it is visiting.

use indexmap::IndexMap;

/// Node kinds understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node, e.g. `<div>`
    Element,
    /// Text node
    Text,
    /// Container returned by a fragment parse; serializes as its children only
    Fragment,
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type
    pub node_type: NodeType,

    /// Lower-case tag name for elements, `#text` / `#document-fragment` otherwise
    pub node_name: String,

    /// Text content for text nodes
    pub node_value: Option<String>,

    /// Attributes in source order (elements only)
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

/// Void elements never have an end tag in serialized markup
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements whose text content is written verbatim
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Elements whose first newline is swallowed by the parser
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_lowercase(),
            node_value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty fragment root
    pub fn fragment() -> Self {
        Self {
            node_type: NodeType::Fragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_fragment(&self) -> bool {
        self.node_type == NodeType::Fragment
    }

    /// Tag name (lower case); empty for non-elements
    pub fn tag_name(&self) -> &str {
        if self.is_element() {
            &self.node_name
        } else {
            ""
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    /// Remove an attribute, preserving the order of the others
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(&name.to_lowercase())
    }

    /// Snapshot of the attribute names, safe to iterate while mutating
    pub fn attr_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Class tokens from the `class` attribute, in order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_whitespace()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }

    /// Append a class token unless already present
    pub fn add_class(&mut self, name: &str) {
        if name.is_empty() || self.has_class(name) {
            return;
        }
        let joined = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, name),
            _ => name.to_string(),
        };
        self.set_attr("class", &joined);
    }

    /// Replace the class list; an empty list removes the attribute
    pub fn set_classes<'a, I>(&mut self, classes: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = classes.into_iter().collect::<Vec<_>>().join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &joined);
        }
    }

    /// True when the node has no markup of its own inside it: every child is
    /// text made of HTML white space only.
    pub fn is_blank(&self) -> bool {
        self.children().all(Node::is_blank_text)
    }

    /// Text node containing only HTML white space. `&nbsp;` is content.
    pub fn is_blank_text(&self) -> bool {
        self.is_text()
            && self
                .node_value
                .as_deref()
                .unwrap_or("")
                .chars()
                .all(is_html_whitespace)
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            _ => self.children().for_each(|child| child.collect_text(out)),
        }
    }

    /// Serialize the node and its subtree
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_outer(&mut out, false);
        out
    }

    /// Serialize the children only
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_inner(&mut out);
        out
    }

    fn write_outer(&self, out: &mut String, raw_text: bool) {
        match self.node_type {
            NodeType::Text => {
                let text = self.node_value.as_deref().unwrap_or("");
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_html_text(text));
                }
            }
            NodeType::Element => {
                out.push('<');
                out.push_str(&self.node_name);
                for (name, value) in &self.attributes {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');

                if self.is_void_element() {
                    return;
                }

                // parsers drop one leading newline after these start tags
                if LEADING_NEWLINE_ELEMENTS.contains(&self.tag_name())
                    && self
                        .children
                        .first()
                        .and_then(|c| c.node_value.as_deref())
                        .is_some_and(|text| text.starts_with('\n'))
                {
                    out.push('\n');
                }

                self.write_inner(out);
                out.push_str("</");
                out.push_str(&self.node_name);
                out.push('>');
            }
            NodeType::Fragment => self.write_inner(out),
        }
    }

    fn write_inner(&self, out: &mut String) {
        let raw_text = RAW_TEXT_ELEMENTS.contains(&self.tag_name());
        for child in self.children() {
            child.write_outer(out, raw_text);
        }
    }

    /// Check if this is a void element
    fn is_void_element(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag_name())
    }
}

/// ASCII white space as defined by HTML; U+00A0 is not part of it
fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0c' | '\r')
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text content
fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.tag_name(), "");
        assert_eq!(node.text_content(), "Hello World");
    }

    #[test]
    fn test_attributes() {
        let mut node =
            Node::element_with_attrs("a", vec![("href", "https://example.com"), ("TITLE", "Example")]);
        assert_eq!(node.attr("href"), Some("https://example.com"));
        assert_eq!(node.attr("title"), Some("Example"));
        assert_eq!(node.attr("class"), None);

        node.set_attr("href", "/other");
        assert_eq!(node.attr_names(), vec!["href", "title"]);
        assert_eq!(node.remove_attr("href"), Some("/other".to_string()));
        assert!(!node.has_attr("href"));
    }

    #[test]
    fn test_class_list() {
        let mut node = Node::element("p");
        node.add_class("bold");
        node.add_class("italic");
        node.add_class("bold");
        assert_eq!(node.attr("class"), Some("bold italic"));
        assert!(node.has_class("italic"));

        node.set_classes(["italic"]);
        assert_eq!(node.attr("class"), Some("italic"));

        node.set_classes(std::iter::empty());
        assert!(!node.has_attr("class"));
    }

    #[test]
    fn test_is_blank() {
        let mut p = Node::element("p");
        assert!(p.is_blank());
        p.add_child(Node::text("  \n "));
        assert!(p.is_blank());
        p.add_child(Node::element("br"));
        assert!(!p.is_blank());
    }

    #[test]
    fn test_nbsp_is_not_blank() {
        let nbsp = Node::text("\u{a0}");
        assert!(!nbsp.is_blank_text());
        assert!(Node::text(" \t\r\n\x0c").is_blank_text());

        let p = Node::element("p").with_child(nbsp);
        assert!(!p.is_blank());
        assert_eq!(p.outer_html(), "<p>&nbsp;</p>");
    }

    #[test]
    fn test_text_content() {
        let div = Node::element("div")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("span").with_child(Node::text("World")));

        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_outer_html() {
        let a = Node::element_with_attrs("a", vec![("href", "https://example.com")])
            .with_child(Node::text("Link"));

        assert_eq!(a.outer_html(), "<a href=\"https://example.com\">Link</a>");
    }

    #[test]
    fn test_void_element_html() {
        let br = Node::element("br");
        assert_eq!(br.outer_html(), "<br>");

        let img = Node::element_with_attrs("img", vec![("src", "test.png"), ("alt", "Test")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"Test\">");
    }

    #[test]
    fn test_escaping() {
        let p = Node::element_with_attrs("p", vec![("title", "say \"hi\"")])
            .with_child(Node::text("a < b & c"));
        assert_eq!(
            p.outer_html(),
            "<p title=\"say &quot;hi&quot;\">a &lt; b &amp; c</p>"
        );

        let script = Node::element("script").with_child(Node::text("if (a < b) {}"));
        assert_eq!(script.outer_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_pre_leading_newline_survives() {
        let pre = Node::element("pre").with_child(Node::text("\ncode"));
        assert_eq!(pre.outer_html(), "<pre>\n\ncode</pre>");

        let pre = Node::element("pre").with_child(Node::text("code"));
        assert_eq!(pre.outer_html(), "<pre>code</pre>");
    }

    #[test]
    fn test_fragment_serializes_children_only() {
        let fragment = Node::fragment()
            .with_child(Node::element("b").with_child(Node::text("x")))
            .with_child(Node::text("y"));
        assert_eq!(fragment.outer_html(), "<b>x</b>y");
        assert_eq!(fragment.inner_html(), "<b>x</b>y");
    }
}
