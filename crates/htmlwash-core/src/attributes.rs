//! Per-element attribute pass.

use log::trace;

use crate::classes::ClassWhitelist;
use crate::config::Config;
use crate::node::Node;
use crate::style::StyleMapper;

/// Attributes that survive processing
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "class"];

/// Converts presentational attributes to classes and strips everything that
/// is not in [`ALLOWED_ATTRIBUTES`].
#[derive(Debug, Clone, Copy)]
pub struct AttributeProcessor<'a> {
    mapper: StyleMapper<'a>,
    whitelist: ClassWhitelist<'a>,
}

impl<'a> AttributeProcessor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            mapper: StyleMapper::new(config),
            whitelist: ClassWhitelist::new(config),
        }
    }

    /// Process every attribute of an element.
    pub fn process(&self, node: &mut Node) {
        // names are snapshotted: handlers remove attributes as they go
        for name in node.attr_names() {
            match name.as_str() {
                "style" => {
                    if let Some(style) = node.remove_attr(&name) {
                        self.apply_style(node, &style);
                    }
                }
                "size" | "color" => {
                    if let Some(value) = node.remove_attr(&name) {
                        self.apply_mapping(node, &name, &value);
                    }
                }
                "class" => self.purge_classes(node),
                "href" | "src" | "alt" | "title" => {}
                _ => {
                    trace!("<{}>: dropping attribute {}", node.tag_name(), name);
                    node.remove_attr(&name);
                }
            }
        }
    }

    /// Inline style text to classes. Whitespace is insignificant for the
    /// recognized declarations, so it is stripped before splitting.
    fn apply_style(&self, node: &mut Node, style: &str) {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();

        for declaration in compact.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            self.apply_mapping(node, &property.to_lowercase(), value);
        }
    }

    fn apply_mapping(&self, node: &mut Node, declaration: &str, value: &str) {
        match self.mapper.map_to_class(declaration, value) {
            Some(class) => node.add_class(class),
            None => trace!(
                "<{}>: no class for {}: {}",
                node.tag_name(),
                declaration,
                value
            ),
        }
    }

    /// Drop classes that are not whitelisted; remove `class` if none is left
    fn purge_classes(&self, node: &mut Node) {
        let kept: Vec<String> = self
            .whitelist
            .filter(node.classes())
            .into_iter()
            .map(String::from)
            .collect();
        node.set_classes(kept.iter().map(String::as_str));
    }
}
