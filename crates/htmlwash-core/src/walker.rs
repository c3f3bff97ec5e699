//! Mutation-aware pre-order traversal.

use log::trace;

use crate::attributes::AttributeProcessor;
use crate::config::Config;
use crate::node::Node;
use crate::transform::{Step, TagTransformer};
use crate::{Result, WashError};

/// Walks a tree, running the attribute pass and then the tag transformer on
/// every element.
///
/// Children are visited through an index into the parent's live child vector.
/// Each transformation returns a [`Step`] saying where to continue, so a node
/// may be removed, replaced, spliced or merged into its parent mid-walk without
/// any sibling being skipped or visited twice.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    config: &'a Config,
    attributes: AttributeProcessor<'a>,
    transformer: TagTransformer<'a>,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            attributes: AttributeProcessor::new(config),
            transformer: TagTransformer::new(config),
        }
    }

    /// Normalize every descendant of `root` in place.
    ///
    /// The root itself is never transformed, only its content. Fails with
    /// [`WashError::InvalidRule`] before touching the tree when the rename
    /// rules form a cycle, and with [`WashError::DepthExceeded`] when elements
    /// nest deeper than [`Config::max_depth`]; the tree is left partially
    /// processed in that case.
    pub fn walk(&self, root: &mut Node) -> Result<()> {
        self.config.validate()?;
        self.walk_children(root, 0)
    }

    fn walk_children(&self, parent: &mut Node, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(WashError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let mut index = 0;
        while index < parent.children.len() {
            if !parent.children[index].is_element() {
                index += 1;
                continue;
            }

            self.attributes.process(&mut parent.children[index]);

            match self.transformer.transform(parent, index) {
                Step::Descend => {
                    self.walk_children(&mut parent.children[index], depth + 1)?;
                    if !self.transformer.prune_if_blank(parent, index) {
                        index += 1;
                    }
                }
                // the next unvisited node already sits at `index`
                Step::Removed | Step::Spliced => {}
                Step::Merged => {
                    trace!("<{}>: restarting after merge", parent.tag_name());
                    index = 0;
                }
            }
        }

        self.transformer.settle(parent);
        Ok(())
    }
}
