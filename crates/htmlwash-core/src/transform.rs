//! Per-tag transformations and the span-collapse heuristic.
//!
//! Every operation works on `parent.children[index]` and reports a [`Step`]
//! telling the walker which node traversal continues from. Nothing here
//! holds on to a node reference across a mutation.

use log::trace;

use crate::classes::{dedup_tokens, ClassWhitelist};
use crate::config::{Config, TagRule};
use crate::node::Node;

/// Where traversal continues after a node was transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The node (or its renamed replacement) is still at `index`; walk into it
    Descend,
    /// The node was detached; its next sibling now sits at `index`
    Removed,
    /// The node was replaced by its children, the first of which sits at `index`
    Spliced,
    /// The node was merged into the parent; restart at the parent's first child
    Merged,
}

/// Applies the configured [`TagRule`]s and collapses useless spans.
#[derive(Debug, Clone, Copy)]
pub struct TagTransformer<'a> {
    config: &'a Config,
    whitelist: ClassWhitelist<'a>,
}

impl<'a> TagTransformer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            whitelist: ClassWhitelist::new(config),
        }
    }

    /// Transform the element at `parent.children[index]`.
    ///
    /// Order matters: empty removal, `Remove` and `Unwrap` short-circuit;
    /// add-class runs before rename; the span check sees the renamed tag.
    /// A renamed element is matched again under its new name, so the rule of
    /// a rename target applies in the same pass.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn transform(&self, parent: &mut Node, index: usize) -> Step {
        if self.is_removable_blank(&parent.children[index]) {
            trace!("<{}>: removing empty element", parent.children[index].tag_name());
            parent.children.remove(index);
            return Step::Removed;
        }

        // each hop renames to a distinct ruled tag, so a chain is never
        // longer than the rule table
        let mut hops = 0;
        loop {
            let tag = parent.children[index].tag_name().to_string();
            match self.config.rule(&tag) {
                Some(TagRule::Remove) => {
                    trace!("<{}>: removing element and content", tag);
                    parent.children.remove(index);
                    return Step::Removed;
                }
                Some(TagRule::Unwrap) => {
                    trace!("<{}>: unwrapping", tag);
                    unwrap_at(parent, index);
                    return Step::Spliced;
                }
                Some(TagRule::Rewrite { rename, add_class }) => {
                    if let Some(classes) = add_class {
                        self.whitelist.add_to(&mut parent.children[index], classes);
                    }
                    // must stay last: later checks read the new tag name
                    match rename {
                        Some(new_tag) if *new_tag != tag && hops < self.config.tags.len() => {
                            rename_at(parent, index, new_tag);
                            hops += 1;
                            continue;
                        }
                        _ => {}
                    }
                }
                None => {}
            }
            break;
        }

        if parent.children[index].tag_name() == "span" {
            return self.collapse_span(parent, index);
        }

        Step::Descend
    }

    /// Post-order emptiness check, for elements emptied by their own
    /// children's removal. Returns true if the element was removed.
    pub fn prune_if_blank(&self, parent: &mut Node, index: usize) -> bool {
        if !self.is_removable_blank(&parent.children[index]) {
            return false;
        }
        trace!(
            "<{}>: removing element emptied by its children",
            parent.children[index].tag_name()
        );
        parent.children.remove(index);
        true
    }

    /// Post-order span merge: once all children of `parent` are final, a span
    /// left as its only content is folded into it.
    pub fn settle(&self, parent: &mut Node) {
        if let Some(index) = sole_span(parent) {
            merge_into_parent(parent, index);
        }
    }

    fn is_removable_blank(&self, node: &Node) -> bool {
        self.config.remove_empty_tags && !self.config.is_void(node.tag_name()) && node.is_blank()
    }

    fn collapse_span(&self, parent: &mut Node, index: usize) -> Step {
        if sole_span(parent) == Some(index) {
            merge_into_parent(parent, index);
            return Step::Merged;
        }

        if !parent.children[index].has_attr("class") {
            trace!("<span>: unwrapping classless span");
            unwrap_at(parent, index);
            return Step::Spliced;
        }

        Step::Descend
    }
}

/// Index of a span that is the only content of an element parent: every
/// sibling is whitespace-only text.
fn sole_span(parent: &Node) -> Option<usize> {
    if !parent.is_element() {
        return None;
    }

    let mut found = None;
    for (i, child) in parent.children().enumerate() {
        if child.is_blank_text() {
            continue;
        }
        if found.is_some() || child.tag_name() != "span" {
            return None;
        }
        found = Some(i);
    }
    found
}

/// Fold `parent.children[index]` into the parent: the parent gains the child's
/// classes and the child's content replaces the parent's content.
fn merge_into_parent(parent: &mut Node, index: usize) {
    let child = parent.children.remove(index);
    trace!("<{}>: merging sole <{}> child", parent.tag_name(), child.tag_name());

    let merged: Vec<String> = dedup_tokens(parent.classes().chain(child.classes()))
        .into_iter()
        .map(String::from)
        .collect();
    parent.set_classes(merged.iter().map(String::as_str));
    parent.children = child.children;
}

/// Replace `parent.children[index]` with its own children, in place
fn unwrap_at(parent: &mut Node, index: usize) {
    let node = parent.children.remove(index);
    parent.children.splice(index..index, node.children);
}

/// Replace the element with a new `new_tag` element carrying the same
/// children and class list. Other attributes are dropped.
fn rename_at(parent: &mut Node, index: usize, new_tag: &str) {
    let old = &mut parent.children[index];
    if old.tag_name() == new_tag {
        return;
    }
    trace!("<{}>: renaming to <{}>", old.tag_name(), new_tag);

    let mut renamed = Node::element(new_tag);
    if let Some(class) = old.attr("class").filter(|c| !c.trim().is_empty()) {
        renamed.set_attr("class", class);
    }
    renamed.children = std::mem::take(&mut old.children);
    *old = renamed;
}
