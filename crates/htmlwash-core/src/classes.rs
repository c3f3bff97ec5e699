//! Class whitelist and class-list helpers.

use indexmap::IndexSet;

use crate::config::Config;
use crate::node::Node;

/// Membership test against the configured class whitelist.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy)]
pub struct ClassWhitelist<'a> {
    classes: &'a IndexSet<String>,
}

impl<'a> ClassWhitelist<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            classes: &config.classes,
        }
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Keep whitelisted tokens, dropping duplicates (first occurrence wins)
    pub fn filter<'t, I>(&self, tokens: I) -> Vec<&'t str>
    where
        I: IntoIterator<Item = &'t str>,
    {
        dedup_tokens(tokens.into_iter().filter(|token| self.is_allowed(token)))
    }

    /// Add every whitelisted token of a space separated list to the node
    pub fn add_to(&self, node: &mut Node, class_list: &str) {
        for token in class_list.split_whitespace() {
            if self.is_allowed(token) {
                node.add_class(token);
            }
        }
    }
}

/// Remove duplicate tokens, preserving first-occurrence order
pub(crate) fn dedup_tokens<'t, I>(tokens: I) -> Vec<&'t str>
where
    I: IntoIterator<Item = &'t str>,
{
    tokens
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
