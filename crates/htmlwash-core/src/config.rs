//! Engine configuration: tag rules, class whitelist and style-to-class tables.
//!
//! A [`Config`] is built once (from [`Config::default`], JSON, or the builder
//! methods) and is read-only afterwards, so it can be shared between threads.

use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Result, WashError};

/// Default nesting limit for the walker
pub const DEFAULT_MAX_DEPTH: usize = 2048;

/// How a single tag is transformed.
///
/// Remove and unwrap are terminal and exclusive; rename and add-class may be
/// combined in a [`TagRule::Rewrite`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RawTagRule")]
pub enum TagRule {
    /// Drop the element together with its content
    Remove,
    /// Replace the element with its children
    Unwrap,
    /// Keep the element, optionally adding classes and/or renaming it
    Rewrite {
        rename: Option<String>,
        /// Space separated class list
        add_class: Option<String>,
    },
}

impl TagRule {
    /// Rule that renames the tag
    pub fn rename(to: &str) -> Self {
        TagRule::Rewrite {
            rename: Some(to.to_lowercase()),
            add_class: None,
        }
    }

    /// Rule that adds one or more (space separated) classes
    pub fn add_class(classes: &str) -> Self {
        TagRule::Rewrite {
            rename: None,
            add_class: Some(classes.to_string()),
        }
    }

    /// Rule that adds classes and renames the tag
    pub fn rename_with_class(to: &str, classes: &str) -> Self {
        TagRule::Rewrite {
            rename: Some(to.to_lowercase()),
            add_class: Some(classes.to_string()),
        }
    }

    fn from_raw(tag: &str, raw: RawTagRule) -> Result<Self> {
        let invalid = |reason: &str| WashError::InvalidRule {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };

        let rename = raw.rename.map(|name| name.trim().to_lowercase());
        if rename.as_deref() == Some("") {
            return Err(invalid("rename target is empty"));
        }
        let rewrites = rename.is_some() || raw.add_class.is_some();

        match (raw.remove, raw.unwrap, rewrites) {
            (true, false, false) => Ok(TagRule::Remove),
            (false, true, false) => Ok(TagRule::Unwrap),
            (false, false, true) => Ok(TagRule::Rewrite {
                rename,
                add_class: raw.add_class,
            }),
            (false, false, false) => Err(invalid("rule has no action")),
            (true, _, _) => Err(invalid("remove cannot be combined with other actions")),
            (false, true, true) => Err(invalid("unwrap cannot be combined with other actions")),
        }
    }
}

/// Wire shape of a tag rule: `{ "rename"?, "remove"?, "unwrap"?, "addClass"? }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawTagRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rename: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    remove: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    unwrap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    add_class: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<TagRule> for RawTagRule {
    fn from(rule: TagRule) -> Self {
        match rule {
            TagRule::Remove => RawTagRule {
                remove: true,
                ..Default::default()
            },
            TagRule::Unwrap => RawTagRule {
                unwrap: true,
                ..Default::default()
            },
            TagRule::Rewrite { rename, add_class } => RawTagRule {
                rename,
                add_class,
                ..Default::default()
            },
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawConfig")]
pub struct Config {
    /// Remove elements whose content is blank (void elements excepted)
    pub remove_empty_tags: bool,

    /// Per-tag rules, keyed by lower-case tag name
    pub tags: IndexMap<String, TagRule>,

    /// Whitelist of permitted class names
    pub classes: IndexSet<String>,

    /// Declaration (or legacy attribute) name -> raw value -> class
    pub style_to_class: IndexMap<String, IndexMap<String, String>>,

    /// Tags exempt from empty-tag removal
    pub void_elements: IndexSet<String>,

    /// Deepest element nesting the walker accepts
    pub max_depth: usize,
}

/// Wire shape of a configuration; every field falls back to its default
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    remove_empty_tags: Option<bool>,
    tags: Option<IndexMap<String, RawTagRule>>,
    classes: Option<IndexSet<String>>,
    style_to_class: Option<IndexMap<String, IndexMap<String, String>>>,
    void_elements: Option<IndexSet<String>>,
    max_depth: Option<usize>,
}

impl TryFrom<RawConfig> for Config {
    type Error = WashError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let defaults = Config::default();

        let tags = match raw.tags {
            Some(tags) => tags
                .into_iter()
                .map(|(tag, rule)| {
                    let tag = tag.to_lowercase();
                    let rule = TagRule::from_raw(&tag, rule)?;
                    Ok((tag, rule))
                })
                .collect::<Result<IndexMap<_, _>>>()?,
            None => defaults.tags,
        };

        let style_to_class = match raw.style_to_class {
            Some(table) => table
                .into_iter()
                .map(|(declaration, values)| (declaration.to_lowercase(), values))
                .collect(),
            None => defaults.style_to_class,
        };

        let void_elements = match raw.void_elements {
            Some(tags) => tags.into_iter().map(|t| t.to_lowercase()).collect(),
            None => defaults.void_elements,
        };

        let config = Config {
            remove_empty_tags: raw.remove_empty_tags.unwrap_or(defaults.remove_empty_tags),
            tags,
            classes: raw.classes.unwrap_or(defaults.classes),
            style_to_class,
            void_elements,
            max_depth: raw.max_depth.unwrap_or(defaults.max_depth),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let config = Config::try_from(raw)?;
        debug!(
            "Loaded configuration: {} tag rules, {} classes, {} style mappings",
            config.tags.len(),
            config.classes.len(),
            config.style_to_class.len()
        );
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that following renames always ends at a tag that keeps its name.
    ///
    /// A renamed element is matched again under its new name, so a rename
    /// cycle (`a -> b`, `b -> a`) would never settle.
    pub fn validate(&self) -> Result<()> {
        for start in self.tags.keys() {
            let mut seen: IndexSet<&str> = IndexSet::new();
            let mut current = start.as_str();
            seen.insert(current);

            while let Some(TagRule::Rewrite {
                rename: Some(next), ..
            }) = self.tags.get(current)
            {
                if next == current {
                    break;
                }
                if !seen.insert(next.as_str()) {
                    return Err(WashError::InvalidRule {
                        tag: start.clone(),
                        reason: format!("rename cycle through <{}>", next),
                    });
                }
                current = next.as_str();
            }
        }
        Ok(())
    }

    /// Look up the rule for a tag
    pub fn rule(&self, tag: &str) -> Option<&TagRule> {
        self.tags.get(tag)
    }

    /// Is the tag exempt from empty-tag removal
    pub fn is_void(&self, tag: &str) -> bool {
        self.void_elements.contains(tag)
    }

    pub fn with_rule(mut self, tag: &str, rule: TagRule) -> Self {
        self.tags.insert(tag.to_lowercase(), rule);
        self
    }

    pub fn allow_class(mut self, name: &str) -> Self {
        self.classes.insert(name.to_string());
        self
    }

    /// Map `declaration: value` to `class`. The class still has to be
    /// whitelisted with [`Config::allow_class`] to take effect.
    pub fn map_style(mut self, declaration: &str, value: &str, class: &str) -> Self {
        self.style_to_class
            .entry(declaration.to_lowercase())
            .or_default()
            .insert(value.to_string(), class.to_string());
        self
    }

    pub fn remove_empty_tags(mut self, enabled: bool) -> Self {
        self.remove_empty_tags = enabled;
        self
    }

    pub fn void_element(mut self, tag: &str) -> Self {
        self.void_elements.insert(tag.to_lowercase());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        let tags: IndexMap<String, TagRule> = [
            ("font", TagRule::rename("span")),
            ("b", TagRule::rename("strong")),
            ("i", TagRule::rename("em")),
        ]
        .into_iter()
        .map(|(tag, rule)| (tag.to_string(), rule))
        .collect();

        let classes: IndexSet<String> = [
            "ta-right",
            "ta-center",
            "ta-left",
            "ta-justify",
            "color-red",
            "color-green",
            "color-blue",
            "fz-smallest",
            "fz-smaller",
            "fz-small",
            "fz-normal",
            "fz-big",
            "fz-bigger",
            "fz-biggest",
            "bold",
            "italic",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let style_to_class: IndexMap<String, IndexMap<String, String>> = [
            (
                "text-align",
                &[
                    ("right", "ta-right"),
                    ("center", "ta-center"),
                    ("left", "ta-left"),
                    ("justify", "ta-justify"),
                ][..],
            ),
            (
                "color",
                &[
                    ("red", "color-red"),
                    ("green", "color-green"),
                    ("blue", "color-blue"),
                    ("#ff0000", "color-red"),
                    ("#00ff00", "color-green"),
                    ("#0000ff", "color-blue"),
                ][..],
            ),
            (
                "size",
                &[
                    ("1", "fz-smallest"),
                    ("2", "fz-smaller"),
                    ("3", "fz-small"),
                    ("4", "fz-normal"),
                    ("5", "fz-big"),
                    ("6", "fz-bigger"),
                    ("7", "fz-biggest"),
                ][..],
            ),
        ]
        .into_iter()
        .map(|(declaration, values)| {
            let values: IndexMap<String, String> = values
                .iter()
                .map(|(value, class)| (value.to_string(), class.to_string()))
                .collect();
            (declaration.to_string(), values)
        })
        .collect();

        let void_elements: IndexSet<String> = [
            "hr", "br", "input", "img", "textarea", "meta", "link", "base", "embed", "param",
            "area", "col", "iframe",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            remove_empty_tags: false,
            tags,
            classes,
            style_to_class,
            void_elements,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
