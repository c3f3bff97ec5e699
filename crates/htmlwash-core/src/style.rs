//! Style declaration / legacy attribute to class mapping.

use crate::classes::ClassWhitelist;
use crate::color;
use crate::config::Config;

/// Maps `(declaration, value)` pairs to whitelisted classes.
#[derive(Debug, Clone, Copy)]
pub struct StyleMapper<'a> {
    config: &'a Config,
    whitelist: ClassWhitelist<'a>,
}

impl<'a> StyleMapper<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            whitelist: ClassWhitelist::new(config),
        }
    }

    /// Find the class for a declaration value.
    ///
    /// `color` values are normalized first; every other value must match a
    /// table key literally. A mapped class that is not whitelisted is inert.
    pub fn map_to_class(&self, declaration: &str, raw_value: &str) -> Option<&'a str> {
        let values = self.config.style_to_class.get(declaration)?;

        let class = if declaration == "color" {
            values.get(&color::normalize(raw_value))
        } else {
            values.get(raw_value)
        }?;

        self.whitelist
            .is_allowed(class)
            .then_some(class.as_str())
    }
}
