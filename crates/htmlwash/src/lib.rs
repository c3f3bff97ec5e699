//! # htmlwash
//!
//! Normalize untrusted or inconsistently formatted HTML fragments into a
//! whitelisted subset of tags, attributes and classes.
//!
//! ## What it does
//!
//! - Applies per-tag rules: remove, unwrap, rename, add classes
//! - Strips every attribute except `href`, `src`, `alt`, `title` and `class`
//! - Turns inline styles and legacy attributes (`size`, `color`) into
//!   whitelisted classes, normalizing colors on the way
//! - Collapses spans that carry no meaning
//!
//! Output is a fixed point: cleaning it again changes nothing.
//!
//! It is not a defense against script injection on its own; pair it with
//! `remove` rules for dangerous tags.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! let cleaned = htmlwash::clean_up(r#"<font color="red" face="Arial">x</font>"#);
//! assert_eq!(cleaned, r#"<span class="color-red">x</span>"#);
//! ```
//!
//! ## Example (custom rules)
//!
//! ```rust
//! use htmlwash::{Config, Sanitizer, TagRule};
//!
//! let config = Config::default()
//!     .with_rule("script", TagRule::Remove)
//!     .remove_empty_tags(true);
//! let sanitizer = Sanitizer::with_config(config);
//!
//! let cleaned = sanitizer.clean_up(r#"<p><b></b>hi<script>x()</script></p>"#);
//! assert_eq!(cleaned, "<p>hi</p>");
//! ```

#[cfg(feature = "html")]
pub mod html;
mod service;

#[cfg(feature = "html")]
pub use html::{parse_html, parse_html_with_limit};
pub use htmlwash_core::{
    color, AttributeProcessor, ClassWhitelist, Config, Node, NodeType, Result, StyleMapper, Step,
    TagRule, TagTransformer, WashError, Walker, ALLOWED_ATTRIBUTES, DEFAULT_MAX_DEPTH,
};
pub use service::Sanitizer;

#[cfg(feature = "html")]
use once_cell::sync::Lazy;

#[cfg(feature = "html")]
static DEFAULT_SANITIZER: Lazy<Sanitizer> = Lazy::new(Sanitizer::new);

/// Clean an HTML fragment with the built-in rule set.
///
/// Shorthand for `Sanitizer::new().clean_up(html)` that reuses one shared,
/// read-only instance.
#[cfg(feature = "html")]
pub fn clean_up(html: &str) -> String {
    DEFAULT_SANITIZER.clean_up(html)
}
