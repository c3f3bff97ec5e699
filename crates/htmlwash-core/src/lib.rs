//! # htmlwash-core
//!
//! Rule-driven normalization of HTML trees into a whitelisted subset.
//!
//! This crate holds the tree model and the engine; it does not parse markup.
//! The `htmlwash` crate adds an html5ever-based parser and the string-level
//! `clean_up` entry point.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────────────── Walker ───────────────────────┐
//! Node tree ─▶ AttributeProcessor ──▶ TagTransformer ──▶ Step        │ ─▶ Node tree
//!            │   │ StyleMapper          │ span collapse    (descend, │
//!            │   │  └ color::normalize  │                   removed, │
//!            │   └ ClassWhitelist ◀─────┘                   spliced, │
//!            │                                              merged)  │
//!            └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use htmlwash_core::{Config, Node, Walker};
//!
//! let config = Config::default();
//! let mut root = Node::fragment().with_child(
//!     Node::element_with_attrs("font", vec![("color", "#f00")]).with_child(Node::text("x")),
//! );
//!
//! Walker::new(&config).walk(&mut root).unwrap();
//! assert_eq!(root.inner_html(), r#"<span class="color-red">x</span>"#);
//! ```

mod attributes;
mod classes;
pub mod color;
mod config;
pub mod node;
mod style;
mod transform;
mod walker;

pub use attributes::{AttributeProcessor, ALLOWED_ATTRIBUTES};
pub use classes::ClassWhitelist;
pub use config::{Config, TagRule, DEFAULT_MAX_DEPTH};
pub use node::{Node, NodeType};
pub use style::StyleMapper;
pub use transform::{Step, TagTransformer};
pub use walker::Walker;

/// Error type for htmlwash operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WashError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("Invalid rule for <{tag}>: {reason}")]
    InvalidRule { tag: String, reason: String },

    #[error("Tree is nested deeper than the limit of {limit} elements")]
    DepthExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, WashError>;
