//! Generic HTML node tree for tabpanel.
//!
//! - [`Node`] / [`Element`] — one node type for every tag
//! - [`NodePath`] — index-path handles into a tree
//! - [`Document`] — `html` root with head and body regions
//! - [`find_first`] / [`find_all`] — depth-first predicate search
//! - [`parse_document`] / [`parse_fragment_root`] — `scraper`-backed parsing
//! - [`to_html`] — HTML5 serialization

mod document;
mod node;
mod parse;
mod search;
mod serialize;

pub use document::{Document, Regions};
pub use node::{Element, Node, NodePath};
pub use parse::{parse_document, parse_fragment_root};
pub use search::{Scope, find_all, find_first, tag_with_class};
pub use serialize::{element_to_html, to_html};
