//! xmlenum - enumerate the tag shapes beneath an XML element
//!
//! Every occurrence of a chosen root element, across any number of
//! documents, is merged into one [`TagTree`]: a tag that ever contains a
//! child element becomes a branch, everything else stays a leaf. The merged
//! tree renders as indented text, leaves before branches, alphabetical
//! within each group.
//!
//! # Quick Start
//!
//! ```
//! use xmlenum::{render, Aggregator};
//! # fn main() -> Result<(), xmlenum::Error> {
//! let mut aggregator = Aggregator::new("catalog");
//! aggregator.feed_bytes(b"<catalog><item><name>A</name></item></catalog>")?;
//! aggregator.feed_bytes(b"<catalog><item><price>9</price></item></catalog>")?;
//!
//! assert_eq!(render(aggregator.tree()), "item\n    name\n    price\n");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;

pub mod xml;
pub use xml::{Config, Event, Reader};

pub mod tree;
pub use tree::{TagNode, TagTree};

pub mod aggregate;
pub use aggregate::{enumerate_str, Aggregator};

pub mod render;
pub use render::{render, render_with_config, write_tree, RenderConfig};
