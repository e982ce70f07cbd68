//! QAML markup parsing.
//!
//! QAML is an indentation-structured, tag-oriented markup. A document is a
//! tree of named blocks carrying attributes and ordered content:
//!
//! ```text
//! ROOT:
//!   .title="Welcome"
//!   SECTION: .class="intro"
//!     Some text with an [EM]inline[/EM] tag.
//! ```
//!
//! [`parse`] turns such text into a [`Node`] tree rooted at a synthetic
//! [`DOCUMENT_ROOT`] node. Nesting is driven purely by indentation, inline
//! tags are matched line by line.
//!
//! # Example
//!
//! ```
//! use qaml_syntax::{Child, Value, parse};
//!
//! let root = parse("NOTE: .level=\"2\"\n  Hello [B]world[/B]\n").unwrap();
//! let Child::Node(note) = &root.children[0] else { panic!("expected a block") };
//! assert_eq!(note.name, "NOTE");
//! assert_eq!(note.attributes.get("level"), Some(&Value::Int(2)));
//! ```

mod attrs;
mod error;
mod inline;
mod node;
mod parser;
mod value;

pub use attrs::AssignOp;
pub use error::ParseError;
pub use node::{Attributes, Child, DOCUMENT_ROOT, Node};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, ParseOptions, parse, parse_with};
pub use value::Value;
