//! Template-driven HTML rendering of QAML node trees.
//!
//! Every node name maps to a [`Template`]: literal HTML interleaved with
//! `$DIRECTIVES`. Templates are compiled once with [`compile`] (or
//! [`compile_all`]) into a [`TemplateRegistry`], then [`render`] walks a
//! parsed tree and substitutes each node into the template for its name.
//!
//! # Directives
//!
//! - `$BODY` - the node's rendered children
//! - `$TITLE` - page title (`ROOT` title attribute, first `TITLE` block, or global)
//! - `$NAME` / `$NAME(default)` - attribute, global, or default value
//! - `$$NAME` - global value, HTML-escaped
//! - `$EXPOSE key=""` - emit `key="..."` when the node has attribute `key`
//! - `$EXPOSE_AS(alias) key=""` - same, reading attribute `alias`
//! - `$EXPOSE_ALL` - every safe attribute (`id`, `class`, `data-*`, ...)
//! - `$DEFINE(pattern, replacement)` - literal rewrite of the final output
//!
//! # Example
//!
//! ```
//! use qaml_renderer::{compile_all, render};
//!
//! let templates = compile_all([
//!     ("NOTE", r#"<aside $EXPOSE class="">$BODY</aside>"#),
//! ]);
//! let tree = qaml_syntax::parse("NOTE: .class=\"warn\"\n  Mind the <gap>\n").unwrap();
//!
//! let html = render(&tree, &templates, None);
//! assert_eq!(html, r#"<aside class="warn">Mind the &lt;gap&gt;</aside>"#);
//! ```

mod escape;
mod registry;
mod render;
mod template;

pub use escape::escape_html;
pub use registry::{TemplateRegistry, compile_all};
pub use render::{Globals, MAX_RENDER_DEPTH, render};
pub use template::{DefineRules, Exposure, Segment, Template, compile};
