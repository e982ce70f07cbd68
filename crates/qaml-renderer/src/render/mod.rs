//! Tree rendering.
//!
//! Children are rendered first (text escaped, nodes dispatched recursively)
//! to form a node's body; the node's template is then resolved through the
//! substitution [`pipeline`]. Rendering never fails: missing templates,
//! attributes and values degrade to fallbacks or empty strings.

mod exposed;
mod pipeline;
mod title;

use std::collections::HashMap;

use qaml_syntax::{Child, Node, Value};

use crate::escape::escape_html;
use crate::registry::TemplateRegistry;
use pipeline::Pipeline;

/// External values for `$$NAME` references and the title fallback.
pub type Globals = HashMap<String, Value>;

/// Deepest node nesting the renderer descends into.
///
/// Equal to the parser's ceiling, so every tree [`qaml_syntax::parse_with`]
/// accepts renders in full.
pub const MAX_RENDER_DEPTH: usize = qaml_syntax::MAX_DEPTH_LIMIT;

/// Name of the page-level block.
pub(crate) const ROOT: &str = "ROOT";

/// A node as seen by the renderer, possibly under a different name.
///
/// The synthetic `ROOT` wrapper borrows the document root's children and
/// attributes instead of copying them.
#[derive(Clone, Copy)]
pub(crate) struct Block<'n> {
    pub name: &'n str,
    pub node: &'n Node,
}

impl<'n> From<&'n Node> for Block<'n> {
    fn from(node: &'n Node) -> Self {
        Self {
            name: &node.name,
            node,
        }
    }
}

/// Render a parsed tree to HTML.
///
/// If the document has an explicit top-level `ROOT` block, or no `ROOT`
/// template is registered, the top-level items are rendered in order and
/// concatenated. Otherwise they are wrapped in a synthetic `ROOT` block so the
/// page template still applies.
///
/// # Example
///
/// ```
/// use qaml_renderer::{Globals, compile_all, render};
/// use qaml_syntax::{Value, parse};
///
/// let templates = compile_all([
///     ("ROOT", "<title>$TITLE</title><main>$BODY</main>"),
///     ("P", "<p>$BODY</p>"),
/// ]);
/// let globals = Globals::from([("TITLE".to_owned(), Value::from("Docs"))]);
///
/// let tree = parse("P:\n  one\n").unwrap();
/// let html = render(&tree, &templates, Some(&globals));
/// assert_eq!(html, "<title>Docs</title><main><p>one</p></main>");
/// ```
pub fn render(root: &Node, templates: &TemplateRegistry, globals: Option<&Globals>) -> String {
    let renderer = Renderer { templates, globals };

    let explicit_root = root.child_nodes().any(|node| node.name == ROOT);
    if explicit_root || !templates.contains(ROOT) {
        renderer.render_children(&root.children, 0)
    } else {
        renderer.render_block(Block { name: ROOT, node: root }, 0)
    }
}

struct Renderer<'a> {
    templates: &'a TemplateRegistry,
    globals: Option<&'a Globals>,
}

impl Renderer<'_> {
    fn render_block(&self, block: Block<'_>, depth: usize) -> String {
        if depth > MAX_RENDER_DEPTH {
            tracing::warn!(
                block = block.name,
                limit = MAX_RENDER_DEPTH,
                "Nesting too deep, subtree skipped"
            );
            return String::new();
        }

        let body = self.render_body(&block.node.children, depth);

        let Some(template) = self.templates.get(block.name) else {
            tracing::debug!(block = block.name, "No template, using fallback wrapper");
            return fallback(block.name, &body);
        };

        let mut html = Pipeline::new(template, block, self.globals, &body).run();
        template.defines().apply(&mut html);
        html
    }

    /// Rendered children of a block, without the final line terminator.
    fn render_body(&self, children: &[Child], depth: usize) -> String {
        let mut body = self.render_children(children, depth);
        if body.ends_with('\n') {
            body.pop();
        }
        body
    }

    fn render_children(&self, children: &[Child], depth: usize) -> String {
        let mut out = String::new();
        for child in children {
            match child {
                Child::Text(text) => out.push_str(&escape_html(text)),
                Child::Node(node) => out.push_str(&self.render_block(node.into(), depth + 1)),
            }
        }
        out
    }
}

/// Output for a block whose name has no template.
fn fallback(name: &str, body: &str) -> String {
    format!(r#"<div data-qaml-missing="{}">{body}</div>"#, escape_html(name))
}
