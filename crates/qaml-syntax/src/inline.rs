//! Inline tag grammar.
//!
//! Parses `[NAME .key="value"]content[/NAME]` inside a text line. Tags may
//! nest; they must close on the same line, innermost first.

use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{ASSIGNMENT, NAME, apply_assignments};
use crate::error::ParseError;
use crate::node::{Child, Node};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\[/(?P<close>{NAME})\]|\[(?P<open>{NAME})(?P<attrs>(?:\s+{ASSIGNMENT})*)\s*\]"
    );
    Regex::new(&pattern).expect("valid inline tag pattern")
});

/// Where an inline run sits in the tree, for diagnostics and depth checks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InlineContext {
    /// 1-based source line.
    pub line: usize,
    /// Depth of the block that receives the parsed items.
    pub base_depth: usize,
    pub max_depth: usize,
}

/// Split `text` into literal text and inline tag nodes.
///
/// Open tags are kept on an explicit stack; text and closed tags are appended
/// to the innermost open tag, or to the returned list when none is open.
pub(crate) fn parse_inline(text: &str, ctx: InlineContext) -> Result<Vec<Child>, ParseError> {
    let mut output = Vec::new();
    let mut open: Vec<Node> = Vec::new();
    let mut pos = 0;

    for caps in TAG_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(target(&mut open, &mut output), &text[pos..whole.start()]);
        pos = whole.end();

        if let Some(name) = caps.name("open") {
            if ctx.base_depth + open.len() + 1 > ctx.max_depth {
                return Err(ParseError::TooDeep {
                    line: ctx.line,
                    limit: ctx.max_depth,
                });
            }
            let mut node = Node::new(name.as_str());
            if let Some(attrs) = caps.name("attrs") {
                apply_assignments(&mut node.attributes, attrs.as_str());
            }
            open.push(node);
        } else if let Some(name) = caps.name("close") {
            let found = name.as_str();
            match open.pop() {
                Some(node) if node.name == found => {
                    target(&mut open, &mut output).push(Child::Node(node));
                }
                other => {
                    return Err(ParseError::MismatchedTag {
                        line: ctx.line,
                        expected: other.map(|node| node.name),
                        found: found.to_owned(),
                    });
                }
            }
        }
    }

    push_text(target(&mut open, &mut output), &text[pos..]);

    if !open.is_empty() {
        return Err(ParseError::UnclosedTag {
            line: ctx.line,
            tags: open.into_iter().map(|node| node.name).collect(),
        });
    }

    Ok(output)
}

fn target<'a>(open: &'a mut [Node], output: &'a mut Vec<Child>) -> &'a mut Vec<Child> {
    match open.last_mut() {
        Some(node) => &mut node.children,
        None => output,
    }
}

fn push_text(children: &mut Vec<Child>, text: &str) {
    if !text.is_empty() {
        children.push(Child::Text(text.to_owned()));
    }
}
