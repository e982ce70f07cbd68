//! Line-oriented block parser.
//!
//! Each non-blank, non-comment line is one of:
//!
//! - **Block header** `NAME:` with optional assignments, opening a child node
//!   one indentation level deeper.
//! - **Property line** `.key="value"` or `.key+="value"`, assigning to the
//!   current node.
//! - **Text line**, parsed with the inline tag grammar.
//!
//! Nesting is tracked on an explicit stack of open blocks. A block is attached
//! to its parent when it is closed by a dedent (or at end of input), which
//! keeps children in document order.

use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{ASSIGNMENT, AssignOp, NAME, apply_assignments};
use crate::error::ParseError;
use crate::inline::{InlineContext, parse_inline};
use crate::node::{Child, DOCUMENT_ROOT, Node};
use crate::value::Value;

/// Default nesting ceiling (block depth plus inline depth).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling for [`ParseOptions::max_depth`]; larger settings are clamped.
///
/// Every tree the parser accepts can be rendered in full.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Indentation unit assumed when no line is indented.
const DEFAULT_INDENT_UNIT: usize = 2;

const COMMENT_MARKER: char = '#';

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^(?P<name>{NAME}):(?P<attrs>(?:\s+{ASSIGNMENT})*)\s*$");
    Regex::new(&pattern).expect("valid header pattern")
});

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\.(?P<key>[A-Za-z_][A-Za-z0-9_:\-]*)\s*(?P<op>\+?=)\s*"(?P<value>[^"]*)"$"#)
        .expect("valid property pattern")
});

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum nesting depth of any node below the document root, capped at
    /// [`MAX_DEPTH_LIMIT`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// An open block on the nesting stack.
struct Frame {
    /// Indentation level of this block's content.
    level: usize,
    node: Node,
}

/// Parse markup with default options.
///
/// Returns the synthetic [`DOCUMENT_ROOT`] node with the whole tree attached.
///
/// # Example
///
/// ```
/// use qaml_syntax::{Child, parse};
///
/// let root = parse("A:\n  [B]x[/B]\n").unwrap();
/// let Child::Node(a) = &root.children[0] else { unreachable!() };
/// assert_eq!(a.name, "A");
/// assert_eq!(a.child_nodes().next().unwrap().name, "B");
/// ```
pub fn parse(text: &str) -> Result<Node, ParseError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse markup with explicit options.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let max_depth = options.max_depth.min(MAX_DEPTH_LIMIT);
    let unit = detect_indent_unit(text);
    let mut root = Node::new(DOCUMENT_ROOT);
    let mut open: Vec<Frame> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }

        let width = indent_width(raw);
        if width % unit != 0 {
            return Err(ParseError::BadIndent {
                line,
                content: trimmed.to_owned(),
                width,
                unit,
            });
        }
        let level = width / unit;

        // The document root sits at level 0, so a dedent can never close it.
        while open.last().is_some_and(|frame| frame.level > level) {
            close_block(&mut open, &mut root);
        }
        let current_level = open.last().map_or(0, |frame| frame.level);

        if let Some(caps) = HEADER_RE.captures(trimmed) {
            if open.len() + 1 > max_depth {
                return Err(ParseError::TooDeep {
                    line,
                    limit: max_depth,
                });
            }
            let mut node = Node::new(&caps["name"]);
            apply_assignments(&mut node.attributes, &caps["attrs"]);
            open.push(Frame {
                level: level + 1,
                node,
            });
        } else if let Some(caps) = PROPERTY_RE.captures(trimmed) {
            innermost(&mut open, &mut root).attributes.assign(
                &caps["key"],
                AssignOp::from_token(&caps["op"]),
                Value::from_literal(&caps["value"]),
            );
        } else {
            // Leading whitespace is ASCII, so the byte offset is a char boundary.
            let prefix = (current_level * unit).min(width);
            let mut content = raw[prefix..].to_owned();
            content.push('\n');

            let ctx = InlineContext {
                line,
                base_depth: open.len(),
                max_depth,
            };
            let items = parse_inline(&content, ctx)?;
            innermost(&mut open, &mut root).children.extend(items);
        }
    }

    while !open.is_empty() {
        close_block(&mut open, &mut root);
    }

    tracing::trace!(children = root.children.len(), "Parsed document");
    Ok(root)
}

/// The node that receives content: the innermost open block, else the root.
fn innermost<'a>(open: &'a mut [Frame], root: &'a mut Node) -> &'a mut Node {
    match open.last_mut() {
        Some(frame) => &mut frame.node,
        None => root,
    }
}

/// Pop the innermost block and attach it to its parent.
fn close_block(open: &mut Vec<Frame>, root: &mut Node) {
    if let Some(frame) = open.pop() {
        innermost(open, root).children.push(Child::Node(frame.node));
    }
}

/// Leading indentation width in columns (spaces and tabs count as one).
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Width of the first indented non-blank line, or the default unit.
fn detect_indent_unit(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(indent_width)
        .find(|&width| width > 0)
        .unwrap_or(DEFAULT_INDENT_UNIT)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn block(root: &Node, index: usize) -> &Node {
        match &root.children[index] {
            Child::Node(node) => node,
            Child::Text(text) => panic!("expected node, found text {text:?}"),
        }
    }

    #[test]
    fn test_empty_document() {
        let root = parse("").unwrap();
        assert_eq!(root.name, DOCUMENT_ROOT);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_nested_blocks() {
        let source = "ROOT:\n  SECTION:\n    text\n  AFTER:\n";
        let root = parse(source).unwrap();

        let top = block(&root, 0);
        assert_eq!(top.name, "ROOT");
        let names: Vec<_> = top.child_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["SECTION", "AFTER"]);
        assert_eq!(block(top, 0).children, vec![Child::from("text\n")]);
    }

    #[test]
    fn test_end_to_end_tree() {
        let source = "ROOT:\n  .title=\"Hi\"\n  TITLE:\n    Hello\n";
        let root = parse(source).unwrap();

        let top = block(&root, 0);
        assert_eq!(top.attributes.get("title"), Some(&Value::from("Hi")));
        let title = block(top, 0);
        assert_eq!(title.name, "TITLE");
        assert_eq!(title.children, vec![Child::from("Hello\n")]);
    }

    #[test]
    fn test_property_typing() {
        let source = concat!(
            "A:\n",
            "  .n=\"123\"\n",
            "  .yes=\"true\"\n",
            "  .no = \"FALSE\"\n",
            "  .s=\"some text\"\n",
        );
        let root = parse(source).unwrap();
        let a = block(&root, 0);

        assert_eq!(a.attributes.get("n"), Some(&Value::Int(123)));
        assert_eq!(a.attributes.get("yes"), Some(&Value::Bool(true)));
        assert_eq!(a.attributes.get("no"), Some(&Value::Bool(false)));
        assert_eq!(a.attributes.get("s"), Some(&Value::from("some text")));
    }

    #[test]
    fn test_class_append_on_property_lines() {
        let root = parse("A:\n  .class=\"a\"\n  .class+=\"b\"\n").unwrap();
        assert_eq!(
            block(&root, 0).attributes.get("class"),
            Some(&Value::from("a b"))
        );

        let root = parse("A:\n  .class+=\"b\"\n").unwrap();
        assert_eq!(
            block(&root, 0).attributes.get("class"),
            Some(&Value::from("b"))
        );
    }

    #[test]
    fn test_unquoted_property_is_text() {
        let root = parse("A:\n  .width = 10\n").unwrap();
        let a = block(&root, 0);
        assert!(a.attributes.is_empty());
        assert_eq!(a.children, vec![Child::from(".width = 10\n")]);
    }

    #[test]
    fn test_two_assignments_on_property_line_is_text() {
        let root = parse("A:\n  .class=\"a\" .id=\"b\"\n").unwrap();
        let a = block(&root, 0);
        assert!(a.attributes.is_empty());
        assert_eq!(a.children, vec![Child::from(".class=\"a\" .id=\"b\"\n")]);
    }

    #[test]
    fn test_header_with_inline_attributes() {
        let root = parse("IMG: .src=\"a.png\" .alt=\"A cat\"\n").unwrap();
        let img = block(&root, 0);
        assert_eq!(img.name, "IMG");
        assert_eq!(img.attributes.get("src"), Some(&Value::from("a.png")));
        assert_eq!(img.attributes.get("alt"), Some(&Value::from("A cat")));
    }

    #[test]
    fn test_colon_in_text_is_not_header() {
        let root = parse("NOTE: remember this\n").unwrap();
        assert_eq!(root.children, vec![Child::from("NOTE: remember this\n")]);
    }

    #[test]
    fn test_names_with_colon_and_hyphen() {
        let root = parse("NS:ITEM-2:\n").unwrap();
        assert_eq!(block(&root, 0).name, "NS:ITEM-2");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let root = parse("# heading comment\n\nA:\n   \n  # inner\n  x\n").unwrap();
        let a = block(&root, 0);
        assert_eq!(a.children, vec![Child::from("x\n")]);
    }

    #[test]
    fn test_text_keeps_inner_indentation() {
        let root = parse("A:\n  first\n      deeper\n").unwrap();
        assert_eq!(
            block(&root, 0).children,
            vec![Child::from("first\n"), Child::from("    deeper\n")]
        );
    }

    #[test]
    fn test_indent_unit_from_first_indented_line() {
        let root = parse("A:\n    B:\n        x\n").unwrap();
        let b = block(block(&root, 0), 0);
        assert_eq!(b.children, vec![Child::from("x\n")]);
    }

    #[test]
    fn test_bad_indent_not_multiple() {
        let err = parse("A:\n  B:\n   x\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::BadIndent {
                line: 3,
                content: "x".to_owned(),
                width: 3,
                unit: 2,
            }
        );
    }

    #[test]
    fn test_dedent_attaches_to_right_parent() {
        let source = "A:\n  B:\n    C:\n      c\n  b2\nTOP\n";
        let root = parse(source).unwrap();

        let a = block(&root, 0);
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[1], Child::from("b2\n"));
        assert_eq!(root.children[1], Child::from("TOP\n"));
    }

    #[test]
    fn test_dedent_to_column_zero_keeps_document_root() {
        let root = parse("A:\n  B:\n    C:\n      c\n.title=\"T\"\nD:\n").unwrap();

        assert_eq!(root.name, DOCUMENT_ROOT);
        assert_eq!(root.attributes.get("title"), Some(&Value::from("T")));
        let names: Vec<_> = root.child_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "D"]);
    }

    #[test]
    fn test_property_after_dedent_goes_to_parent() {
        let root = parse("A:\n  B:\n  .id=\"x\"\n").unwrap();
        let a = block(&root, 0);
        assert_eq!(a.attributes.get("id"), Some(&Value::from("x")));
        assert!(block(a, 0).attributes.is_empty());
    }

    #[test]
    fn test_inline_errors_carry_line() {
        let err = parse("A:\n  [B]x[/C]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MismatchedTag {
                line: 2,
                expected: Some("B".to_owned()),
                found: "C".to_owned(),
            }
        );

        let err = parse("[B]x\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedTag { line: 1, .. }));
    }

    #[test]
    fn test_inline_tag_line() {
        let root = parse("[A]x[/A]").unwrap();
        assert_eq!(
            root.children,
            vec![
                Child::Node(Node::new("A").with_child("x")),
                Child::from("\n"),
            ]
        );
    }

    #[test]
    fn test_block_depth_limit() {
        let options = ParseOptions { max_depth: 2 };
        assert!(parse_with("A:\n  B:\n", &options).is_ok());
        assert_eq!(
            parse_with("A:\n  B:\n    C:\n", &options).unwrap_err(),
            ParseError::TooDeep { line: 3, limit: 2 }
        );
    }

    #[test]
    fn test_inline_depth_counts_block_depth() {
        let options = ParseOptions { max_depth: 2 };
        assert!(parse_with("A:\n  [B]x[/B]\n", &options).is_ok());
        assert!(matches!(
            parse_with("A:\n  [B][C]x[/C][/B]\n", &options),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_deeply_nested_input_fails_cleanly() {
        let mut source = String::new();
        for depth in 0..200 {
            source.push_str(&"  ".repeat(depth));
            source.push_str("B:\n");
        }
        assert!(matches!(parse(&source), Err(ParseError::TooDeep { .. })));
    }

    fn nested_blocks(depth: usize) -> String {
        let mut source = String::new();
        for level in 0..depth {
            source.push_str(&"  ".repeat(level));
            source.push_str("N:\n");
        }
        source.push_str(&"  ".repeat(depth));
        source.push_str("leaf\n");
        source
    }

    #[test]
    fn test_max_depth_is_clamped_to_limit() {
        let options = ParseOptions { max_depth: 1024 };

        assert!(parse_with(&nested_blocks(MAX_DEPTH_LIMIT), &options).is_ok());
        assert_eq!(
            parse_with(&nested_blocks(MAX_DEPTH_LIMIT + 1), &options),
            Err(ParseError::TooDeep {
                line: MAX_DEPTH_LIMIT + 1,
                limit: MAX_DEPTH_LIMIT,
            })
        );
    }

    #[test]
    fn test_detect_indent_unit() {
        assert_eq!(detect_indent_unit("A:\nB:\n"), 2);
        assert_eq!(detect_indent_unit("A:\n\n   x\n"), 3);
        assert_eq!(detect_indent_unit("A:\n\tx\n"), 1);
    }
}
