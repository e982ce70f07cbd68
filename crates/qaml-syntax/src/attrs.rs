//! Attribute assignment grammar.
//!
//! Shared by block headers, property lines and inline tags:
//! `.key="value"` overwrites, `.key+="value"` appends (for `class`).

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Attributes;
use crate::value::Value;

/// Node names: upper-case letters, digits, `_`, `:` and `-`.
pub(crate) const NAME: &str = r"[A-Z0-9_:\-]+";

/// One `.key="value"` / `.key+="value"` assignment.
pub(crate) const ASSIGNMENT: &str = r#"\.([A-Za-z_][A-Za-z0-9_:\-]*)\s*(\+?=)\s*"([^"]*)""#;

static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ASSIGNMENT).expect("valid assignment pattern"));

/// Assignment operator of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `+=`
    Append,
}

impl AssignOp {
    pub(crate) fn from_token(token: &str) -> Self {
        if token == "+=" { Self::Append } else { Self::Set }
    }
}

/// Apply every assignment found in `text` to `attrs`, left to right.
pub(crate) fn apply_assignments(attrs: &mut Attributes, text: &str) {
    for caps in ASSIGNMENT_RE.captures_iter(text) {
        attrs.assign(
            &caps[1],
            AssignOp::from_token(&caps[2]),
            Value::from_literal(&caps[3]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_multiple() {
        let mut attrs = Attributes::new();
        apply_assignments(&mut attrs, r#" .src="a.png" .width="100" .lazy="true""#);

        assert_eq!(attrs.get("src"), Some(&Value::from("a.png")));
        assert_eq!(attrs.get("width"), Some(&Value::Int(100)));
        assert_eq!(attrs.get("lazy"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_apply_append_in_one_line() {
        let mut attrs = Attributes::new();
        apply_assignments(&mut attrs, r#".class="a" .class+="b""#);
        assert_eq!(attrs.get("class"), Some(&Value::from("a b")));
    }

    #[test]
    fn test_dashed_keys() {
        let mut attrs = Attributes::new();
        apply_assignments(&mut attrs, r#".data-id="7" .aria-label="Close""#);
        assert_eq!(attrs.get("data-id"), Some(&Value::Int(7)));
        assert_eq!(attrs.get("aria-label"), Some(&Value::from("Close")));
    }

    #[test]
    fn test_op_from_token() {
        assert_eq!(AssignOp::from_token("="), AssignOp::Set);
        assert_eq!(AssignOp::from_token("+="), AssignOp::Append);
    }
}
