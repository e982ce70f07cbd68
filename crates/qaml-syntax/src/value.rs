//! Typed attribute values.

use std::fmt;

/// Attribute or global value.
///
/// Literal values written in markup are typed by their shape, see
/// [`Value::from_literal`]. The [`Display`](fmt::Display) form is what gets
/// substituted into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    /// `true` / `false` (case-insensitive in markup).
    Bool(bool),
    /// Decimal digits only.
    Int(i64),
    /// Anything else.
    Str(String),
}

impl Value {
    /// Coerce a literal into a typed value.
    ///
    /// Enclosing double quotes are stripped first. What remains becomes an
    /// integer if it is made of decimal digits only (and fits `i64`), a boolean
    /// if it is `true` or `false` in any case, and a string otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use qaml_syntax::Value;
    ///
    /// assert_eq!(Value::from_literal("\"123\""), Value::Int(123));
    /// assert_eq!(Value::from_literal("TRUE"), Value::Bool(true));
    /// assert_eq!(Value::from_literal("\"a b\""), Value::Str("a b".to_owned()));
    /// ```
    #[must_use]
    pub fn from_literal(raw: &str) -> Self {
        let text = strip_quotes(raw);

        if !text.is_empty()
            && text.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = text.parse::<i64>()
        {
            return Self::Int(n);
        }
        if text.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        Self::Str(text.to_owned())
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
