//! `$EXPOSE_ALL` attribute filtering.

use qaml_syntax::Node;

use crate::escape::escape_html;

/// Attribute names passed through by `$EXPOSE_ALL`, besides `data-*` / `aria-*`.
const SAFE_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "style",
    "title",
    "alt",
    "src",
    "href",
    "width",
    "height",
    "role",
    "type",
    "name",
    "value",
    "for",
    "placeholder",
    "rel",
    "target",
];

fn is_safe(key: &str) -> bool {
    let key = key.to_lowercase();
    SAFE_ATTRIBUTES.contains(&key.as_str()) || key.starts_with("data-") || key.starts_with("aria-")
}

/// Space-separated `key="value"` pairs for every safe attribute of `node`.
pub(super) fn expose_all(node: &Node) -> String {
    node.attributes
        .iter()
        .filter(|(key, _)| is_safe(key))
        .map(|(key, value)| format!(r#"{key}="{}""#, escape_html(&value.to_string())))
        .collect::<Vec<_>>()
        .join(" ")
}
