//! Page title resolution for `$TITLE`.

use qaml_syntax::Value;

use super::{Block, Globals, ROOT};

const TITLE_BLOCK: &str = "TITLE";
const TITLE_ATTRIBUTE: &str = "title";
const TITLE_GLOBAL: &str = "TITLE";

/// Resolve the unescaped title for `block`.
///
/// Precedence: the `title` attribute of a `ROOT` block, then the text of the
/// first `TITLE` block below it, then the `TITLE` global.
pub(super) fn resolve_title(block: Block<'_>, globals: Option<&Globals>) -> Option<String> {
    if block.name == ROOT
        && let Some(title) = block.node.attributes.get(TITLE_ATTRIBUTE)
    {
        return Some(title.to_string());
    }

    if let Some(node) = block.node.find_first(TITLE_BLOCK) {
        return Some(node.text_content().trim().to_owned());
    }

    globals
        .and_then(|globals| globals.get(TITLE_GLOBAL))
        .map(Value::to_string)
}
