//! Splitting a template file into named sections.

use std::sync::LazyLock;

use regex::Regex;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<name>[A-Za-z0-9_:\-]+)\][ \t]*\r?\n?$").expect("valid marker pattern")
});

/// Split a blob into `(name, body)` pairs in file order.
///
/// Text before the first marker is ignored. Bodies keep their inner
/// formatting but lose trailing whitespace. A name may appear twice; callers
/// that build a registry let the later section win.
///
/// # Example
///
/// ```
/// use qaml_templates::split_sections;
///
/// let sections = split_sections("header\n[A]\na\n\n[B]\nb\n");
/// assert_eq!(
///     sections,
///     vec![("A".to_owned(), "a".to_owned()), ("B".to_owned(), "b".to_owned())]
/// );
/// ```
pub fn split_sections(blob: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in blob.split_inclusive('\n') {
        if let Some(caps) = MARKER_RE.captures(line) {
            if let Some(section) = current.take() {
                sections.push(finish(section));
            }
            current = Some((caps["name"].to_owned(), String::new()));
            continue;
        }
        if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
        }
    }

    if let Some(section) = current {
        sections.push(finish(section));
    }
    sections
}

fn finish((name, body): (String, String)) -> (String, String) {
    let trimmed = body.trim_end().to_owned();
    (name, trimmed)
}
