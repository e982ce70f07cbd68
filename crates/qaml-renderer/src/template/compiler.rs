//! Template compilation.
//!
//! Scans template text left to right for `$DIRECTIVE` / `$DIRECTIVE(args)`
//! and `$$GLOBAL` tokens. Text between tokens is kept verbatim.

use std::sync::LazyLock;

use regex::Regex;

use super::{DefineRules, Exposure, Segment, Template};

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\$(?P<global>[A-Z_][A-Z0-9_]*)|\$(?P<name>[A-Z_][A-Z0-9_]*)(?:\((?P<args>[^)]*)\))?",
    )
    .expect("valid directive pattern")
});

/// The `key="default"` token that follows `$EXPOSE` / `$EXPOSE_AS(...)`.
static EXPOSED_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?P<key>[A-Za-z_:][A-Za-z0-9_:\-]*)="(?P<default>[^"]*)""#)
        .expect("valid exposed attribute pattern")
});

/// Compile raw template text for node `name`.
///
/// Never fails: directives with missing arguments are dropped.
///
/// # Example
///
/// ```
/// use qaml_renderer::{Segment, compile};
///
/// let template = compile("LINK", r#"<a $EXPOSE_AS(to) href="">$BODY</a>"#);
/// assert_eq!(template.exposure("to").unwrap().original, "href");
/// assert_eq!(template.segments()[1], Segment::ExposeAs("to".to_owned()));
/// ```
pub fn compile(name: &str, text: &str) -> Template {
    let mut template = Template {
        name: name.to_owned(),
        segments: Vec::new(),
        exposed: Vec::new(),
        defines: DefineRules::new(),
    };
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(caps) = DIRECTIVE_RE.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        literal.push_str(&text[pos..whole.start()]);
        pos = whole.end();

        if let Some(global) = caps.name("global") {
            push_segment(&mut template, &mut literal, Segment::Global(global.as_str().to_owned()));
            continue;
        }

        let directive = caps.name("name").map_or("", |m| m.as_str());
        let args = caps.name("args").map(|m| split_args(m.as_str())).unwrap_or_default();

        match directive {
            "EXPOSE" => {
                if let Some((exposure, consumed)) = exposed_attr(&text[pos..], None) {
                    pos += consumed;
                    let segment = Segment::Expose(exposure.alias.clone());
                    template.expose(exposure);
                    push_segment(&mut template, &mut literal, segment);
                }
            }
            "EXPOSE_AS" => {
                let alias = args.first().filter(|a| !a.is_empty()).cloned();
                if let Some(alias) = alias
                    && let Some((exposure, consumed)) = exposed_attr(&text[pos..], Some(alias))
                {
                    pos += consumed;
                    let segment = Segment::ExposeAs(exposure.alias.clone());
                    template.expose(exposure);
                    push_segment(&mut template, &mut literal, segment);
                }
            }
            "DEFINE" => {
                if let [pattern, replacement, ..] = args.as_slice() {
                    template.defines.add(pattern.as_str(), replacement.as_str());
                }
            }
            "EXPOSE_ALL" => push_segment(&mut template, &mut literal, Segment::ExposeAll),
            _ => {
                let slot = Segment::Slot {
                    name: directive.to_owned(),
                    default: args.into_iter().next(),
                };
                push_segment(&mut template, &mut literal, slot);
            }
        }
    }

    literal.push_str(&text[pos..]);
    if !literal.is_empty() {
        template.segments.push(Segment::Literal(literal));
    }

    tracing::trace!(
        template = name,
        segments = template.segments.len(),
        exposed = template.exposed.len(),
        defines = template.defines.len(),
        "Compiled template"
    );
    template
}

/// Flush pending literal text, then append `segment`.
fn push_segment(template: &mut Template, literal: &mut String, segment: Segment) {
    if !literal.is_empty() {
        template
            .segments
            .push(Segment::Literal(std::mem::take(literal)));
    }
    template.segments.push(segment);
}

/// Split a directive argument list on commas, trimming whitespace and quotes.
///
/// An empty list (`()`) yields no arguments.
fn split_args(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|arg| arg.trim().trim_matches('"').to_owned())
        .collect()
}

/// Read the `key="default"` token at the start of `rest`.
///
/// Returns the exposure (aliased to `key` unless `alias` is given) and the
/// number of bytes consumed.
fn exposed_attr(rest: &str, alias: Option<String>) -> Option<(Exposure, usize)> {
    let caps = EXPOSED_ATTR_RE.captures(rest)?;
    let key = caps["key"].to_owned();
    let consumed = caps.get(0)?.end();
    Some((
        Exposure {
            alias: alias.unwrap_or_else(|| key.clone()),
            original: key,
            default: caps["default"].to_owned(),
        },
        consumed,
    ))
}
