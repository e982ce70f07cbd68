//! Fixed-order slot substitution.
//!
//! Each pass fills only the segments of its own kind, and every segment is
//! resolved from the node, never from text produced by another segment. A
//! value that happens to contain `$BODY` therefore stays literal.

use std::borrow::Cow;

use qaml_syntax::Value;

use super::exposed::expose_all;
use super::title::resolve_title;
use super::{Block, Globals};
use crate::escape::escape_html;
use crate::template::{Segment, Template};

const BODY: &str = "BODY";
const TITLE: &str = "TITLE";

/// Substitution passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Globals,
    Body,
    ExposeAll,
    Title,
    Expose,
    ExposeAs,
    Variables,
}

const PASSES: [Pass; 7] = [
    Pass::Globals,
    Pass::Body,
    Pass::ExposeAll,
    Pass::Title,
    Pass::Expose,
    Pass::ExposeAs,
    Pass::Variables,
];

impl Pass {
    fn accepts(self, segment: &Segment) -> bool {
        match (self, segment) {
            (Self::Globals, Segment::Global(_))
            | (Self::ExposeAll, Segment::ExposeAll)
            | (Self::Expose, Segment::Expose(_))
            | (Self::ExposeAs, Segment::ExposeAs(_)) => true,
            (Self::Body, Segment::Slot { name, .. }) => name == BODY,
            (Self::Title, Segment::Slot { name, .. }) => name == TITLE,
            (Self::Variables, Segment::Slot { name, .. }) => name != BODY && name != TITLE,
            _ => false,
        }
    }
}

/// Substitution state for one node and its template.
pub(super) struct Pipeline<'a> {
    template: &'a Template,
    block: Block<'a>,
    globals: Option<&'a Globals>,
    body: &'a str,
}

impl<'a> Pipeline<'a> {
    pub(super) fn new(
        template: &'a Template,
        block: Block<'a>,
        globals: Option<&'a Globals>,
        body: &'a str,
    ) -> Self {
        Self {
            template,
            block,
            globals,
            body,
        }
    }

    /// Resolve every segment and concatenate in template order.
    pub(super) fn run(&self) -> String {
        let segments = self.template.segments();
        let mut resolved: Vec<Option<Cow<'a, str>>> = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Some(Cow::Borrowed(text.as_str())),
                _ => None,
            })
            .collect();
        let mut title: Option<String> = None;

        for pass in PASSES {
            for (slot, segment) in resolved.iter_mut().zip(segments) {
                if slot.is_some() || !pass.accepts(segment) {
                    continue;
                }
                let value = match (pass, segment) {
                    (Pass::Globals, Segment::Global(name)) => self.global(name),
                    (Pass::Body, _) => Cow::Borrowed(self.body),
                    (Pass::ExposeAll, _) => Cow::Owned(expose_all(self.block.node)),
                    (Pass::Title, _) => Cow::Owned(
                        title
                            .get_or_insert_with(|| self.title())
                            .clone(),
                    ),
                    (Pass::Expose, Segment::Expose(alias))
                    | (Pass::ExposeAs, Segment::ExposeAs(alias)) => self.exposed(alias),
                    (Pass::Variables, Segment::Slot { name, default }) => {
                        self.variable(name, default.as_deref())
                    }
                    _ => Cow::Borrowed(""),
                };
                *slot = Some(value);
            }
        }

        resolved.into_iter().flatten().collect()
    }

    /// `$$NAME`: escaped global, empty when absent.
    fn global(&self, name: &str) -> Cow<'a, str> {
        self.globals
            .and_then(|globals| globals.get(name))
            .map_or(Cow::Borrowed(""), |value| {
                Cow::Owned(escape_html(&value.to_string()))
            })
    }

    fn title(&self) -> String {
        resolve_title(self.block, self.globals)
            .map(|title| escape_html(&title))
            .unwrap_or_default()
    }

    /// `key="value"` for an exposed attribute present on the node.
    fn exposed(&self, alias: &str) -> Cow<'a, str> {
        let Some(exposure) = self.template.exposure(alias) else {
            return Cow::Borrowed("");
        };
        match self.block.node.attributes.get(alias) {
            Some(value) => Cow::Owned(format!(
                r#"{}="{}""#,
                exposure.original,
                escape_html(&value.to_string())
            )),
            None => Cow::Borrowed(""),
        }
    }

    /// Generic slot: exposure alias, own attribute, global, default, empty.
    ///
    /// Values are inserted as written, without escaping.
    fn variable(&self, name: &str, default: Option<&str>) -> Cow<'a, str> {
        let attributes = &self.block.node.attributes;

        let aliased = self
            .template
            .exposures()
            .iter()
            .filter(|exposure| exposure.original.to_uppercase() == name)
            .find_map(|exposure| attributes.get(&exposure.alias));

        let value: Option<&Value> = aliased
            .or_else(|| attributes.get(name))
            .or_else(|| self.globals.and_then(|globals| globals.get(name)));

        match (value, default) {
            (Some(value), _) => Cow::Owned(value.to_string()),
            (None, Some(default)) => Cow::Owned(default.to_owned()),
            (None, None) => Cow::Borrowed(""),
        }
    }
}
