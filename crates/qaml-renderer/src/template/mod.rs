//! Compiled templates.
//!
//! A [`Template`] is the substitution plan for every node sharing one name.
//! Directive recognition happens once in [`compile`]; values are resolved per
//! node at render time.

mod compiler;
mod defines;

pub use compiler::compile;
pub use defines::DefineRules;

/// One piece of a compiled template, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim template text.
    Literal(String),
    /// `$NAME` or `$NAME(default)`. `BODY` and `TITLE` are resolved specially.
    Slot {
        name: String,
        default: Option<String>,
    },
    /// `$$NAME`.
    Global(String),
    /// `$EXPOSE_ALL`.
    ExposeAll,
    /// `$EXPOSE key="..."`, by alias (equal to the key).
    Expose(String),
    /// `$EXPOSE_AS(alias) key="..."`, by alias.
    ExposeAs(String),
}

/// Declared mapping from a markup attribute to an HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    /// Attribute name authors write in markup.
    pub alias: String,
    /// Attribute name emitted in HTML.
    pub original: String,
    /// Default declared in the template (`key="default"`).
    pub default: String,
}

/// Compiled form of one named template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    exposed: Vec<Exposure>,
    defines: DefineRules,
}

impl Template {
    /// Node name this template renders.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Exposures in declaration order.
    #[must_use]
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposed
    }

    /// Look up an exposure by its markup-facing alias.
    #[must_use]
    pub fn exposure(&self, alias: &str) -> Option<&Exposure> {
        self.exposed.iter().find(|e| e.alias == alias)
    }

    #[must_use]
    pub fn defines(&self) -> &DefineRules {
        &self.defines
    }

    /// Register an exposure; a repeated alias replaces the earlier entry.
    fn expose(&mut self, exposure: Exposure) {
        match self.exposed.iter_mut().find(|e| e.alias == exposure.alias) {
            Some(existing) => *existing = exposure,
            None => self.exposed.push(exposure),
        }
    }
}
