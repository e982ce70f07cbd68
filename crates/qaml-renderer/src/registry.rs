//! Name-to-template registry.

use std::collections::HashMap;

use crate::template::{Template, compile};

/// Compiled templates keyed by node name.
///
/// Built once, then shared read-only by any number of renders. When several
/// sources define the same name, the later source wins outright.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold registries in order; a later registry replaces earlier templates
    /// with the same name.
    ///
    /// # Example
    ///
    /// ```
    /// use qaml_renderer::{TemplateRegistry, compile_all};
    ///
    /// let base = compile_all([("X", "base"), ("Y", "y")]);
    /// let theme = compile_all([("X", "theme")]);
    ///
    /// let merged = TemplateRegistry::merge([base, theme]);
    /// assert_eq!(merged.len(), 2);
    /// ```
    #[must_use]
    pub fn merge(sources: impl IntoIterator<Item = Self>) -> Self {
        let mut merged = Self::new();
        for source in sources {
            merged.extend(source);
        }
        merged
    }

    /// Add every template of `other`, replacing same-named entries.
    pub fn extend(&mut self, other: Self) {
        for (name, template) in other.templates {
            if self.templates.contains_key(&name) {
                tracing::debug!(template = %name, "Template overridden");
            }
            self.templates.insert(name, template);
        }
    }

    /// Insert a template under its own name, returning any replaced one.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.name().to_owned(), template)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Compile `(name, text)` pairs into a registry.
///
/// Later pairs replace earlier ones with the same name.
pub fn compile_all<I, N, T>(sources: I) -> TemplateRegistry
where
    I: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: AsRef<str>,
{
    let mut registry = TemplateRegistry::new();
    for (name, text) in sources {
        registry.insert(compile(name.as_ref(), text.as_ref()));
    }
    registry
}
