//! Post-render literal rewrite rules (`$DEFINE`).

/// Ordered literal find/replace rules.
///
/// Applied to a node's fully assembled output after every slot has been
/// substituted, in the order the rules were declared. Later rules see the
/// output of earlier ones.
///
/// # Example
///
/// ```
/// use qaml_renderer::DefineRules;
///
/// let mut rules = DefineRules::new();
/// rules.add(":)", "&#x263A;");
/// rules.add("(c)", "&copy;");
///
/// let mut html = "Thanks :) (c) 2026".to_owned();
/// rules.apply(&mut html);
/// assert_eq!(html, "Thanks &#x263A; &copy; 2026");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineRules {
    items: Vec<(String, String)>,
}

impl DefineRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule: all occurrences of `pattern` become `replacement`.
    ///
    /// Empty patterns are ignored.
    pub fn add(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return;
        }
        self.items.push((pattern, replacement.into()));
    }

    /// Apply all rules in registration order.
    pub fn apply(&self, html: &mut String) {
        for (pattern, replacement) in &self.items {
            if html.contains(pattern.as_str()) {
                *html = html.replace(pattern.as_str(), replacement);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
