//! A parsed template file.

use std::fs;
use std::path::Path;

use qaml_renderer::{TemplateRegistry, compile_all};

use crate::error::TemplateLoadError;
use crate::sections::split_sections;

/// Sections read from one template blob, with a label for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    origin: String,
    sections: Vec<(String, String)>,
}

impl TemplateSource {
    /// Split `blob` into sections. `origin` names the blob in log output.
    #[must_use]
    pub fn from_text(origin: impl Into<String>, blob: &str) -> Self {
        Self {
            origin: origin.into(),
            sections: split_sections(blob),
        }
    }

    /// Read and split a template file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateLoadError> {
        if !path.is_file() {
            return Err(TemplateLoadError::NotFound(path.to_path_buf()));
        }
        let blob = fs::read_to_string(path).map_err(|source| TemplateLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(path.display().to_string(), &blob))
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `(name, body)` pairs in file order.
    #[must_use]
    pub fn sections(&self) -> &[(String, String)] {
        &self.sections
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Compile every section. A repeated name keeps its last body.
    #[must_use]
    pub fn compile(&self) -> TemplateRegistry {
        let registry = compile_all(
            self.sections
                .iter()
                .map(|(name, body)| (name.as_str(), body.as_str())),
        );
        tracing::debug!(
            origin = %self.origin,
            templates = registry.len(),
            "Compiled template source"
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_text() {
        let source = TemplateSource::from_text("mem", "[A]\na\n[B]\nb\n");
        assert_eq!(source.origin(), "mem");
        assert_eq!(source.sections().len(), 2);
        assert!(!source.is_empty());
    }

    #[test]
    fn test_compile_later_duplicate_wins() {
        let registry = TemplateSource::from_text("mem", "[A]\none\n[A]\n$BODY!\n").compile();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("A").unwrap().segments().len(), 2);
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("base.html");
        fs::write(&path, "[P]\n<p>$BODY</p>\n").unwrap();

        let source = TemplateSource::from_file(&path).unwrap();
        assert_eq!(
            source.sections(),
            &[("P".to_owned(), "<p>$BODY</p>".to_owned())]
        );
        assert!(source.origin().ends_with("base.html"));
    }

    #[test]
    fn test_from_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.html");

        let err = TemplateSource::from_file(&path).unwrap_err();
        assert!(matches!(err, TemplateLoadError::NotFound(p) if p == path));
    }
}
