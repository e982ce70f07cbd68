//! Loading template directories.

use std::path::{Path, PathBuf};

use glob::Pattern;
use qaml_renderer::TemplateRegistry;

use crate::error::TemplateLoadError;
use crate::source::TemplateSource;

/// Load every `*.{extension}` file directly inside `dir`.
///
/// Files are read in sorted file-name order; a template defined in a later
/// file replaces one of the same name from an earlier file.
pub fn load_dir(dir: &Path, extension: &str) -> Result<TemplateRegistry, TemplateLoadError> {
    if !dir.is_dir() {
        return Err(TemplateLoadError::NotFound(dir.to_path_buf()));
    }

    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| TemplateLoadError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut registry = TemplateRegistry::new();
    for path in &files {
        let source = TemplateSource::from_file(path)?;
        if source.is_empty() {
            tracing::warn!(path = %path.display(), "Template file has no sections");
        }
        registry.extend(source.compile());
    }

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        templates = registry.len(),
        "Loaded templates"
    );
    Ok(registry)
}

/// Load several directories in order, later directories overriding earlier.
pub fn load_dirs<I, P>(dirs: I, extension: &str) -> Result<TemplateRegistry, TemplateLoadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let registries = dirs
        .into_iter()
        .map(|dir| load_dir(dir.as_ref(), extension))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TemplateRegistry::merge(registries))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn body_of(registry: &TemplateRegistry, name: &str) -> String {
        match registry.get(name).unwrap().segments() {
            [qaml_renderer::Segment::Literal(text)] => text.clone(),
            other => panic!("unexpected segments {other:?}"),
        }
    }

    #[test]
    fn test_load_dir_sorted_later_file_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("b.html"), "[X]\nfrom b\n").unwrap();
        fs::write(temp_dir.path().join("a.html"), "[X]\nfrom a\n[Y]\ny\n").unwrap();

        let registry = load_dir(temp_dir.path(), "html").unwrap();
        assert_eq!(registry.names(), vec!["X", "Y"]);
        assert_eq!(body_of(&registry, "X"), "from b");
    }

    #[test]
    fn test_load_dir_filters_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("a.html"), "[A]\na\n").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "[B]\nb\n").unwrap();
        fs::create_dir(temp_dir.path().join("nested.html")).unwrap();

        let registry = load_dir(temp_dir.path(), "html").unwrap();
        assert_eq!(registry.names(), vec!["A"]);
    }

    #[test]
    fn test_load_dir_not_recursive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("a.html"), "[A]\na\n").unwrap();

        let registry = load_dir(temp_dir.path(), "html").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_dir_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = load_dir(&missing, "html").unwrap_err();
        assert!(matches!(err, TemplateLoadError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_load_dir_with_glob_characters_in_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("themes [dark]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.html"), "[A]\na\n").unwrap();

        let registry = load_dir(&dir, "html").unwrap();
        assert_eq!(registry.names(), vec!["A"]);
    }

    #[test]
    fn test_load_dirs_later_dir_wins() {
        let base = tempfile::tempdir().unwrap();
        let theme = tempfile::tempdir().unwrap();
        fs::write(base.path().join("base.html"), "[X]\nbase\n[Y]\ny\n").unwrap();
        fs::write(theme.path().join("theme.html"), "[X]\ntheme\n").unwrap();

        let registry = load_dirs([base.path(), theme.path()], "html").unwrap();
        assert_eq!(body_of(&registry, "X"), "theme");
        assert_eq!(body_of(&registry, "Y"), "y");
    }

    #[test]
    fn test_load_dirs_fails_on_first_missing() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("missing");

        let result = load_dirs([base.path().to_path_buf(), missing], "html");
        assert!(matches!(result, Err(TemplateLoadError::NotFound(_))));
    }
}
