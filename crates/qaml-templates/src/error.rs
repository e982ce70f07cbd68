//! Template loading errors.

use std::path::PathBuf;

/// Error raised while reading template files.
#[derive(Debug, thiserror::Error)]
pub enum TemplateLoadError {
    /// Directory or file does not exist.
    #[error("Template path not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Reading a template file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The directory path could not be turned into a file pattern.
    #[error("Invalid template file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
