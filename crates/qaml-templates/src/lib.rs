//! Template sources for the QAML renderer.
//!
//! Template files hold several templates, each introduced by a `[NAME]`
//! marker line:
//!
//! ```text
//! [ROOT]
//! <html><body>$BODY</body></html>
//!
//! [P]
//! <p>$BODY</p>
//! ```
//!
//! A directory of such files is loaded into a single
//! [`TemplateRegistry`](qaml_renderer::TemplateRegistry), later files
//! overriding earlier ones.
//!
//! # Example
//!
//! ```
//! use qaml_templates::TemplateSource;
//!
//! let source = TemplateSource::from_text("inline", "[P]\n<p>$BODY</p>\n");
//! let registry = source.compile();
//! assert!(registry.contains("P"));
//! ```

mod error;
mod loader;
mod sections;
mod source;

pub use error::TemplateLoadError;
pub use loader::{load_dir, load_dirs};
pub use sections::split_sections;
pub use source::TemplateSource;
