//! `qaml render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use qaml_config::{CliSettings, Config};
use qaml_renderer::render;
use qaml_syntax::Value;
use qaml_templates::load_dirs;

use super::parse_file;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markup file to render.
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template directory; repeat to layer, later wins (overrides config).
    #[arg(short = 't', long = "templates")]
    template_dirs: Vec<PathBuf>,

    /// Global value as KEY=VALUE; repeat for several.
    #[arg(short = 'g', long = "global", value_parser = parse_global)]
    globals: Vec<(String, Value)>,

    /// Maximum nesting depth (overrides config).
    #[arg(long, env = "QAML_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Path to configuration file (default: auto-discover qaml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, template loading or parsing fails,
    /// or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            template_dirs: (!self.template_dirs.is_empty()).then_some(self.template_dirs),
            max_depth: self.max_depth,
            globals: self.globals,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let templates = load_dirs(
            &config.templates_resolved.dirs,
            &config.templates_resolved.extension,
        )?;
        let tree = parse_file(&self.input, &config.parser.options())?;
        let html = render(&tree, &templates, Some(&config.globals));

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!(
                    "Rendered {} -> {}",
                    self.input.display(),
                    path.display()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        tracing::info!(
            input = %self.input.display(),
            templates = templates.len(),
            bytes = html.len(),
            "Render finished"
        );
        Ok(())
    }
}

/// Parse a `KEY=VALUE` global; the value is typed like a markup literal.
fn parse_global(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in `{raw}`"));
    }
    Ok((key.to_owned(), Value::from_literal(value)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_global() {
        assert_eq!(
            parse_global("YEAR=2026").unwrap(),
            ("YEAR".to_owned(), Value::Int(2026))
        );
        assert_eq!(
            parse_global("SITE=\"My Docs\"").unwrap(),
            ("SITE".to_owned(), Value::from("My Docs"))
        );
        assert_eq!(
            parse_global("EXPR=a=b").unwrap(),
            ("EXPR".to_owned(), Value::from("a=b"))
        );
        assert!(parse_global("NOVALUE").is_err());
        assert!(parse_global("=x").is_err());
    }

    #[test]
    fn test_execute_writes_output_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let modules = root.join("modules");
        fs::create_dir(&modules).unwrap();
        fs::write(
            modules.join("base.html"),
            "[ROOT]\n<title>$TITLE</title><body>$BODY</body>\n\n[P]\n<p>$BODY</p>\n",
        )
        .unwrap();
        fs::write(root.join("qaml.toml"), "[globals]\nTITLE = \"Fallback\"\n").unwrap();
        fs::write(root.join("page.qaml"), "P:\n  Hello & bye\n").unwrap();

        let args = RenderArgs {
            input: root.join("page.qaml"),
            output: Some(root.join("page.html")),
            template_dirs: Vec::new(),
            globals: Vec::new(),
            max_depth: None,
            config: Some(root.join("qaml.toml")),
            verbose: false,
        };
        args.execute().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("page.html")).unwrap(),
            "<title>Fallback</title><body><p>Hello &amp; bye</p></body>"
        );
    }

    #[test]
    fn test_execute_reports_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("modules")).unwrap();
        fs::write(root.join("qaml.toml"), "").unwrap();
        fs::write(root.join("bad.qaml"), "P:\n  two\n   three\n").unwrap();

        let args = RenderArgs {
            input: root.join("bad.qaml"),
            output: Some(root.join("bad.html")),
            template_dirs: Vec::new(),
            globals: Vec::new(),
            max_depth: None,
            config: Some(root.join("qaml.toml")),
            verbose: false,
        };
        let err = args.execute().unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().contains("bad.qaml"));
        assert!(!root.join("bad.html").exists());
    }
}
