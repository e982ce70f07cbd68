//! Configuration management for QAML.
//!
//! Parses `qaml.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Entries of `templates.dirs` support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use qaml_syntax::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, ParseOptions, Value};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config. Globals are merged on
/// top of the `[globals]` table.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Replace the template directories.
    pub template_dirs: Option<Vec<PathBuf>>,
    /// Override the parser nesting ceiling.
    pub max_depth: Option<usize>,
    /// Extra global values, later entries winning.
    pub globals: Vec<(String, Value)>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "qaml.toml";

const DEFAULT_TEMPLATE_DIR: &str = "modules";
const DEFAULT_EXTENSION: &str = "html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template configuration (paths are relative strings from TOML).
    templates: TemplatesConfigRaw,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Values for `$$NAME` template references.
    pub globals: HashMap<String, Value>,

    /// Resolved template configuration (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TemplatesConfigRaw {
    dirs: Option<Vec<String>>,
    extension: Option<String>,
}

/// Resolved template configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatesConfig {
    /// Template directories, absolute or relative to the working directory.
    /// Later directories override earlier ones.
    pub dirs: Vec<PathBuf>,
    /// File extension of template files, without the dot.
    pub extension: String,
}

/// Parser configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum block and inline nesting depth.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Options for [`qaml_syntax::parse_with`].
    #[must_use]
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`templates.dirs`").
        field: String,
        /// Error message (e.g., "${`THEME_DIR`} not set").
        message: String,
    },
}

/// Whether `name` can be referenced as `$$NAME` from a template.
fn is_global_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Expand `${VAR}` and `${VAR:-default}` references in a config string.
///
/// Strings without `${` are returned unchanged, so a bare `$` in a path is
/// left alone.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `qaml.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated once more.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dirs) = &settings.template_dirs {
            self.templates_resolved.dirs.clone_from(dirs);
        }
        if let Some(max_depth) = settings.max_depth {
            self.parser.max_depth = max_depth;
        }
        for (name, value) in &settings.globals {
            self.globals.insert(name.clone(), value.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            templates: TemplatesConfigRaw::default(),
            parser: ParserConfig::default(),
            globals: HashMap::new(),
            templates_resolved: TemplatesConfig {
                dirs: vec![base.join(DEFAULT_TEMPLATE_DIR)],
                extension: DEFAULT_EXTENSION.to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_templates()?;
        self.validate_parser()?;
        self.validate_globals()?;
        Ok(())
    }

    fn validate_templates(&self) -> Result<(), ConfigError> {
        if self.templates_resolved.extension.is_empty() {
            return Err(ConfigError::Validation(
                "templates.extension cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_parser(&self) -> Result<(), ConfigError> {
        let depth = self.parser.max_depth;
        if depth == 0 {
            return Err(ConfigError::Validation(
                "parser.max_depth must be greater than 0".to_owned(),
            ));
        }
        if depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Validation(format!(
                "parser.max_depth cannot exceed {MAX_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }

    fn validate_globals(&self) -> Result<(), ConfigError> {
        let mut invalid: Vec<&str> = self
            .globals
            .keys()
            .map(String::as_str)
            .filter(|name| !is_global_name(name))
            .collect();
        if invalid.is_empty() {
            return Ok(());
        }
        invalid.sort_unstable();
        Err(ConfigError::Validation(format!(
            "global names must be upper-case identifiers: {}",
            invalid.join(", ")
        )))
    }

    /// Expand environment variable references in template directories.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(dirs) = self.templates.dirs.as_mut() {
            for dir in dirs.iter_mut() {
                *dir = expand_env(dir, "templates.dirs")?;
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let dirs = match &self.templates.dirs {
            Some(dirs) => dirs.iter().map(|d| config_dir.join(d)).collect(),
            None => vec![config_dir.join(DEFAULT_TEMPLATE_DIR)],
        };
        self.templates_resolved = TemplatesConfig {
            dirs,
            extension: self
                .templates
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned()),
        };
    }
}
