//! CLI command implementations.

pub(crate) mod parse;
pub(crate) mod render;

pub(crate) use parse::ParseArgs;
pub(crate) use render::RenderArgs;

use std::path::Path;

use qaml_syntax::{Node, ParseOptions, parse_with};

use crate::error::CliError;

/// Read and parse a markup file.
fn parse_file(path: &Path, options: &ParseOptions) -> Result<Node, CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with(&source, options).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
