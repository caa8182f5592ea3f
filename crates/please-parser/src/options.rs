//! Parser configuration.
//!
//! Options can be built in code or loaded from TOML, either as top-level keys
//! or under a `[parser]` table:
//!
//! ```toml
//! [parser]
//! require_colon_before_block = false
//! max_depth = 64
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// Knobs that change how BUILD files are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Require `:` between a `def`/`if`/`elif`/`else` header and its block.
    /// When false the colon is optional.
    pub require_colon_before_block: bool,
    /// Maximum nesting of expressions, calls and literals. Deeper input fails
    /// the enclosing statement with a "nesting too deep" diagnostic.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_colon_before_block: true,
            max_depth: 200,
        }
    }
}

impl ParseOptions {
    /// Read options from a TOML file.
    pub fn from_file(path: &Path) -> Result<ParseOptions, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<ParseOptions, OptionsError> {
        let mut table: toml::Table = toml::from_str(content).map_err(OptionsError::Toml)?;
        let section = match table.remove("parser") {
            Some(toml::Value::Table(parser)) => parser,
            Some(_) => return Err(OptionsError::NotATable("parser")),
            None => table,
        };
        toml::Value::Table(section)
            .try_into()
            .map_err(OptionsError::Toml)
    }
}

/// Failure to load [`ParseOptions`].
#[derive(Debug)]
pub enum OptionsError {
    /// The options file could not be read.
    Io { path: String, source: std::io::Error },
    /// The document is not valid TOML or has unknown/mistyped keys.
    Toml(toml::de::Error),
    /// A section that must be a table is something else.
    NotATable(&'static str),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Toml(err) => write!(f, "failed to parse parser options: {err}"),
            Self::NotATable(key) => write!(f, "`{key}` must be a table"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml(err) => Some(err),
            Self::NotATable(_) => None,
        }
    }
}
