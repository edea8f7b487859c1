//! Configuration file parsing
//!
//! Reads sqlite-schema-diff.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaConfig {
    /// Schema applied to unqualified table names so that `users` and
    /// `main.users` resolve to the same table.
    #[serde(default = "default_schema")]
    pub default_schema: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            default_schema: default_schema(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output format: "sql", "json", "plan"
    #[serde(default = "default_format")]
    pub format: String,

    /// Maximum line width before the printer breaks a group.
    #[serde(default = "default_max_width")]
    pub max_width: usize,

    /// Two-character identifier bracket, e.g. "\"\"" or "[]".
    /// Empty disables quoting.
    #[serde(default = "default_quote_identifiers")]
    pub quote_identifiers: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            max_width: default_max_width(),
            quote_identifiers: default_quote_identifiers(),
        }
    }
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_format() -> String {
    "sql".to_string()
}

fn default_max_width() -> usize {
    80
}

fn default_quote_identifiers() -> String {
    "\"\"".to_string()
}

/// Output formats accepted by `output.format` and `--format`.
pub const VALID_FORMATS: &[&str] = &["sql", "json", "plan"];

/// Valid section names for `--explain-config`.
const VALID_SECTIONS: &[&str] = &["schema", "output"];

const SECTION_SCHEMA: &str = "\
[schema]

  default_schema = \"main\"
    Schema applied to unqualified table names so that `users` and
    `main.users` resolve to the same table.
    Type: string
    Default: \"main\"
";

const SECTION_OUTPUT: &str = "\
[output]

  format = \"sql\"
    Output to produce: generated DDL, a JSON edit plan, or a
    human-readable plan.
    Type: string
    Values: \"sql\", \"json\", \"plan\"
    Default: \"sql\"

  max_width = 80
    Maximum line width before the printer breaks a statement across
    lines.
    Type: integer
    Default: 80

  quote_identifiers = \"\\\"\\\"\"
    Two-character bracket wrapped around emitted identifiers. Set to
    \"\" to emit bare identifiers.
    Type: string (exactly two characters, or empty)
    Default: \"\\\"\\\"\"
";

/// Print configuration reference for a specific section, or all sections.
///
/// Pass `"all"` to print everything, or a section name like `"output"`.
/// Returns an error for unknown section names.
pub fn explain_config(section: &str) -> Result<(), ConfigError> {
    let sections: &[(&str, &str)] = &[("schema", SECTION_SCHEMA), ("output", SECTION_OUTPUT)];

    if section == "all" {
        for (i, (_, text)) in sections.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{text}");
        }
    } else if let Some((_, text)) = sections.iter().find(|(name, _)| *name == section) {
        print!("{text}");
    } else {
        return Err(ConfigError::Validation(format!(
            "unknown config section '{}'. Valid sections: {}",
            section,
            VALID_SECTIONS.join(", ")
        )));
    }

    Ok(())
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid output format '{}'. Valid values: {}",
                self.output.format,
                VALID_FORMATS.join(", ")
            )));
        }

        let quote_len = self.output.quote_identifiers.chars().count();
        if quote_len != 0 && quote_len != 2 {
            return Err(ConfigError::Validation(format!(
                "quote_identifiers must be empty or exactly two characters, got '{}'",
                self.output.quote_identifiers
            )));
        }

        if self.output.max_width == 0 {
            return Err(ConfigError::Validation(
                "max_width must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
