// Literal inputs for the demonstrations, optionally overridden from TOML

use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid literals: {reason}")]
    Invalid { reason: String },
}

/// The constants each block starts from. The defaults are the classic
/// `5 / 7`, `10`, `"John" / "Mark"` and `1` inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Literals {
    pub initial_number: i64,
    pub reassigned_number: i64,
    pub parameter_number: i64,
    pub original_name: String,
    pub replacement_name: String,
    pub initial_value: i64,
}

impl Default for Literals {
    fn default() -> Self {
        Self {
            initial_number: 5,
            reassigned_number: 7,
            parameter_number: 10,
            original_name: "John".to_string(),
            replacement_name: "Mark".to_string(),
            initial_value: 1,
        }
    }
}

impl Literals {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let literals: Self = toml::from_str(content)?;
        literals.validate()?;
        Ok(literals)
    }

    /// Rejects inputs under which a block would show nothing or fail midway.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        if self.reassigned_number == self.initial_number {
            return invalid(format!(
                "reassigned_number must differ from initial_number ({})",
                self.initial_number
            ));
        }
        if self.original_name == self.replacement_name {
            return invalid(format!(
                "replacement_name must differ from original_name ('{}')",
                self.original_name
            ));
        }
        if self.parameter_number == i64::MAX {
            return invalid("parameter_number cannot be incremented".to_string());
        }
        if self.initial_value == i64::MAX {
            return invalid("initial_value cannot be incremented".to_string());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let literals = Self::from_toml(&content)?;
        info!("loaded literals from {}", path.display());
        Ok(literals)
    }
}
