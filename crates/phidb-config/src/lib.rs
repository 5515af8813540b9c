//! Module: phidb-config
//! Responsibility: load `phidb.toml` into typed engine and output settings.
//! Does not own: engine limits enforcement (`phidb-core`) or CLI flag merging.
//! Boundary: the only crate that reads configuration files.

#[cfg(test)]
mod tests;

use phidb_core::config::{DEFAULT_MAX_GROUPS, EngineConfig};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "phidb.toml";

/// Directory result tables are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("engine.max_groups must be positive")]
    ZeroMaxGroups,
}

///
/// EngineSection
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub max_groups: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_groups: DEFAULT_MAX_GROUPS,
        }
    }
}

///
/// OutputSection
///
/// Where `phidb run` writes rendered tables.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub stdout: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            stdout: false,
        }
    }
}

///
/// PhidbConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhidbConfig {
    pub engine: EngineSection,
    pub output: OutputSection,
}

impl PhidbConfig {
    /// Parse configuration text; `origin` only labels errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Load the file at `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_toml(&text, path)
    }

    /// Load an explicitly requested file, or `phidb.toml` when present.
    ///
    /// Only the implicit default file may be missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::load(Path::new(DEFAULT_CONFIG_FILE)) {
            Err(ConfigError::NotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig::new().with_max_groups(self.engine.max_groups)
    }

    const fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_groups == 0 {
            return Err(ConfigError::ZeroMaxGroups);
        }

        Ok(())
    }
}
