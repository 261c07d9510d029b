//! `.covercheck.yaml` loading.
//!
//! ```yaml
//! root: github.com/acme/service
//! mode: packages        # or: files
//! sort_by: stmt-coverage
//! order: asc
//! excludes:
//!   - ./internal/mocks
//!   - ./gen/**
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{CoverError, Result};
use crate::report::Configuration;
use crate::sort::{Order, SortBy};

pub const DEFAULT_CONFIG_FILE: &str = ".covercheck.yaml";

/// Raw contents of the config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub root: String,
    pub excludes: Vec<String>,
    pub sort_by: String,
    pub order: String,
    pub mode: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            excludes: Vec::new(),
            sort_by: SortBy::Package.as_str().to_string(),
            order: Order::Desc.as_str().to_string(),
            mode: "packages".to_string(),
        }
    }
}

impl CheckConfig {
    /// Load the config file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_yaml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CoverError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|e| CoverError::Config(e.to_string()))
    }

    /// Whether entries are grouped by package (`mode: packages`) or by file.
    pub fn group_by_package(&self) -> Result<bool> {
        match self.mode.as_str() {
            "packages" => Ok(true),
            "files" => Ok(false),
            other => Err(CoverError::InvalidConfiguration(format!(
                "mode must be either packages or files, got {other:?}"
            ))),
        }
    }

    /// Validate the file's settings into a report [`Configuration`].
    pub fn to_configuration(&self) -> Result<Configuration> {
        Configuration::from_strings(
            self.root.clone(),
            self.excludes.clone(),
            &self.sort_by,
            &self.order,
            self.group_by_package()?,
        )
    }
}
