//! The environment configuration document.
//!
//! Documents are JSON files named after the environment inside a configuration root:
//!
//! ```text
//! config/
//!   development.json
//!   production.json
//! ```
//!
//! ```json
//! {
//!   "services": [
//!     { "name": "PageDAO", "path": "/srv/dao", "executable": "page.js", "replicas": 3,
//!       "port": 8100, "options": { "loglevel": "info", "implementation": "mock" } }
//!   ]
//! }
//! ```

use super::ConfigurationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Root of an environment configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub services: Vec<ServiceEntry>,
}

/// One declared service, exactly as written in the document.
///
/// Validation (required name, replica bounds, uniqueness) happens in
/// [`Registry::load`](crate::registry::Registry::load), not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub executable: String,
    pub port: Option<u16>,
    pub loglevel: Option<String>,
    pub implementation: Option<String>,
    /// Flag name to flag value; key order is preserved from the source file.
    pub options: Option<Map<String, Value>>,
    pub replicas: Option<u32>,
}

impl ServiceEntry {
    /// Shorthand for an entry with only a name, as used by tests and embedders.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Options as ordered string pairs. Non-string scalars keep their JSON text; `null` is dropped.
    pub fn options_in_order(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .flatten()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key.clone(), s.clone())),
                other => Some((key.clone(), other.to_string())),
            })
            .collect()
    }
}

impl ConfigDocument {
    /// Path of the document for `environment` under `root`.
    pub fn locate(root: impl AsRef<Path>, environment: &str) -> PathBuf {
        root.as_ref().join(format!("{}.json", environment.trim()))
    }

    /// Reads and parses the document for `environment` under `root`.
    pub fn load(root: impl AsRef<Path>, environment: &str) -> Result<Self, ConfigurationError> {
        Self::from_path(Self::locate(root, environment))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading configuration");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl FromStr for ConfigDocument {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
