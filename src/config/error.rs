//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that reject an environment configuration document as a whole.
///
/// A document that fails with any of these never produces a partial registry.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The environment file could not be read.
    #[error("Cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not expose a `services` sequence.
    #[error("Invalid configuration structure: {0}")]
    InvalidStructure(#[from] serde_json::Error),

    /// A service entry has no usable `name`.
    #[error("Service entry #{index} is missing a name")]
    MissingName { index: usize },

    /// Two entries normalize to the same name.
    #[error("Duplicate service name: {0}")]
    DuplicateName(String),

    /// `replicas` must be at least 1.
    #[error("Service {name} declares {replicas} replicas, at least 1 is required")]
    InvalidReplicas { name: String, replicas: u32 },
}
