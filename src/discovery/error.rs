//! Error types for discovery sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// `start` was called on a source that is already running or cannot be restarted.
    #[error("Discovery source already started")]
    AlreadyStarted,

    /// The underlying mechanism failed to come up.
    #[error("Discovery source failed: {0}")]
    Source(String),
}
