//! Error types for the reconciliation controller.

use super::ControllerState;
use crate::config::ConfigurationError;
use crate::discovery::DiscoveryError;
use crate::registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// The configuration document was rejected; nothing was started.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The discovery source could not be started; nothing was started.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// `start` is only valid from `Idle`.
    #[error("Controller cannot start from state {0:?}")]
    AlreadyStarted(ControllerState),

    /// No reconciliation pass was scheduled, or its result was already taken.
    #[error("No reconciliation pass is pending")]
    NotScheduled,

    #[error("Reconciliation task failed: {0}")]
    TaskFailed(String),
}
