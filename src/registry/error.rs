//! Error types for talking to the registry actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry actor closed")]
    ActorClosed,
    #[error("Registry actor dropped response channel")]
    ActorDropped,
}
