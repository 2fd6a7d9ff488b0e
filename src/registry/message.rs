//! # Registry Messages
//!
//! Requests sent from a [`RegistryClient`](super::RegistryClient) to the
//! [`RegistryActor`](super::RegistryActor). Every request carries a one-shot reply channel so
//! the sender knows when its mutation has been applied.

use super::RegistryError;
use crate::model::ServiceSpec;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the registry actor.
pub type Response<T> = oneshot::Sender<Result<T, RegistryError>>;

#[derive(Debug)]
pub enum RegistryRequest {
    Get {
        name: String,
        respond_to: Response<Option<ServiceSpec>>,
    },
    IncrementObserved {
        name: String,
        respond_to: Response<Option<u32>>,
    },
    DecrementObserved {
        name: String,
        respond_to: Response<Option<u32>>,
    },
    Snapshot {
        respond_to: Response<Vec<ServiceSpec>>,
    },
}
