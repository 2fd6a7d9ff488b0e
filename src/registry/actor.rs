//! # Registry Actor
//!
//! The `RegistryActor` is the single owner of the [`Registry`]. Discovery mutations and the
//! reconciliation snapshot are all requests on one channel, so they are applied strictly in
//! arrival order and the snapshot always sees a consistent set of counts. No `Mutex` is needed.

use super::message::RegistryRequest;
use super::{Registry, RegistryClient};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct RegistryActor {
    receiver: mpsc::Receiver<RegistryRequest>,
    registry: Registry,
}

impl RegistryActor {
    /// Creates a new `RegistryActor` around a loaded registry, plus its client.
    ///
    /// # Arguments
    ///
    /// * `registry` - The loaded desired state; ownership moves into the actor.
    /// * `buffer_size` - Capacity of the request channel, at least 1. When full, client calls wait.
    pub fn new(registry: Registry, buffer_size: usize) -> (Self, RegistryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self { receiver, registry };
        (actor, RegistryClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(services = self.registry.len(), "Registry actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RegistryRequest::Get { name, respond_to } => {
                    let spec = self.registry.get(&name).cloned();
                    debug!(service = %name, found = spec.is_some(), "Get");
                    let _ = respond_to.send(Ok(spec));
                }
                RegistryRequest::IncrementObserved { name, respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.increment_observed(&name)));
                }
                RegistryRequest::DecrementObserved { name, respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.decrement_observed(&name)));
                }
                RegistryRequest::Snapshot { respond_to } => {
                    debug!(services = self.registry.len(), "Snapshot");
                    let _ = respond_to.send(Ok(self.registry.snapshot()));
                }
            }
        }

        info!(services = self.registry.len(), "Registry actor shutdown");
    }
}
