use super::message::RegistryRequest;
use super::RegistryError;
use crate::model::ServiceSpec;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Cloneable async handle to a running [`RegistryActor`](super::RegistryActor).
///
/// Holds only a sender, so cloning is cheap. Each call resolves once the actor has applied it.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    sender: mpsc::Sender<RegistryRequest>,
}

impl RegistryClient {
    pub fn new(sender: mpsc::Sender<RegistryRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Option<ServiceSpec>, RegistryError> {
        let name = name.to_string();
        self.request(|respond_to| RegistryRequest::Get { name, respond_to })
            .await
    }

    /// Returns the new observed count, or `None` if the product is not managed here.
    #[instrument(skip(self))]
    pub async fn increment_observed(&self, name: &str) -> Result<Option<u32>, RegistryError> {
        let name = name.to_string();
        self.request(|respond_to| RegistryRequest::IncrementObserved { name, respond_to })
            .await
    }

    /// Returns the new observed count, or `None` if nothing changed.
    #[instrument(skip(self))]
    pub async fn decrement_observed(&self, name: &str) -> Result<Option<u32>, RegistryError> {
        let name = name.to_string();
        self.request(|respond_to| RegistryRequest::DecrementObserved { name, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Vec<ServiceSpec>, RegistryError> {
        self.request(|respond_to| RegistryRequest::Snapshot { respond_to })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, RegistryError>>) -> RegistryRequest,
    ) -> Result<T, RegistryError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RegistryError::ActorClosed)?;
        response.await.map_err(|_| RegistryError::ActorDropped)?
    }
}
