//! # Service Registry
//!
//! Desired state (one [`ServiceSpec`](crate::model::ServiceSpec) per declared service) and the
//! observed instance count per service.
//!
//! ## Structure
//!
//! - [`store`] - [`Registry`], the synchronous state and its validation rules
//! - [`actor`] - [`RegistryActor`], the task that owns the registry at runtime
//! - [`client`] - [`RegistryClient`], the async handle used by discovery and reconciliation
//! - [`error`] - [`RegistryError`] for channel failures
//!
//! ## Usage
//!
//! ```rust
//! use fleet_reconciler::config::{ConfigDocument, ServiceEntry};
//! use fleet_reconciler::registry::{self, Registry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = ConfigDocument { services: vec![ServiceEntry::named("UserDAO")] };
//!     let (actor, client) = registry::new(Registry::load(&document)?, 16);
//!     tokio::spawn(actor.run());
//!
//!     client.increment_observed("USERDAO").await?;
//!     let spec = client.get("userdao").await?.expect("declared above");
//!     assert_eq!(spec.observed_count(), 1);
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod store;

pub use actor::*;
pub use client::*;
pub use error::*;
pub use message::*;
pub use store::*;

/// Creates a registry actor around `registry` and its client.
pub fn new(registry: Registry, buffer_size: usize) -> (RegistryActor, RegistryClient) {
    RegistryActor::new(registry, buffer_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigDocument, ServiceEntry};

    fn spawn_registry(names: &[&str]) -> RegistryClient {
        let document = ConfigDocument {
            services: names.iter().map(|name| ServiceEntry::named(*name)).collect(),
        };
        let (actor, client) = new(Registry::load(&document).unwrap(), 8);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_mutations_are_visible_in_snapshot() {
        let client = spawn_registry(&["pagedao", "userdao"]);

        assert_eq!(client.increment_observed("PageDAO").await.unwrap(), Some(1));
        assert_eq!(client.increment_observed("pagedao").await.unwrap(), Some(2));
        assert_eq!(client.decrement_observed("userdao").await.unwrap(), None);
        assert_eq!(client.increment_observed("mailer").await.unwrap(), None);

        let snapshot = client.snapshot().await.unwrap();
        let counts: Vec<(&str, u32)> = snapshot
            .iter()
            .map(|spec| (spec.name(), spec.observed_count()))
            .collect();
        assert_eq!(counts, vec![("pagedao", 2), ("userdao", 0)]);
    }

    #[tokio::test]
    async fn test_get_unknown_service() {
        let client = spawn_registry(&["pagedao"]);
        assert!(client.get("mailer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_buffer_is_usable() {
        let (actor, client) = new(Registry::default(), 0);
        tokio::spawn(actor.run());
        assert!(client.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_reports_closed_actor() {
        let (actor, client) = new(Registry::default(), 1);
        drop(actor);
        assert_eq!(client.snapshot().await, Err(RegistryError::ActorClosed));
    }

    #[tokio::test]
    async fn test_actor_stops_when_clients_drop() {
        let (actor, client) = new(Registry::default(), 1);
        let handle = tokio::spawn(actor.run());
        drop(client);
        handle.await.unwrap();
    }
}
