//! # Discovery Adapter
//!
//! Bridges a [`DiscoverySource`] into registry mutations. Every name in an `Appeared` event is one
//! `increment_observed`, every name in a `Disappeared` event one `decrement_observed`, applied in
//! the order they are listed. There is no deduplication: an instance reporting the same product
//! twice counts twice.
//!
//! ## Stop Guarantee
//!
//! [`DiscoveryAdapter::stop`] signals the forwarding task and waits for it to exit before
//! stopping the source. An event already being forwarded finishes; nothing else is applied
//! after `stop` returns.

use super::{DiscoveryError, DiscoverySource};
use crate::model::{DiscoveryEvent, DiscoveryEventKind};
use crate::registry::{RegistryClient, RegistryError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

pub struct DiscoveryAdapter {
    source: Box<dyn DiscoverySource>,
    running: Option<Forwarder>,
}

struct Forwarder {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl DiscoveryAdapter {
    pub fn new(source: Box<dyn DiscoverySource>) -> Self {
        Self {
            source,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Subscribes to the source and starts forwarding its events into `registry`.
    ///
    /// # Errors
    /// [`DiscoveryError::AlreadyStarted`] if the adapter is running, or whatever the source
    /// reports when it fails to start.
    pub async fn start(
        &mut self,
        registry: RegistryClient,
        buffer_size: usize,
    ) -> Result<(), DiscoveryError> {
        if self.running.is_some() {
            return Err(DiscoveryError::AlreadyStarted);
        }
        let events = self.source.start(buffer_size.max(1)).await?;
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(
            forward(events, registry, shutdown_rx).instrument(info_span!("discovery_forward")),
        );
        self.running = Some(Forwarder { shutdown, handle });
        info!("Discovery adapter started");
        Ok(())
    }

    /// Unsubscribes. Idempotent.
    pub async fn stop(&mut self) {
        let Some(Forwarder { shutdown, handle }) = self.running.take() else {
            return;
        };
        let _ = shutdown.send(());
        if let Err(e) = handle.await {
            warn!(error = %e, "Discovery forwarder ended abnormally");
        }
        self.source.stop().await;
        info!("Discovery adapter stopped");
    }
}

async fn forward(
    mut events: mpsc::Receiver<DiscoveryEvent>,
    registry: RegistryClient,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = events.recv() => event,
        };
        let Some(event) = event else {
            debug!("Discovery stream closed");
            break;
        };
        if let Err(e) = apply(&registry, event).await {
            warn!(error = %e, "Registry unavailable, discovery forwarding ends");
            break;
        }
    }
}

/// Applies one event to the registry, name by name.
pub async fn apply(registry: &RegistryClient, event: DiscoveryEvent) -> Result<(), RegistryError> {
    debug!(kind = ?event.kind, names = ?event.produced_names, "Discovery event");
    for name in &event.produced_names {
        match event.kind {
            DiscoveryEventKind::Appeared => registry.increment_observed(name).await?,
            DiscoveryEventKind::Disappeared => registry.decrement_observed(name).await?,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigDocument, ServiceEntry};
    use crate::discovery::ChannelDiscovery;
    use crate::registry::{self, Registry};

    fn spawn_registry(names: &[&str]) -> RegistryClient {
        let document = ConfigDocument {
            services: names.iter().map(|name| ServiceEntry::named(*name)).collect(),
        };
        let (actor, client) = registry::new(Registry::load(&document).unwrap(), 8);
        tokio::spawn(actor.run());
        client
    }

    async fn observed(registry: &RegistryClient, name: &str) -> u32 {
        registry.get(name).await.unwrap().unwrap().observed_count()
    }

    #[tokio::test]
    async fn test_apply_counts_every_name() {
        let registry = spawn_registry(&["userdao", "pagedao"]);

        apply(&registry, DiscoveryEvent::appeared(["UserDAO", "PageDAO", "Mailer"]))
            .await
            .unwrap();
        apply(&registry, DiscoveryEvent::appeared(["UserDAO"]))
            .await
            .unwrap();
        apply(&registry, DiscoveryEvent::disappeared(["PageDAO"]))
            .await
            .unwrap();

        assert_eq!(observed(&registry, "userdao").await, 2);
        assert_eq!(observed(&registry, "pagedao").await, 0);
    }

    #[tokio::test]
    async fn test_no_mutation_after_stop() {
        let registry = spawn_registry(&["userdao"]);
        let (source, feed) = ChannelDiscovery::new();
        let mut adapter = DiscoveryAdapter::new(Box::new(source));
        adapter.start(registry.clone(), 8).await.unwrap();

        assert!(feed.appeared(["userdao"]).await);
        tokio::task::yield_now().await;
        adapter.stop().await;
        let before = observed(&registry, "userdao").await;

        assert!(!feed.appeared(["userdao"]).await);
        assert!(!feed.disappeared(["userdao"]).await);
        assert_eq!(observed(&registry, "userdao").await, before);
        assert!(!adapter.is_running());
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let registry = spawn_registry(&["userdao"]);
        let (source, _feed) = ChannelDiscovery::new();
        let mut adapter = DiscoveryAdapter::new(Box::new(source));
        adapter.start(registry.clone(), 8).await.unwrap();
        assert!(matches!(
            adapter.start(registry, 8).await,
            Err(DiscoveryError::AlreadyStarted)
        ));
        adapter.stop().await;
    }
}
