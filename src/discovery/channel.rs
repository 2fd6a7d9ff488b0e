//! An in-process discovery source.
//!
//! [`ChannelDiscovery`] is the source half handed to a [`DiscoveryAdapter`](super::DiscoveryAdapter);
//! [`DiscoveryFeed`] is the publisher half kept by whoever observes instances (an embedding
//! service, or a test playing the role of the network).
//!
//! ```rust
//! use fleet_reconciler::discovery::{ChannelDiscovery, DiscoverySource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (mut source, feed) = ChannelDiscovery::new();
//!     let mut events = source.start(8).await.unwrap();
//!
//!     assert!(feed.appeared(["UserDAO"]).await);
//!     let event = events.recv().await.unwrap();
//!     assert_eq!(event.produced_names, vec!["UserDAO".to_string()]);
//!
//!     source.stop().await;
//!     assert!(!feed.appeared(["UserDAO"]).await);
//! }
//! ```

use super::{DiscoveryError, DiscoverySource};
use crate::model::DiscoveryEvent;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info};

type Slot = Arc<Mutex<Option<mpsc::Sender<DiscoveryEvent>>>>;

pub struct ChannelDiscovery {
    slot: Slot,
}

/// Publishes events into a [`ChannelDiscovery`]. Cheap to clone.
#[derive(Clone)]
pub struct DiscoveryFeed {
    slot: Slot,
}

impl ChannelDiscovery {
    pub fn new() -> (Self, DiscoveryFeed) {
        let slot: Slot = Arc::new(Mutex::new(None));
        (
            Self { slot: slot.clone() },
            DiscoveryFeed { slot },
        )
    }
}

#[async_trait]
impl DiscoverySource for ChannelDiscovery {
    async fn start(
        &mut self,
        buffer_size: usize,
    ) -> Result<mpsc::Receiver<DiscoveryEvent>, DiscoveryError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(DiscoveryError::AlreadyStarted);
        }
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        *slot = Some(sender);
        info!("Channel discovery started");
        Ok(receiver)
    }

    async fn stop(&mut self) {
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Channel discovery stopped");
        }
    }
}

impl DiscoveryFeed {
    /// Delivers `event` to the running source.
    ///
    /// Returns `false` if the source is not started (or already stopped) and the event was dropped.
    pub async fn publish(&self, event: DiscoveryEvent) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(sender) = sender else {
            debug!(?event, "Discovery not running, event dropped");
            return false;
        };
        sender.send(event).await.is_ok()
    }

    pub async fn appeared<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publish(DiscoveryEvent::appeared(names)).await
    }

    pub async fn disappeared<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publish(DiscoveryEvent::disappeared(names)).await
    }
}
