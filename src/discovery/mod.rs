//! # Discovery
//!
//! The passive feed of instance appearances and disappearances, and the adapter that turns it
//! into registry counts.
//!
//! - [`DiscoverySource`] - the external mechanism, seen as a start/stop lifecycle plus an event
//!   channel
//! - [`DiscoveryAdapter`] - forwards a source's events into a
//!   [`RegistryClient`](crate::registry::RegistryClient)
//! - [`ChannelDiscovery`] - in-process source driven by a [`DiscoveryFeed`]
//! - [`JsonLinesDiscovery`] - source reading JSON events from a reader such as stdin

pub mod adapter;
pub mod channel;
pub mod error;
pub mod json_lines;

pub use adapter::*;
pub use channel::*;
pub use error::*;
pub use json_lines::*;

use crate::model::DiscoveryEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// An external discovery mechanism.
///
/// How presence is announced and how absence is detected is up to the implementation; the
/// controller only sees the resulting [`DiscoveryEvent`]s.
#[async_trait]
pub trait DiscoverySource: Send {
    /// Begins listening. Events are delivered on the returned channel until [`stop`](Self::stop).
    async fn start(
        &mut self,
        buffer_size: usize,
    ) -> Result<mpsc::Receiver<DiscoveryEvent>, DiscoveryError>;

    /// Stops listening and closes the event channel.
    async fn stop(&mut self);
}
