//! # Controller Lifecycle
//!
//! The reconciliation controller wires the other components together and drives them through
//! one fixed sequence:
//!
//! 1. **Load** - the configuration document becomes a [`Registry`](crate::registry::Registry),
//!    moved into a freshly spawned registry actor
//! 2. **Discover** - the [`DiscoveryAdapter`](crate::discovery::DiscoveryAdapter) starts
//!    forwarding appearances and disappearances into the registry
//! 3. **Warm up** - a single timer of `ControllerSettings::warmup` (10 s by default)
//! 4. **Reconcile** - one pass: every service with `desired > observed` gets
//!    `desired - observed` launches
//!
//! The pass runs **once**. Later instance loss still moves the counts, but never triggers
//! another launch. [`Controller::stop`] unsubscribes discovery; it neither cancels a pending
//! pass nor touches processes that were already launched.
//!
//! ## Wiring
//!
//! The registry is the only shared state and is reached exclusively through its actor:
//!
//! ```text
//! DiscoverySource --events--> DiscoveryAdapter --increment/decrement--> RegistryActor
//!                                                                          ^
//! warm-up timer --> reconcile() ---------------------------snapshot--------'
//!                       |
//!                       '--launch x deficit--> ProcessLauncher
//! ```
//!
//! Because mutations and the snapshot travel on the same channel, the deficits of one pass are
//! computed against one consistent set of counts.

pub mod controller;
pub mod error;
pub mod reconcile;
pub mod tracing;

pub use controller::*;
pub use error::*;
pub use reconcile::*;
pub use self::tracing::*;
