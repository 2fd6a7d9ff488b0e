//! # Fleet Reconciler
//!
//! > **Keep the declared number of service instances running, inferred from passive discovery.**
//!
//! The controller reads a declarative list of services with replica counts, counts the instances
//! it sees announced on a discovery feed, and after a warm-up delay launches enough new OS
//! processes to close the gap. It does not supervise what it launches.
//!
//! ## 🏗️ Design
//!
//! ### Registry as an actor
//! Desired and observed state live in one [`Registry`](registry::Registry) owned by a single
//! Tokio task. Discovery mutations and the reconciliation snapshot are messages on the same
//! channel, so they are applied in order without locks, and the snapshot is always consistent.
//!
//! ### Explicit data flow
//! Discovery never touches counters directly: a [`DiscoverySource`](discovery::DiscoverySource)
//! yields [`DiscoveryEvent`](model::DiscoveryEvent)s on a channel and the
//! [`DiscoveryAdapter`](discovery::DiscoveryAdapter) turns them into registry requests. Any part
//! can be replaced by an in-process double in tests.
//!
//! ### Platform dispatch once
//! Process creation is the [`ProcessLauncher`](launcher::ProcessLauncher) trait with a
//! command-string and an argument-vector variant, chosen once by
//! [`launcher::for_host`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - [`ServiceSpec`](model::ServiceSpec) and [`DiscoveryEvent`](model::DiscoveryEvent)
//! - [`config`] - the environment configuration document and controller settings
//! - [`registry`] - desired/observed state, its actor and client
//! - [`discovery`] - discovery sources and the adapter
//! - [`launcher`] - fire-and-forget process creation, plus a mock
//! - [`lifecycle`] - the [`Controller`](lifecycle::Controller), the reconciliation pass, tracing
//!
//! ## 🚀 Running
//!
//! ```bash
//! # config/production.json, discovery events as JSON lines on stdin
//! RUST_LOG=info cargo run -- --config-root config --env production --warmup-secs 10
//! ```

pub mod config;
pub mod discovery;
pub mod launcher;
pub mod lifecycle;
pub mod model;
pub mod registry;
