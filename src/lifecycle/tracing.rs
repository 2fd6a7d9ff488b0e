//! # Observability & Tracing
//!
//! The controller logs through the `tracing` crate with structured fields rather than formatted
//! strings, so a line like `Closing deficit service="pagedao" desired=3 observed=1 deficit=2`
//! can be filtered and aggregated as-is.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle**: every controller state transition, discovery start/stop, registry actor
//!   start/shutdown
//! - **Discovery**: each event and each per-name count change (`debug`); products nobody manages
//!   (`debug`); disappearances below zero (`warn`)
//! - **Reconciliation**: one line per service with a deficit, one summary per pass
//! - **Launches**: the command issued (`info`) and spawn failures (`error`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and launches only (default)
//! RUST_LOG=info fleet-reconciler --env production
//!
//! # Every discovery event and count change
//! RUST_LOG=debug fleet-reconciler --env production
//!
//! # Only the registry
//! RUST_LOG=fleet_reconciler::registry=debug fleet-reconciler
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Call once, at the start of `main`.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
