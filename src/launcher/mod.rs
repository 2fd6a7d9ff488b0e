//! # Process Launcher
//!
//! Starts one additional instance of a [`ServiceSpec`], fire-and-forget: the launched process is
//! detached into its own process group, its stdio is discarded, and no handle is kept. A spawn
//! failure is logged and never reaches the caller.
//!
//! ## Variants
//!
//! - [`PosixLauncher`] - assembles one command line and hands it to a shell
//! - [`WindowsLauncher`] - passes an explicit argument vector to the OS, no shell
//!
//! [`for_host`] picks the variant once, at construction time, based on the target OS.
//!
//! ## Testing
//!
//! [`MockLauncher`] records launches instead of spawning anything; see the [`mock`] module.

pub mod args;
pub mod mock;
pub mod posix;
pub mod windows;

pub use args::*;
pub use mock::*;
pub use posix::*;
pub use windows::*;

use crate::model::ServiceSpec;
use std::sync::Arc;
use tracing::error;

/// Produces one more running instance of a service.
///
/// `launch` must not block on the new process and must not panic or return failures; the
/// reconciliation loop calls it `deficit` times in a row.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, spec: &ServiceSpec);
}

/// The launcher variant for the OS this binary was built for.
pub fn for_host() -> Arc<dyn ProcessLauncher> {
    if cfg!(windows) {
        Arc::new(WindowsLauncher::new())
    } else {
        Arc::new(PosixLauncher::new())
    }
}

/// Spawning goes through the Tokio process driver; outside a runtime the launch is dropped.
pub(crate) fn runtime_available(spec: &ServiceSpec) -> bool {
    if tokio::runtime::Handle::try_current().is_ok() {
        return true;
    }
    error!(service = spec.name(), "Launch skipped, no Tokio runtime on this thread");
    false
}
