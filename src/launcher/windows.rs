//! Argument-vector launcher: program and arguments go straight to the OS, no shell involved.
//!
//! Used where paths or flag values containing spaces cannot be trusted to survive shell quoting.

use super::{build_arguments, runtime_available, ProcessLauncher};
use crate::model::ServiceSpec;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

#[derive(Debug, Clone, Default)]
pub struct WindowsLauncher;

impl WindowsLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for WindowsLauncher {
    fn launch(&self, spec: &ServiceSpec) {
        if !runtime_available(spec) {
            return;
        }
        let args = build_arguments(spec);
        let Some((program, rest)) = args.split_first() else {
            return;
        };
        info!(service = spec.name(), %program, args = ?rest, "Launching instance");

        let mut command = Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        #[cfg(windows)]
        command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        #[cfg(unix)]
        command.process_group(0);

        if let Err(e) = command.spawn() {
            error!(service = spec.name(), %program, error = %e, "Launch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable_does_not_propagate() {
        let spec = ServiceSpec::new("pagedao", "/definitely/not/here", "page.js", 1);
        WindowsLauncher::new().launch(&spec);
    }

    #[test]
    fn test_launch_without_runtime_is_skipped() {
        let result = std::panic::catch_unwind(|| {
            WindowsLauncher::new().launch(&ServiceSpec::new("noop", "", "true", 1));
        });
        assert!(result.is_ok());
    }
}
