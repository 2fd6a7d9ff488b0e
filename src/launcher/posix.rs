//! Command-string launcher: the whole invocation is one shell line ending in `&`.

use super::{build_arguments, runtime_available, ProcessLauncher};
use crate::model::ServiceSpec;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct PosixLauncher {
    shell: String,
}

impl PosixLauncher {
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// The shell line for one instance: every token quoted, backgrounded with `&`.
    pub fn command_line(spec: &ServiceSpec) -> String {
        let mut line = build_arguments(spec)
            .iter()
            .map(|token| shell_quote(token))
            .collect::<Vec<_>>()
            .join(" ");
        line.push_str(" &");
        line
    }
}

impl Default for PosixLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher for PosixLauncher {
    fn launch(&self, spec: &ServiceSpec) {
        if !runtime_available(spec) {
            return;
        }
        let line = Self::command_line(spec);
        info!(service = spec.name(), command = %line, "Launching instance");

        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        #[cfg(unix)]
        command.process_group(0);

        // The handle is dropped right away; the runtime reaps the shell when it exits.
        if let Err(e) = command.spawn() {
            error!(service = spec.name(), shell = %self.shell, error = %e, "Launch failed");
        }
    }
}

/// Single-quotes `token` unless it is made only of shell-inert characters.
fn shell_quote(token: &str) -> String {
    let inert = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if inert {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_quotes_spaces_and_globs() {
        let spec = ServiceSpec::new("pagedao", "/srv/my dao", "page.js", 1)
            .with_log_level("info")
            .with_port(8100)
            .with_option("title", "it's");
        assert_eq!(
            PosixLauncher::command_line(&spec),
            r"'/srv/my dao/page.js' --loglevel '*:info' --port 8100 --title 'it'\''s' &"
        );
    }

    #[test]
    fn test_empty_token_is_quoted() {
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn test_launch_failure_is_swallowed() {
        let launcher = PosixLauncher::with_shell("/definitely/not/a/shell");
        launcher.launch(&ServiceSpec::new("pagedao", "", "true", 1));
    }

    #[test]
    fn test_launch_without_runtime_is_skipped() {
        let result = std::panic::catch_unwind(|| {
            PosixLauncher::new().launch(&ServiceSpec::new("noop", "", "true", 1));
        });
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_through_shell() {
        PosixLauncher::new().launch(&ServiceSpec::new("noop", "", "true", 1));
    }
}
