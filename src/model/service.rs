use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Normalizes a product name into its registry key (trimmed, lower-case).
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The desired-state record for one product managed by the controller.
///
/// # Registry Ownership
/// A `ServiceSpec` is created once by [`Registry::load`](crate::registry::Registry::load) and lives
/// inside the [`Registry`](crate::registry::Registry) for the lifetime of the controller.
/// The observed instance count can only be changed through the registry, so every copy handed
/// out (e.g. by [`RegistryClient::snapshot`](crate::registry::RegistryClient::snapshot)) is a
/// point-in-time view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    name: String,
    path: PathBuf,
    executable: String,
    desired_replicas: u32,
    port: Option<u16>,
    log_level: Option<String>,
    implementation: Option<String>,
    options: Vec<(String, String)>,
    observed: u32,
}

impl ServiceSpec {
    /// Creates a new spec with an observed count of zero.
    ///
    /// # Arguments
    /// * `name` - Product name; normalized with [`normalize_name`]
    /// * `path` - Folder containing the executable
    /// * `executable` - Entry point inside `path`
    /// * `desired_replicas` - Target instance count
    pub fn new(
        name: impl AsRef<str>,
        path: impl Into<PathBuf>,
        executable: impl Into<String>,
        desired_replicas: u32,
    ) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            path: path.into(),
            executable: executable.into(),
            desired_replicas,
            port: None,
            log_level: None,
            implementation: None,
            options: Vec::new(),
            observed: 0,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_log_level(mut self, directive: impl Into<String>) -> Self {
        self.log_level = Some(directive.into());
        self
    }

    pub fn with_implementation(mut self, variant: impl Into<String>) -> Self {
        self.implementation = Some(variant.into());
        self
    }

    /// Appends one option flag. Insertion order is the order flags are passed on launch.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The program to launch: `path` joined with `executable`.
    pub fn program(&self) -> PathBuf {
        self.path.join(&self.executable)
    }

    pub fn desired_replicas(&self) -> u32 {
        self.desired_replicas
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Instances currently known to be running, as inferred from discovery events.
    pub fn observed_count(&self) -> u32 {
        self.observed
    }

    /// `max(0, desired - observed)`.
    pub fn deficit(&self) -> u32 {
        self.desired_replicas.saturating_sub(self.observed)
    }

    pub(crate) fn increment_observed(&mut self) -> u32 {
        self.observed = self.observed.saturating_add(1);
        self.observed
    }

    /// Returns `None` when the count is already zero and was left untouched.
    pub(crate) fn decrement_observed(&mut self) -> Option<u32> {
        self.observed = self.observed.checked_sub(1)?;
        Some(self.observed)
    }
}

impl Display for ServiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.name, self.observed, self.desired_replicas
        )
    }
}
