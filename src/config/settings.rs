use std::time::Duration;

/// Warm-up delay used when none is configured.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(10);

/// Runtime knobs for a [`Controller`](crate::lifecycle::Controller).
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// How long discovery runs before observed counts are trusted for the single pass.
    pub warmup: Duration,
    /// Capacity of the registry actor's request channel; 0 is treated as 1.
    pub registry_buffer: usize,
    /// Capacity of the discovery event channel; 0 is treated as 1.
    pub discovery_buffer: usize,
}

impl ControllerSettings {
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            warmup: DEFAULT_WARMUP,
            registry_buffer: 64,
            discovery_buffer: 64,
        }
    }
}
