use super::reconcile::{reconcile, ReconcileReport};
use super::ControllerError;
use crate::config::{ConfigDocument, ControllerSettings};
use crate::discovery::{DiscoveryAdapter, DiscoverySource};
use crate::launcher::ProcessLauncher;
use crate::registry::{self, Registry, RegistryClient, RegistryError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

/// Where the controller is in its one-way lifecycle.
///
/// ```text
/// Idle -> Loading -> Discovering -> (warm-up) -> Reconciled
///                                              \-> Stopped (from any state, via stop())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
    Discovering,
    Reconciled,
    Stopped,
}

/// The fleet reconciliation controller.
///
/// `Controller` owns the registry actor, the discovery adapter and the single deferred
/// reconciliation pass. Nothing is global: several controllers can run side by side.
///
/// # Example
///
/// ```rust
/// use fleet_reconciler::config::{ConfigDocument, ControllerSettings, ServiceEntry};
/// use fleet_reconciler::discovery::ChannelDiscovery;
/// use fleet_reconciler::launcher::MockLauncher;
/// use fleet_reconciler::lifecycle::Controller;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let launcher = MockLauncher::new();
///     let (source, feed) = ChannelDiscovery::new();
///     let settings = ControllerSettings::default().with_warmup(Duration::from_millis(10));
///     let mut controller = Controller::new(settings, Arc::new(launcher.clone()), Box::new(source));
///
///     let document = ConfigDocument { services: vec![ServiceEntry::named("pagedao")] };
///     controller.start(&document).await?;
///     let report = controller.reconciled().await?;
///
///     assert_eq!(report.launched("pagedao"), 1);
///     assert_eq!(launcher.launch_count("pagedao"), 1);
///     controller.stop().await;
///     drop(feed);
///     Ok(())
/// }
/// ```
pub struct Controller {
    settings: ControllerSettings,
    launcher: Arc<dyn ProcessLauncher>,
    adapter: DiscoveryAdapter,
    state: Arc<watch::Sender<ControllerState>>,
    registry: Option<RegistryClient>,
    reconciliation: Option<JoinHandle<Result<ReconcileReport, RegistryError>>>,
}

impl Controller {
    pub fn new(
        settings: ControllerSettings,
        launcher: Arc<dyn ProcessLauncher>,
        discovery: Box<dyn DiscoverySource>,
    ) -> Self {
        let (state, _) = watch::channel(ControllerState::Idle);
        Self {
            settings,
            launcher,
            adapter: DiscoveryAdapter::new(discovery),
            state: Arc::new(state),
            registry: None,
            reconciliation: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        *self.state.borrow()
    }

    /// Watches state transitions, including the deferred `Discovering -> Reconciled`.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Client for the running registry; `None` until `start` succeeds.
    pub fn registry(&self) -> Option<&RegistryClient> {
        self.registry.as_ref()
    }

    /// Loads the registry, starts discovery and schedules the single reconciliation pass.
    ///
    /// Returns once discovery is running; the pass happens `settings.warmup` later.
    ///
    /// # Errors
    /// - [`ControllerError::AlreadyStarted`] unless the controller is `Idle`
    /// - [`ControllerError::Configuration`] if the document is rejected; the controller goes back
    ///   to `Idle` and no discovery is started
    /// - [`ControllerError::Discovery`] if the source fails to start; the controller goes back
    ///   to `Idle`
    pub async fn start(&mut self, document: &ConfigDocument) -> Result<(), ControllerError> {
        let current = self.state();
        if current != ControllerState::Idle {
            return Err(ControllerError::AlreadyStarted(current));
        }

        self.transition(ControllerState::Loading);
        let loaded = match Registry::load(document) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!(error = %e, "Configuration rejected");
                self.transition(ControllerState::Idle);
                return Err(e.into());
            }
        };

        let (actor, client) = registry::new(loaded, self.settings.registry_buffer);
        tokio::spawn(actor.run().instrument(info_span!("registry_actor")));

        if let Err(e) = self
            .adapter
            .start(client.clone(), self.settings.discovery_buffer)
            .await
        {
            error!(error = %e, "Discovery failed to start");
            self.transition(ControllerState::Idle);
            return Err(e.into());
        }
        self.transition(ControllerState::Discovering);

        let pass = deferred_pass(
            self.settings.warmup,
            client.clone(),
            self.launcher.clone(),
            self.state.clone(),
        );
        let span = info_span!("reconciliation", warmup = ?self.settings.warmup);
        self.reconciliation = Some(tokio::spawn(pass.instrument(span)));
        self.registry = Some(client);

        info!(warmup = ?self.settings.warmup, "Controller started");
        Ok(())
    }

    /// Stops discovery. A scheduled pass still runs; launched processes are left alone.
    pub async fn stop(&mut self) {
        self.transition(ControllerState::Stopped);
        self.adapter.stop().await;
        info!("Controller stopped");
    }

    /// Waits for the scheduled pass and returns what it did.
    ///
    /// # Errors
    /// [`ControllerError::NotScheduled`] if `start` never succeeded or the report was already
    /// taken.
    pub async fn reconciled(&mut self) -> Result<ReconcileReport, ControllerError> {
        let handle = self
            .reconciliation
            .take()
            .ok_or(ControllerError::NotScheduled)?;
        let report = handle
            .await
            .map_err(|e| ControllerError::TaskFailed(e.to_string()))??;
        Ok(report)
    }

    fn transition(&self, next: ControllerState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!(from = ?previous, to = ?next, "State");
        }
    }
}

async fn deferred_pass(
    warmup: std::time::Duration,
    registry: RegistryClient,
    launcher: Arc<dyn ProcessLauncher>,
    state: Arc<watch::Sender<ControllerState>>,
) -> Result<ReconcileReport, RegistryError> {
    tokio::time::sleep(warmup).await;

    let report = reconcile(&registry, launcher.as_ref()).await;
    match &report {
        Ok(_) => {
            state.send_if_modified(|current| {
                if *current == ControllerState::Discovering {
                    *current = ControllerState::Reconciled;
                    info!(from = ?ControllerState::Discovering, to = ?ControllerState::Reconciled, "State");
                    true
                } else {
                    false
                }
            });
        }
        Err(e) => warn!(error = %e, "Reconciliation pass skipped, registry unavailable"),
    }
    report
}
