//! # Reconciliation Pass
//!
//! Compares desired and observed counts and asks the launcher to close every gap:
//! `deficit = max(0, desired - observed)` launches per service, issued back to back with no
//! rate limiting and no waiting on the launched processes.
//!
//! The counts come from a single registry snapshot, so every deficit in one pass is computed
//! against the same instant.

use crate::launcher::ProcessLauncher;
use crate::model::ServiceSpec;
use crate::registry::{RegistryClient, RegistryError};
use tracing::{debug, info};

/// What one pass did for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutcome {
    pub name: String,
    pub desired: u32,
    pub observed: u32,
    pub launched: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub services: Vec<ServiceOutcome>,
}

impl ReconcileReport {
    /// Launches issued for `name` (case-insensitive); 0 for unknown names.
    pub fn launched(&self, name: &str) -> u32 {
        let name = crate::model::normalize_name(name);
        self.services
            .iter()
            .find(|outcome| outcome.name == name)
            .map_or(0, |outcome| outcome.launched)
    }

    pub fn total_launched(&self) -> u32 {
        self.services.iter().map(|outcome| outcome.launched).sum()
    }
}

/// Pairs each service with its deficit.
pub fn plan(snapshot: &[ServiceSpec]) -> Vec<(&ServiceSpec, u32)> {
    snapshot.iter().map(|spec| (spec, spec.deficit())).collect()
}

/// Launches the deficit for every service in `snapshot`.
pub fn execute(snapshot: &[ServiceSpec], launcher: &dyn ProcessLauncher) -> ReconcileReport {
    let services = plan(snapshot)
        .into_iter()
        .map(|(spec, deficit)| {
            if deficit == 0 {
                debug!(service = spec.name(), observed = spec.observed_count(), "No deficit");
            } else {
                info!(
                    service = spec.name(),
                    desired = spec.desired_replicas(),
                    observed = spec.observed_count(),
                    deficit,
                    "Closing deficit"
                );
            }
            for _ in 0..deficit {
                launcher.launch(spec);
            }
            ServiceOutcome {
                name: spec.name().to_string(),
                desired: spec.desired_replicas(),
                observed: spec.observed_count(),
                launched: deficit,
            }
        })
        .collect();
    ReconcileReport { services }
}

/// Takes one snapshot from the registry and executes a pass against it.
pub async fn reconcile(
    registry: &RegistryClient,
    launcher: &dyn ProcessLauncher,
) -> Result<ReconcileReport, RegistryError> {
    let snapshot = registry.snapshot().await?;
    let report = execute(&snapshot, launcher);
    info!(
        services = report.services.len(),
        launched = report.total_launched(),
        "Reconciliation pass complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::MockLauncher;

    fn spec(name: &str, desired: u32, observed: u32) -> ServiceSpec {
        let mut spec = ServiceSpec::new(name, "/srv", "svc.js", desired);
        for _ in 0..observed {
            spec.increment_observed();
        }
        spec
    }

    #[test]
    fn test_launches_match_deficits() {
        let snapshot = vec![spec("pagedao", 3, 1), spec("userdao", 1, 2), spec("mailer", 2, 0)];
        let mock = MockLauncher::new();
        mock.expect_launch("pagedao").times(2);
        mock.expect_launch("userdao").never();
        mock.expect_launch("mailer").times(2);

        let report = execute(&snapshot, &mock);

        mock.verify();
        assert_eq!(report.launched("PageDAO"), 2);
        assert_eq!(report.launched("userdao"), 0);
        assert_eq!(report.total_launched(), 4);
        assert_eq!(
            report.services[1],
            ServiceOutcome {
                name: "userdao".to_string(),
                desired: 1,
                observed: 2,
                launched: 0,
            }
        );
    }

    #[test]
    fn test_empty_snapshot_launches_nothing() {
        let mock = MockLauncher::new();
        let report = execute(&[], &mock);
        assert_eq!(report, ReconcileReport::default());
        assert_eq!(mock.total_launches(), 0);
    }
}
