//! # Mock Launcher
//!
//! A [`ProcessLauncher`] that records launch requests instead of creating processes, so
//! reconciliation can be tested deterministically.
//!
//! ```rust
//! use fleet_reconciler::launcher::{MockLauncher, ProcessLauncher};
//! use fleet_reconciler::model::ServiceSpec;
//!
//! let mock = MockLauncher::new();
//! mock.expect_launch("pagedao").times(2);
//! mock.expect_launch("userdao").never();
//!
//! let spec = ServiceSpec::new("PageDAO", "/srv", "page.js", 3);
//! mock.launch(&spec);
//! mock.launch(&spec);
//!
//! assert_eq!(mock.launch_count("pagedao"), 2);
//! mock.verify();
//! ```

use super::ProcessLauncher;
use crate::model::{normalize_name, ServiceSpec};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct State {
    launches: Vec<ServiceSpec>,
    expectations: Vec<(String, usize)>,
}

/// Cloning shares the same record, so a test can keep one clone and hand another to the
/// controller.
#[derive(Clone, Default)]
pub struct MockLauncher {
    state: Arc<Mutex<State>>,
}

/// Builder returned by [`MockLauncher::expect_launch`].
pub struct LaunchExpectationBuilder {
    name: String,
    state: Arc<Mutex<State>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_launch(&self, name: &str) -> LaunchExpectationBuilder {
        LaunchExpectationBuilder {
            name: normalize_name(name),
            state: self.state.clone(),
        }
    }

    /// Every launched spec, in call order.
    pub fn launches(&self) -> Vec<ServiceSpec> {
        self.lock().launches.clone()
    }

    pub fn launch_count(&self, name: &str) -> usize {
        let name = normalize_name(name);
        self.lock()
            .launches
            .iter()
            .filter(|spec| spec.name() == name)
            .count()
    }

    pub fn total_launches(&self) -> usize {
        self.lock().launches.len()
    }

    /// Asserts every expectation was met exactly.
    ///
    /// # Panics
    /// If a service was launched a different number of times than expected.
    pub fn verify(&self) {
        let expectations = self.lock().expectations.clone();
        for (name, times) in expectations {
            let actual = self.launch_count(&name);
            assert_eq!(
                actual, times,
                "expected {times} launch(es) of {name}, got {actual}"
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LaunchExpectationBuilder {
    pub fn times(self, times: usize) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .expectations
            .push((self.name, times));
    }

    pub fn never(self) {
        self.times(0);
    }
}

impl ProcessLauncher for MockLauncher {
    fn launch(&self, spec: &ServiceSpec) {
        self.lock().launches.push(spec.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "expected 1 launch(es) of pagedao, got 0")]
    fn test_verify_reports_missing_launch() {
        let mock = MockLauncher::new();
        mock.expect_launch("PageDAO").times(1);
        mock.verify();
    }

    #[test]
    fn test_clones_share_record() {
        let mock = MockLauncher::new();
        let handed_out = mock.clone();
        handed_out.launch(&ServiceSpec::new("userdao", "", "user.js", 1));
        assert_eq!(mock.total_launches(), 1);
        assert_eq!(mock.launches()[0].name(), "userdao");
    }
}
