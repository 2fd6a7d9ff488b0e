//! # Service Registry
//!
//! The in-memory desired/observed state for every declared service. `Registry` is a plain owned
//! value with no interior locking: concurrent access goes through the
//! [`RegistryActor`](super::RegistryActor), which owns the only instance.

use crate::config::{ConfigDocument, ConfigurationError};
use crate::model::{normalize_name, ServiceSpec};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    services: HashMap<String, ServiceSpec>,
}

impl Registry {
    /// Builds a registry from a configuration document.
    ///
    /// Names are trimmed and lower-cased, `replicas` defaults to 1, and every observed count
    /// starts at 0. The load is all-or-nothing: the first invalid entry rejects the document.
    ///
    /// # Errors
    /// - [`ConfigurationError::MissingName`] if an entry has no name or a blank one
    /// - [`ConfigurationError::InvalidReplicas`] if `replicas` is 0
    /// - [`ConfigurationError::DuplicateName`] if two entries normalize to the same name
    pub fn load(document: &ConfigDocument) -> Result<Self, ConfigurationError> {
        let mut services = HashMap::with_capacity(document.services.len());

        for (index, entry) in document.services.iter().enumerate() {
            let name = entry
                .name
                .as_deref()
                .map(normalize_name)
                .filter(|name| !name.is_empty())
                .ok_or(ConfigurationError::MissingName { index })?;

            let replicas = entry.replicas.unwrap_or(1);
            if replicas == 0 {
                return Err(ConfigurationError::InvalidReplicas { name, replicas });
            }

            let mut spec = ServiceSpec::new(&name, &entry.path, entry.executable.clone(), replicas);
            if let Some(port) = entry.port {
                spec = spec.with_port(port);
            }
            if let Some(level) = &entry.loglevel {
                spec = spec.with_log_level(level.clone());
            }
            if let Some(variant) = &entry.implementation {
                spec = spec.with_implementation(variant.clone());
            }
            for (key, value) in entry.options_in_order() {
                spec = spec.with_option(key, value);
            }

            if services.insert(name.clone(), spec).is_some() {
                return Err(ConfigurationError::DuplicateName(name));
            }
        }

        info!(services = services.len(), "Registry loaded");
        Ok(Self { services })
    }

    /// Looks up a service; `name` is trimmed and case-folded first.
    pub fn get(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.get(&normalize_name(name))
    }

    /// Visits every service. Order is unspecified.
    pub fn for_each(&self, f: impl FnMut(&ServiceSpec)) {
        self.services.values().for_each(f);
    }

    /// Point-in-time copy of every service, sorted by name.
    pub fn snapshot(&self) -> Vec<ServiceSpec> {
        let mut specs: Vec<ServiceSpec> = self.services.values().cloned().collect();
        specs.sort_by(|a, b| a.name().cmp(b.name()));
        specs
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Records one more running instance. Unknown names are ignored.
    ///
    /// Returns the new observed count, or `None` if no service matched.
    pub fn increment_observed(&mut self, name: &str) -> Option<u32> {
        let Some(spec) = self.services.get_mut(&normalize_name(name)) else {
            debug!(service = name, "Ignoring unmanaged product");
            return None;
        };
        let observed = spec.increment_observed();
        debug!(service = spec.name(), observed, "Observed +1");
        Some(observed)
    }

    /// Records one fewer running instance. Unknown names are ignored.
    ///
    /// The count is clamped at zero; a decrement at zero means discovery reported an instance
    /// leaving that it never reported arriving, and is logged as a warning.
    ///
    /// Returns the new observed count, or `None` if nothing changed.
    pub fn decrement_observed(&mut self, name: &str) -> Option<u32> {
        let Some(spec) = self.services.get_mut(&normalize_name(name)) else {
            debug!(service = name, "Ignoring unmanaged product");
            return None;
        };
        match spec.decrement_observed() {
            Some(observed) => {
                debug!(service = spec.name(), observed, "Observed -1");
                Some(observed)
            }
            None => {
                warn!(
                    service = spec.name(),
                    "Disappeared event with no running instance, count stays at 0"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEntry;

    fn document(entries: Vec<ServiceEntry>) -> ConfigDocument {
        ConfigDocument { services: entries }
    }

    #[test]
    fn test_replicas_default_to_one() {
        let registry = Registry::load(&document(vec![ServiceEntry::named("pagedao")])).unwrap();
        let spec = registry.get("pagedao").unwrap();
        assert_eq!(spec.desired_replicas(), 1);
        assert_eq!(spec.observed_count(), 0);
    }

    #[test]
    fn test_names_are_case_folded() {
        let mut registry = Registry::load(&document(vec![ServiceEntry::named("UserDAO")])).unwrap();
        assert!(registry.get("userdao").is_some());
        assert!(registry.get("  USERDAO ").is_some());

        assert_eq!(registry.increment_observed("UserDAO"), Some(1));
        assert_eq!(registry.get("userdao").unwrap().observed_count(), 1);
    }

    #[test]
    fn test_empty_name_rejects_whole_document() {
        let result = Registry::load(&document(vec![
            ServiceEntry::named("pagedao"),
            ServiceEntry::named("   "),
        ]));
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingName { index: 1 })
        ));
    }

    #[test]
    fn test_missing_name_rejects_whole_document() {
        let result = Registry::load(&document(vec![ServiceEntry::default()]));
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingName { index: 0 })
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = Registry::load(&document(vec![
            ServiceEntry::named("PageDAO"),
            ServiceEntry::named("pagedao"),
        ]));
        assert!(matches!(result, Err(ConfigurationError::DuplicateName(name)) if name == "pagedao"));
    }

    #[test]
    fn test_zero_replicas_are_rejected() {
        let entry = ServiceEntry {
            replicas: Some(0),
            ..ServiceEntry::named("pagedao")
        };
        let result = Registry::load(&document(vec![entry]));
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidReplicas { replicas: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let mut registry = Registry::load(&document(vec![ServiceEntry::named("pagedao")])).unwrap();
        assert_eq!(registry.increment_observed("mailer"), None);
        assert_eq!(registry.decrement_observed("mailer"), None);
        assert_eq!(registry.get("pagedao").unwrap().observed_count(), 0);
    }

    #[test]
    fn test_decrement_is_clamped_at_zero() {
        let mut registry = Registry::load(&document(vec![ServiceEntry::named("pagedao")])).unwrap();
        registry.increment_observed("pagedao");
        assert_eq!(registry.decrement_observed("pagedao"), Some(0));
        assert_eq!(registry.decrement_observed("pagedao"), None);
        assert_eq!(registry.get("pagedao").unwrap().observed_count(), 0);
    }

    #[test]
    fn test_entry_fields_are_carried_over() {
        let entry: ServiceEntry = serde_json::from_str(
            r#"{"name":"PageDAO","path":"/srv/dao","executable":"page.js","port":8100,
                "loglevel":"debug","implementation":"sql","replicas":3,
                "options":{"loglevel":"info","implementation":"mock"}}"#,
        )
        .unwrap();
        let registry = Registry::load(&document(vec![entry])).unwrap();
        let spec = registry.get("pagedao").unwrap();
        assert_eq!(spec.desired_replicas(), 3);
        assert_eq!(spec.port(), Some(8100));
        assert_eq!(spec.log_level(), Some("debug"));
        assert_eq!(spec.implementation(), Some("sql"));
        assert_eq!(
            spec.options(),
            &[
                ("loglevel".to_string(), "info".to_string()),
                ("implementation".to_string(), "mock".to_string()),
            ]
        );
    }

    #[test]
    fn test_snapshot_and_for_each_cover_all_services() {
        let registry = Registry::load(&document(vec![
            ServiceEntry::named("userdao"),
            ServiceEntry::named("pagedao"),
        ]))
        .unwrap();
        let names: Vec<String> = registry.snapshot().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["pagedao", "userdao"]);

        let mut visited = 0;
        registry.for_each(|_| visited += 1);
        assert_eq!(visited, 2);
        assert_eq!(registry.len(), 2);
    }
}
