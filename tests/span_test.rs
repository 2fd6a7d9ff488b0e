//! Span hierarchy emitted by one controller run.
//!
//! Kept in its own test binary: the subscriber is installed per thread and must not share the
//! process with other tests.

use fleet_reconciler::config::{ConfigDocument, ControllerSettings, ServiceEntry};
use fleet_reconciler::discovery::ChannelDiscovery;
use fleet_reconciler::launcher::MockLauncher;
use fleet_reconciler::lifecycle::Controller;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::span;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct SpanNames(Arc<Mutex<Vec<String>>>);

impl SpanNames {
    fn contains(&self, name: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|recorded| recorded == name)
    }
}

impl<S: Subscriber> Layer<S> for SpanNames {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(attrs.metadata().name().to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn test_controller_run_is_traced_in_spans() {
    let names = SpanNames::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(names.clone()));

    let launcher = MockLauncher::new();
    let (source, feed) = ChannelDiscovery::new();
    let settings = ControllerSettings::default().with_warmup(Duration::from_secs(10));
    let mut controller = Controller::new(settings, Arc::new(launcher.clone()), Box::new(source));

    controller
        .start(&ConfigDocument {
            services: vec![ServiceEntry::named("pagedao")],
        })
        .await
        .expect("start");
    assert!(feed.appeared(["pagedao"]).await);
    controller.reconciled().await.expect("pass");
    controller.stop().await;

    for expected in [
        "registry_actor",
        "discovery_forward",
        "reconciliation",
        "increment_observed",
        "snapshot",
    ] {
        assert!(names.contains(expected), "no `{expected}` span recorded");
    }
}
