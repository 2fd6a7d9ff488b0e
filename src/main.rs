//! # fleet-reconciler
//!
//! Loads `<config-root>/<env>.json`, listens for discovery events as JSON lines on stdin, and
//! after the warm-up delay launches whatever instances are missing. Runs until Ctrl-C.

use clap::Parser;
use fleet_reconciler::config::{ConfigDocument, ControllerSettings};
use fleet_reconciler::discovery::JsonLinesDiscovery;
use fleet_reconciler::launcher;
use fleet_reconciler::lifecycle::{setup_tracing, Controller};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Launches missing service instances after discovery warm-up")]
struct Args {
    /// Folder holding one `<env>.json` per environment
    #[arg(long, default_value = "config")]
    config_root: PathBuf,

    /// Environment name; selects the configuration file
    #[arg(long, default_value = "development")]
    env: String,

    /// Seconds to listen to discovery before the single reconciliation pass
    #[arg(long, default_value_t = 10)]
    warmup_secs: u64,
}

fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    let result = runtime.block_on(run(args));
    // A pending stdin read sits on a blocking thread that cannot be interrupted.
    runtime.shutdown_background();
    result
}

async fn run(args: Args) -> Result<(), String> {
    info!(root = %args.config_root.display(), env = %args.env, "Starting fleet reconciler");

    let document = ConfigDocument::load(&args.config_root, &args.env).map_err(|e| {
        error!(error = %e, "Cannot load configuration");
        e.to_string()
    })?;

    let settings =
        ControllerSettings::default().with_warmup(Duration::from_secs(args.warmup_secs));
    let mut controller = Controller::new(
        settings,
        launcher::for_host(),
        Box::new(JsonLinesDiscovery::stdin()),
    );
    controller.start(&document).await.map_err(|e| e.to_string())?;

    tokio::select! {
        report = controller.reconciled() => {
            match report {
                Ok(report) => info!(launched = report.total_launched(), "Reconciliation done, waiting for Ctrl-C"),
                Err(e) => error!(error = %e, "Reconciliation did not complete"),
            }
            wait_for_ctrl_c().await;
        }
        _ = wait_for_ctrl_c() => {}
    }

    controller.stop().await;
    info!("Fleet reconciler stopped");
    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for Ctrl-C");
    }
}
