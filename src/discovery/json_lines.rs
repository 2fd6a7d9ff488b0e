//! Discovery events read as newline-delimited JSON from any async reader.
//!
//! Each line is one [`DiscoveryEvent`]:
//!
//! ```text
//! {"kind":"appeared","producedNames":["UserDAO","PageDAO"]}
//! {"kind":"disappeared","producedNames":["PageDAO"]}
//! ```
//!
//! Blank lines are skipped; malformed lines are logged and skipped.

use super::{DiscoveryError, DiscoverySource};
use crate::model::DiscoveryEvent;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct JsonLinesDiscovery<R> {
    reader: Option<R>,
    running: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl<R> JsonLinesDiscovery<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            running: None,
        }
    }
}

impl JsonLinesDiscovery<tokio::io::BufReader<tokio::io::Stdin>> {
    /// Reads events from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> DiscoverySource for JsonLinesDiscovery<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn start(
        &mut self,
        buffer_size: usize,
    ) -> Result<mpsc::Receiver<DiscoveryEvent>, DiscoveryError> {
        let reader = self.reader.take().ok_or(DiscoveryError::AlreadyStarted)?;
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(read_events(reader, sender, shutdown_rx));
        self.running = Some((shutdown, handle));
        info!("JSON lines discovery started");
        Ok(receiver)
    }

    async fn stop(&mut self) {
        if let Some((shutdown, handle)) = self.running.take() {
            let _ = shutdown.send(());
            let _ = handle.await;
            info!("JSON lines discovery stopped");
        }
    }
}

async fn read_events<R>(
    reader: R,
    sender: mpsc::Sender<DiscoveryEvent>,
    mut shutdown: oneshot::Receiver<()>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Discovery input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Discovery input failed");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<DiscoveryEvent>(line) {
            Ok(event) => {
                if sender.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, line, "Skipping malformed discovery line"),
        }
    }
}
