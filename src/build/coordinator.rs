//! Single-flight build scheduling.
//!
//! One worker task owns the pipeline. Triggers go through a channel with a
//! single slot: a trigger during a build queues exactly one follow-up, and
//! triggers while that slot is full are folded into it.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

use super::{BuildReport, Pipeline};

#[derive(Debug, Clone, Default)]
pub struct BuildStatus {
    /// Builds finished, successful or not.
    pub completed: u64,
    pub failed: u64,
    pub running: bool,
    pub last_report: Option<BuildReport>,
    pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct BuildCoordinator {
    trigger_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<BuildStatus>,
}

impl BuildCoordinator {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(pipeline: Arc<Pipeline>) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(BuildStatus::default());
        tokio::spawn(run_worker(pipeline, trigger_rx, status_tx));
        Self {
            trigger_tx,
            status_rx,
        }
    }

    /// Request a build. Returns `false` when the request was folded into one
    /// already queued.
    pub fn trigger(&self) -> bool {
        match self.trigger_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("build already queued");
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                error!("build worker has stopped");
                false
            }
        }
    }

    pub fn status(&self) -> BuildStatus {
        self.status_rx.borrow().clone()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<BuildStatus> {
        self.status_rx.clone()
    }

    /// Wait until at least `completed` builds have finished.
    #[cfg(test)]
    pub async fn wait_for(&self, completed: u64) -> BuildStatus {
        let mut rx = self.subscribe();
        let status = match rx.wait_for(|s| s.completed >= completed).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }
}

async fn run_worker(
    pipeline: Arc<Pipeline>,
    mut trigger_rx: mpsc::Receiver<()>,
    status_tx: watch::Sender<BuildStatus>,
) {
    while trigger_rx.recv().await.is_some() {
        status_tx.send_modify(|s| s.running = true);

        let p = pipeline.clone();
        let outcome = tokio::task::spawn_blocking(move || p.run()).await;

        status_tx.send_modify(|s| {
            s.running = false;
            s.completed += 1;
            match outcome {
                Ok(Ok(report)) => {
                    s.last_report = Some(report);
                    s.last_error = None;
                }
                Ok(Err(e)) => {
                    let message = e.chain();
                    error!(error = %message, "build failed");
                    s.failed += 1;
                    s.last_error = Some(message);
                }
                Err(e) => {
                    error!(error = %e, "build task panicked");
                    s.failed += 1;
                    s.last_error = Some(e.to_string());
                }
            }
        });
    }
}
