//! Readiness polling against the health endpoint.

use std::{sync::Arc, time::Duration};

use shared::domain::{Readiness, TriggerState};
use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::controller::ClientController;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub readiness: Readiness,
    /// Retries scheduled after a "still loading" answer.
    pub retries: u32,
    pub cancelled: bool,
}

pub struct ReadinessPollHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<PollOutcome>,
}

impl ReadinessPollHandle {
    /// Stops a pending retry; an in-flight check still settles.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) -> Result<PollOutcome, JoinError> {
        self.task.await
    }
}

impl ClientController {
    /// Wraps the controller, shows the initial state and starts polling.
    pub fn launch(self) -> (Arc<Self>, ReadinessPollHandle) {
        let controller = Arc::new(self);
        controller.view.set_trigger(TriggerState::DisabledIncomplete);
        controller.view.set_status(Readiness::Unknown);

        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.poll_readiness(cancel_rx).await }
        });
        (controller, ReadinessPollHandle { cancel, task })
    }

    /// One health check. `Ready` and `Error` are sticky, so a late answer
    /// cannot move the status out of them.
    pub async fn check_readiness(&self) -> Readiness {
        let observed = match self.api().check_health().await {
            Ok(health) if health.models_loaded => {
                info!("models loaded; service ready");
                Readiness::Ready
            }
            Ok(health) => {
                info!(
                    message = health.message.as_deref().unwrap_or_default(),
                    "models still loading"
                );
                Readiness::Loading
            }
            Err(err) => {
                warn!(error = %err, "readiness check failed");
                Readiness::Error
            }
        };

        let readiness = {
            let mut state = self.state();
            state.readiness = state.readiness.advance(observed);
            state.readiness
        };
        self.view.set_status(readiness);
        readiness
    }

    /// Checks until the service is ready or unreachable, waiting
    /// `poll_interval` between "loading" answers. Transport errors end the
    /// loop without a retry.
    pub async fn poll_readiness(&self, mut cancel: watch::Receiver<bool>) -> PollOutcome {
        let mut retries = 0;
        loop {
            if *cancel.borrow() {
                return self.poll_outcome(retries, true);
            }
            let readiness = self.check_readiness().await;
            if readiness.is_terminal() {
                return self.poll_outcome(retries, false);
            }

            retries += 1;
            debug!(
                retries,
                delay_ms = self.poll_interval.as_millis() as u64,
                "scheduling readiness retry"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = cancelled(&mut cancel) => return self.poll_outcome(retries, true),
            }

            // A manual check may have settled the status while we slept.
            if self.readiness().is_terminal() {
                return self.poll_outcome(retries, false);
            }
        }
    }

    fn poll_outcome(&self, retries: u32, cancelled: bool) -> PollOutcome {
        PollOutcome {
            readiness: self.readiness(),
            retries,
            cancelled,
        }
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let closed = cancel.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        // Handle dropped: nobody can cancel any more.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "tests/readiness_tests.rs"]
mod tests;
