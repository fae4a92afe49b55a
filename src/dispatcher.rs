// MIT License - Copyright (c) 2026 Peter Wright
// Fire-and-forget mode change requests

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};
use tracing::{debug, info};

use crate::console::Console;
use crate::devices::Mode;
use crate::error::GatewayError;
use crate::gateway::Gateway;

/// Result of one mode change request, consumed only by [`ModeChangeDispatcher::report`].
#[derive(Debug)]
pub struct ModeChangeOutcome {
    pub area_id: String,
    pub mode: Mode,
    pub result: Result<(), ModeChangeError>,
}

/// Why a mode change did not go through.
#[derive(Debug, thiserror::Error)]
pub enum ModeChangeError {
    /// The gateway call returned an error
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// The unit of work itself died (panicked or was cancelled)
    #[error("request aborted: {0}")]
    Task(String),
}

/// Schedules mode changes as independent tasks on the current runtime.
///
/// Callers never wait on a request. Completions are collected through
/// [`ModeChangeDispatcher::next_completion`], which the shell loop polls
/// alongside input and pushed updates. A failure is turned into an outcome
/// value and reported once; nothing is retried and nothing is re-raised.
pub struct ModeChangeDispatcher {
    gateway: Arc<dyn Gateway>,
    pending: JoinSet<ModeChangeOutcome>,
    targets: HashMap<Id, (String, Mode)>,
}

impl ModeChangeDispatcher {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            pending: JoinSet::new(),
            targets: HashMap::new(),
        }
    }

    /// Schedule a mode change and return immediately.
    pub fn request(&mut self, area_id: &str, mode: Mode) {
        info!(area_id, %mode, "Requesting mode change");
        let gateway = Arc::clone(&self.gateway);
        let target = area_id.to_owned();
        let area_id = target.clone();
        let handle = self.pending.spawn(async move {
            let result = gateway
                .change_mode(&area_id, mode)
                .await
                .map_err(ModeChangeError::from);
            ModeChangeOutcome {
                area_id,
                mode,
                result,
            }
        });
        self.targets.insert(handle.id(), (target, mode));
    }

    /// Number of requests still in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Wait for the next request to finish.
    ///
    /// Returns `None` immediately when nothing is in flight, so a select
    /// branch on this simply stays disabled while idle.
    pub async fn next_completion(&mut self) -> Option<ModeChangeOutcome> {
        match self.pending.join_next_with_id().await? {
            Ok((id, outcome)) => {
                self.targets.remove(&id);
                Some(outcome)
            }
            Err(e) => {
                let (area_id, mode) = self.targets.remove(&e.id()).unwrap_or_default();
                Some(ModeChangeOutcome {
                    area_id,
                    mode,
                    result: Err(ModeChangeError::Task(e.to_string())),
                })
            }
        }
    }

    /// Print a diagnostic for a failed request. Successful requests print
    /// nothing: the confirmed mode arrives as a pushed update.
    pub fn report<W: Write>(outcome: &ModeChangeOutcome, console: &mut Console<W>) {
        match &outcome.result {
            Ok(()) => {
                debug!(area_id = %outcome.area_id, mode = %outcome.mode, "Mode change accepted");
            }
            Err(e) if outcome.area_id.is_empty() => {
                console.line(format_args!("Mode change request failed: {e}"));
            }
            Err(e) => {
                console.line(format_args!(
                    "Failed to set area {} to {}: {e}",
                    outcome.area_id, outcome.mode
                ));
            }
        }
    }

    /// Drop every request still in flight.
    pub fn abort_all(&mut self) {
        for (area_id, mode) in self.pending_targets() {
            debug!(area_id, %mode, "Abandoning in-flight mode change");
        }
        self.pending.abort_all();
    }

    fn pending_targets(&self) -> impl Iterator<Item = (&str, Mode)> {
        self.targets.values().map(|(area_id, mode)| (area_id.as_str(), *mode))
    }
}
