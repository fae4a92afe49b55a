// MIT License - Copyright (c) 2026 Peter Wright
// Startup sequencing and the shell loop

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::cache::StateCache;
use crate::console::Console;
use crate::dispatcher::ModeChangeDispatcher;
use crate::error::GatewayError;
use crate::event::update_channel;
use crate::gateway::Gateway;
use crate::notifier::UpdateNotifier;
use crate::shell::{CommandShell, ShellContext};

/// Lifecycle of a shell session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Loaded,
    Running,
    /// Startup failed; the shell never ran
    Aborted,
    /// Shut down after running
    Stopped,
}

/// Fatal errors before the shell loop starts.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to open gateway session: {0}")]
    Connect(#[source] GatewayError),

    #[error("Failed to load panel state: {0}")]
    BulkLoad(#[source] GatewayError),
}

/// Why the shell loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Operator interrupt (Ctrl-C, SIGTERM)
    Interrupted,
    /// Input closed and no request left in flight
    EndOfInput,
}

/// Final state handed back after a clean shutdown.
#[derive(Debug)]
pub struct ShellExit {
    pub reason: ExitReason,
    pub cache: StateCache,
}

/// Releases the gateway session exactly once.
pub struct SessionGuard {
    gateway: Arc<dyn Gateway>,
    released: bool,
}

impl SessionGuard {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            released: false,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub async fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.gateway.close_session().await {
            warn!("Error closing gateway session: {e}");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!("Gateway session dropped without being closed");
        }
    }
}

/// Drives a session through `Idle → Connecting → Loaded → Running`.
pub struct Sequencer {
    state: SessionState,
    guard: SessionGuard,
}

impl Sequencer {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            state: SessionState::Idle,
            guard: SessionGuard::new(gateway),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state change");
        self.state = next;
    }

    /// Open the session and perform the one bulk load.
    ///
    /// On failure the session is released, the state becomes `Aborted` and a
    /// diagnostic is printed.
    pub async fn start<W: Write>(
        &mut self,
        console: &mut Console<W>,
    ) -> Result<StateCache, StartupError> {
        self.transition(SessionState::Connecting);
        if let Err(e) = self.guard.gateway().open_session().await {
            return Err(self.abort(StartupError::Connect(e), console).await);
        }

        let snapshot = match self.guard.gateway().bulk_load().await {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.abort(StartupError::BulkLoad(e), console).await),
        };

        let cache = StateCache::from_snapshot(snapshot);
        info!(areas = cache.len(), "Panel state loaded");
        self.transition(SessionState::Loaded);
        Ok(cache)
    }

    async fn abort<W: Write>(&mut self, err: StartupError, console: &mut Console<W>) -> StartupError {
        error!("{err}");
        console.line(&err);
        self.transition(SessionState::Aborted);
        self.guard.release().await;
        err
    }

    /// Release the session after an interrupt that arrived before the shell
    /// loop started.
    pub async fn interrupt_startup(&mut self) -> ShellExit {
        info!(state = ?self.state, "Interrupted during startup");
        self.guard.release().await;
        self.transition(SessionState::Stopped);
        ShellExit {
            reason: ExitReason::Interrupted,
            cache: StateCache::new(),
        }
    }

    /// Run the shell until interrupt or end of input, then release the
    /// session.
    ///
    /// Input lines, mode change completions and pushed updates are all
    /// serviced from this one loop. Each branch runs to completion before the
    /// next is polled, so the cache is never observed mid-update.
    pub async fn run<R, W, S>(
        &mut self,
        mut cache: StateCache,
        mut shell: CommandShell,
        input: R,
        console: &mut Console<W>,
        shutdown: S,
    ) -> ShellExit
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        S: Future<Output = ()>,
    {
        let gateway = Arc::clone(self.guard.gateway());
        let mut dispatcher = ModeChangeDispatcher::new(Arc::clone(&gateway));
        let mut notifier = UpdateNotifier::new();
        tokio::pin!(shutdown);

        let reason = 'session: {
            let (update_tx, mut updates) = update_channel();
            let subscribed = tokio::select! {
                biased;
                () = &mut shutdown => break 'session ExitReason::Interrupted,
                result = gateway.subscribe(update_tx) => result,
            };
            if let Err(e) = subscribed {
                warn!("Push subscription failed: {e}");
                console.line(format_args!("Push updates unavailable: {e}"));
            }

            let mut lines = input.lines();
            let mut input_open = true;
            self.transition(SessionState::Running);
            console.prompt();

            loop {
                if !input_open && dispatcher.in_flight() == 0 {
                    break ExitReason::EndOfInput;
                }

                tokio::select! {
                    biased;
                    () = &mut shutdown => break ExitReason::Interrupted,
                    Some(update) = updates.recv() => {
                        notifier.apply(update, &mut cache, console);
                        console.prompt();
                    }
                    Some(outcome) = dispatcher.next_completion() => {
                        let failed = outcome.result.is_err();
                        ModeChangeDispatcher::report(&outcome, console);
                        if failed {
                            console.prompt();
                        }
                    }
                    line = lines.next_line(), if input_open => match line {
                        Ok(Some(line)) => {
                            let mut ctx = ShellContext {
                                cache: &cache,
                                dispatcher: &mut dispatcher,
                                console: &mut *console,
                            };
                            shell.dispatch(&line, &mut ctx);
                            console.prompt();
                        }
                        Ok(None) => {
                            debug!("Input closed");
                            input_open = false;
                        }
                        Err(e) => {
                            warn!("Failed to read input: {e}");
                            input_open = false;
                        }
                    },
                }
            }
        };

        info!(?reason, updates = notifier.applied(), "Shell stopping");
        dispatcher.abort_all();
        self.guard.release().await;
        self.transition(SessionState::Stopped);
        ShellExit { reason, cache }
    }
}

/// Full session: startup, then the shell loop.
///
/// `shutdown` is watched from the first gateway call on, so an interrupt
/// during startup still releases the session.
pub async fn run_session<R, W, S>(
    gateway: Arc<dyn Gateway>,
    shell: CommandShell,
    input: R,
    console: &mut Console<W>,
    shutdown: S,
) -> Result<ShellExit, StartupError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut sequencer = Sequencer::new(gateway);
    let cache = tokio::select! {
        biased;
        () = &mut shutdown => return Ok(sequencer.interrupt_startup().await),
        started = sequencer.start(&mut *console) => started?,
    };
    Ok(sequencer.run(cache, shell, input, console, shutdown).await)
}
