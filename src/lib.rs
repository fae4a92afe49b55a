// MIT License - Copyright (c) 2026 Peter Wright
// Interactive security-panel shell
//
//! # panel-shell
//!
//! Interactive terminal shell for a security-panel gateway: inspect areas and
//! zones, arm and disarm areas, and watch state changes pushed by the gateway.
//!
//! Everything runs on one cooperative loop. Operator input, mode change
//! completions and pushed updates are interleaved between suspension points,
//! so the in-memory [`StateCache`] needs no locks: pushed updates are the only
//! writer and commands only read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use panel_shell::{CommandShell, Console, HttpGateway, ShellConfig, Verbosity, run_session};
//! use tokio::io::BufReader;
//! use tracing::level_filters::LevelFilter;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ShellConfig::builder()
//!         .api_url("http://192.168.0.50:8080/")
//!         .push_url("ws://192.168.0.50:8080/push")
//!         .build();
//!
//!     let gateway = Arc::new(HttpGateway::new(&config)?);
//!     let shell = CommandShell::new(Verbosity::detached(LevelFilter::INFO));
//!     let mut console = Console::new(std::io::stdout());
//!     let input = BufReader::new(tokio::io::stdin());
//!     let shutdown = async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     };
//!
//!     run_session(gateway, shell, input, &mut console, shutdown).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod console;
pub mod devices;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gateway;
pub mod notifier;
pub mod session;
pub mod shell;
pub mod verbosity;

// Re-exports for convenience
pub use cache::{StateCache, UpdateOutcome};
pub use config::{ShellConfig, ShellConfigBuilder};
pub use console::Console;
pub use devices::{Area, Mode, PanelInfo, Zone, ZoneStatus};
pub use dispatcher::{ModeChangeDispatcher, ModeChangeOutcome};
pub use error::{GatewayError, Result};
pub use event::{EntityUpdate, Snapshot, UpdateReceiver, UpdateSender, ZoneUpdate};
pub use gateway::{Gateway, HttpGateway};
pub use notifier::UpdateNotifier;
pub use session::{ExitReason, Sequencer, SessionState, ShellExit, StartupError, run_session};
pub use shell::CommandShell;
pub use verbosity::Verbosity;
