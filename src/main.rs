// MIT License - Copyright (c) 2026 Peter Wright
// Interactive security-panel shell

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

use panel_shell::verbosity::init_logging;
use panel_shell::{CommandShell, Console, ExitReason, HttpGateway, ShellConfig, run_session};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "panel-shell")]
#[command(about = "Interactive shell for a security-panel gateway")]
struct Cli {
    /// Base URL of the gateway API (e.g. http://192.168.0.50:8080/)
    api_url: String,

    /// URL of the gateway push channel (e.g. ws://192.168.0.50:8080/push)
    push_url: String,

    /// Start with debug logging enabled (toggle at runtime with `debug`)
    #[arg(long)]
    debug: bool,

    /// TCP connect timeout for API requests in milliseconds
    #[arg(long, default_value_t = 10_000)]
    connect_timeout_ms: u64,

    /// Base delay before reconnecting the push channel in milliseconds
    #[arg(long, default_value_t = 1_000)]
    reconnect_delay_ms: u64,

    /// Maximum push channel reconnect delay in milliseconds
    #[arg(long, default_value_t = 30_000)]
    max_reconnect_delay_ms: u64,
}

impl Cli {
    fn shell_config(&self) -> ShellConfig {
        ShellConfig::builder()
            .api_url(&self.api_url)
            .push_url(&self.push_url)
            .debug(self.debug)
            .connect_timeout_ms(self.connect_timeout_ms)
            .reconnect_delay_ms(self.reconnect_delay_ms)
            .max_reconnect_delay_ms(self.max_reconnect_delay_ms)
            .build()
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let code = runtime.block_on(run(cli.shell_config()));
    // The stdin reader sits in a blocking read that cannot be cancelled;
    // do not wait for it.
    runtime.shutdown_background();
    code
}

async fn run(config: ShellConfig) -> Result<ExitCode> {
    // RUST_LOG overrides the initial level (e.g. RUST_LOG=panel_shell=trace).
    let verbosity = init_logging(config.debug);

    let gateway = Arc::new(HttpGateway::new(&config).context("Invalid gateway configuration")?);
    let mut sigterm = signal(SignalKind::terminate())?;
    let shutdown = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    };

    println!("Connecting to {} ... type 'help' for a list of commands.", config.api_url);
    let mut console = Console::new(std::io::stdout());
    let input = BufReader::new(tokio::io::stdin());

    match run_session(gateway, CommandShell::new(verbosity), input, &mut console, shutdown).await {
        Ok(exit) => {
            if exit.reason == ExitReason::Interrupted {
                console.line("");
            }
            info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
        // diagnostic already printed by the sequencer
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
