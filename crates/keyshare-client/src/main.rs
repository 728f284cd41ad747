//! Keyshare client entry point.
//!
//! ```text
//! main()
//!  └─ load config, init logging
//!  └─ start workers
//!       ├─ InputLoop     (keyshare-input thread, key commands from stdin)
//!       └─ ClientSender  (keyshare-sender thread, UDP to the host)
//!  └─ Ctrl-C handler + 100 ms shutdown watch
//! ```
//!
//! Tracking starts disabled; press the tracking key (default `F3`) to begin
//! forwarding.

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use keyshare_client::application::forward_events::{ClientSender, SenderTimings};
use keyshare_client::infrastructure::network::UdpSink;
use keyshare_core::capture::line_source::LineKeySource;
use keyshare_core::config::{load_or_default, DEFAULT_CONFIG_FILE};
use keyshare_core::{EventQueue, InputLoop, InputSettings, Role, RoleController};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keyshare client.
///
/// Forwards tracked key presses to the host.
#[derive(Debug, Parser)]
#[command(
    name = "keyshare-client",
    about = "Captures tracked key presses and forwards them to a keyshare host",
    version
)]
struct Cli {
    /// Path of the TOML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "KEYSHARE_CONFIG")]
    config: PathBuf,

    /// Host address (`ip:port`); overrides `network.host_address`.
    #[arg(long, env = "KEYSHARE_HOST")]
    host: Option<String>,

    /// Log level used when `RUST_LOG` is unset; overrides `log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut cfg, load_error) = load_or_default(&cli.config);
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    if let Some(host) = cli.host {
        cfg.network.host_address = host;
    }

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    if let Some(e) = load_error {
        error!("unable to load config {}: {e}; using defaults", cli.config.display());
    }
    debug!("loaded config: {cfg:?}");

    let host_addr = cfg.network.host_socket_addr().context("invalid host address")?;
    let sink = UdpSink::connect(host_addr).context("client startup failed")?;

    // ── Shared state ──────────────────────────────────────────────────────────
    let controller = Arc::new(RoleController::new());
    let queue = Arc::new(EventQueue::new());
    controller.set_role(Role::Client)?;

    info!("exit bind [{}]", cfg.keys.exit.to_uppercase());
    info!(
        "tracking [{}]: {}",
        cfg.keys.toggle_tracking.to_uppercase(),
        controller.is_tracking()
    );

    // ── Workers ───────────────────────────────────────────────────────────────
    let timings = SenderTimings {
        poll: cfg.network.poll_interval(),
        disconnect_grace: cfg.network.disconnect_grace(),
        role_poll: cfg.network.role_poll_interval(),
    };
    let sender = ClientSender::new(sink, Arc::clone(&queue), Arc::clone(&controller), timings)
        .spawn()
        .context("failed to spawn sender thread")?;

    // The input thread blocks on stdin and is never joined.
    let source = LineKeySource::new(BufReader::new(std::io::stdin()));
    InputLoop::new(
        source,
        InputSettings::from_config(&cfg),
        Arc::clone(&controller),
        Arc::clone(&queue),
    )
    .spawn()
    .context("failed to spawn input thread")?;

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let signal_controller = Arc::clone(&controller);
    let signal_queue = Arc::clone(&queue);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                signal_controller.trigger_exit(&signal_queue);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    info!("keyshare client ready, sending to {host_addr}");

    while controller.is_running() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    // Joining also waits out the disconnect grace period.
    match tokio::task::spawn_blocking(move || sender.join())
        .await
        .context("failed to join sender thread")?
    {
        Ok(sent) => debug!("{sent} datagram(s) sent"),
        Err(_) => error!("sender thread panicked"),
    }

    info!("keyshare client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
