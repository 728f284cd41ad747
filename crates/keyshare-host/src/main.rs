//! Keyshare host entry point.
//!
//! Wires the worker threads together and waits for shutdown.
//!
//! ```text
//! main()
//!  └─ load config, init logging
//!  └─ start workers
//!       ├─ HostReceiver   (keyshare-receiver thread, UDP)
//!       ├─ SessionWorker  (keyshare-session thread)
//!       └─ InputLoop      (keyshare-input thread, local hotkeys from stdin)
//!  └─ Ctrl-C handler + 100 ms shutdown watch
//! ```
//!
//! Exit status is non-zero only when startup fails (for example when the
//! listen address cannot be bound).

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use keyshare_core::capture::line_source::LineKeySource;
use keyshare_core::config::{load_or_default, DEFAULT_CONFIG_FILE};
use keyshare_core::{EventQueue, InputLoop, InputSettings, Role, RoleController};
use keyshare_host::application::manage_sessions::SessionManager;
use keyshare_host::application::process_messages::SessionWorker;
use keyshare_host::infrastructure::input_injection::platform_injector;
use keyshare_host::infrastructure::network::start_host_receiver;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keyshare host.
///
/// Receives key events from clients and injects each player's bound key.
#[derive(Debug, Parser)]
#[command(
    name = "keyshare-host",
    about = "Receives forwarded key events and injects each player's mapped key",
    version
)]
struct Cli {
    /// Path of the TOML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "KEYSHARE_CONFIG")]
    config: PathBuf,

    /// UDP address to listen on; overrides `network.bind_address`.
    #[arg(long, env = "KEYSHARE_BIND")]
    bind: Option<String>,

    /// Log level used when `RUST_LOG` is unset; overrides `log_level`.
    #[arg(long)]
    log_level: Option<String>,

    /// Do not read local key commands from stdin; stop with Ctrl-C instead.
    #[arg(long)]
    no_input: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut cfg, load_error) = load_or_default(&cli.config);
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    if let Some(bind) = cli.bind {
        cfg.network.bind_address = bind;
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

    let bindings = cfg.binding_table().context("invalid [keybinds] section")?;
    let bind_addr = cfg.network.bind_socket_addr().context("invalid bind address")?;
    let poll = cfg.network.poll_interval();

    // ── Shared state ──────────────────────────────────────────────────────────
    let controller = Arc::new(RoleController::new());
    let queue = Arc::new(EventQueue::new());
    controller.set_role(Role::Host)?;
    controller.set_tracking(false);

    info!("exit bind [{}]", cfg.keys.exit.to_uppercase());
    info!(
        "triggers [{}]: {}",
        cfg.keys.toggle_triggers.to_uppercase(),
        controller.triggers_enabled()
    );
    info!("{} player slot(s) available", bindings.capacity());

    // ── Workers ───────────────────────────────────────────────────────────────
    let (local_addr, receiver) =
        start_host_receiver(bind_addr, poll, Arc::clone(&queue), Arc::clone(&controller))
            .context("host startup failed")?;

    let manager = SessionManager::new(bindings, Arc::clone(&controller), platform_injector());
    let session = SessionWorker::new(
        manager,
        Arc::clone(&queue),
        Arc::clone(&controller),
        poll,
        cfg.network.role_poll_interval(),
    )
    .spawn()
    .context("failed to spawn session thread")?;

    // The input thread blocks on stdin and is never joined.
    if !cli.no_input {
        let source = LineKeySource::new(BufReader::new(std::io::stdin()));
        InputLoop::new(
            source,
            InputSettings::from_config(&cfg),
            Arc::clone(&controller),
            Arc::clone(&queue),
        )
        .spawn()
        .context("failed to spawn input thread")?;
    }

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

    info!("keyshare host ready on UDP {local_addr}");

    while controller.is_running() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let (receiver_result, session_result) =
        tokio::task::spawn_blocking(move || (receiver.join(), session.join()))
            .await
            .context("failed to join worker threads")?;
    if receiver_result.is_err() {
        error!("receiver thread panicked");
    }
    match session_result {
        Ok(manager) => debug!("{} player(s) connected at exit", manager.session_count()),
        Err(_) => error!("session thread panicked"),
    }

    info!("keyshare host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
