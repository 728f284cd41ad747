//! SessionManager: binds sender addresses to player slots and injects the
//! key each player's binding maps to.
//!
//! Every client sends the same raw key names.  The host tells players apart
//! by the datagram's source address:
//!
//! ```text
//! 10.0.0.5:51000  key_press|x   ─► player 0  x -> s  ─► inject (s, press)
//! 10.0.0.6:49152  key_press|x   ─► player 1  x -> k  ─► inject (k, press)
//! 10.0.0.5:51000  disconnect    ─► player 0 removed
//! ```
//!
//! # Slot allocation
//!
//! A previously unseen sender is given the slot number equal to the number of
//! live sessions, as long as that number is below the binding table's
//! capacity.  A disconnect frees a slot for the very next new sender, which
//! means a numeric id can be handed to a different address than before.
//!
//! # Threading
//!
//! The session table is mutated only from the session worker thread, so it
//! needs no lock.  The triggers flag is read from the shared
//! [`RoleController`] on every key message.
//!
//! # Errors
//!
//! Per-message failures ([`SessionError`]) never stop the worker; the
//! datagram-level entry point [`SessionManager::process_datagram`] logs them
//! and moves on.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use keyshare_core::{
    decode_datagram, InjectionError, KeyAction, KeyBindingTable, KeyInjector, ProtocolError,
    RoleController, WireMessage,
};
use thiserror::Error;
use tracing::{error, info, warn};

/// Per-message failure, logged and otherwise ignored.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A new sender arrived while every slot is taken.
    #[error("new player attempted to connect but game full {current}/{max} {sender}")]
    CapacityExceeded {
        current: usize,
        max: usize,
        sender: SocketAddr,
    },

    /// The player has no binding for the received key.
    #[error("player control mapping doesn't exist {sender} -> {key}")]
    UnmappedBinding {
        player: usize,
        key: String,
        sender: SocketAddr,
    },

    /// The injector refused the mapped key.
    #[error("failed to inject {key}: {source}")]
    Injection {
        key: String,
        #[source]
        source: InjectionError,
    },

    /// The datagram is not valid UTF-8.
    #[error("undecodable datagram from {sender}: {source}")]
    Decode {
        sender: SocketAddr,
        #[source]
        source: ProtocolError,
    },
}

/// What handling one message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The mapped key was injected.
    Injected {
        player: usize,
        key: String,
        action: KeyAction,
    },
    /// The key is mapped but triggers are disabled.
    Suppressed { player: usize },
    /// The sender's session was removed.
    Disconnected { player: usize },
    /// A disconnect from an address without a session.
    Ignored,
    /// An unrecognized message type, logged as an echo.
    Echo,
}

/// Host-side session table and key dispatcher.
pub struct SessionManager {
    sessions: HashMap<SocketAddr, usize>,
    bindings: KeyBindingTable,
    controller: Arc<RoleController>,
    injector: Arc<dyn KeyInjector>,
}

impl SessionManager {
    pub fn new(
        bindings: KeyBindingTable,
        controller: Arc<RoleController>,
        injector: Arc<dyn KeyInjector>,
    ) -> Self {
        Self {
            sessions: HashMap::new(),
            bindings,
            controller,
            injector,
        }
    }

    /// Decodes one datagram and handles it, logging any failure.
    pub fn process_datagram(&mut self, bytes: &[u8], sender: SocketAddr) -> Option<SessionOutcome> {
        let result = decode_datagram(bytes)
            .map_err(|source| SessionError::Decode { sender, source })
            .and_then(|msg| self.handle(msg, sender));

        match result {
            Ok(outcome) => Some(outcome),
            Err(e @ SessionError::Decode { .. }) => {
                warn!("{e}");
                None
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    /// Applies one decoded message from `sender`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::CapacityExceeded`] – unknown sender and no free slot;
    ///   no session is created.
    /// - [`SessionError::UnmappedBinding`] – the player has no binding for the
    ///   key; the session is kept.
    /// - [`SessionError::Injection`] – the injector failed.
    pub fn handle(&mut self, msg: WireMessage, sender: SocketAddr) -> Result<SessionOutcome, SessionError> {
        match msg {
            WireMessage::KeyPress(key) => self.handle_key(&key, KeyAction::Press, sender),
            WireMessage::KeyRelease(key) => self.handle_key(&key, KeyAction::Release, sender),
            WireMessage::Disconnect => Ok(self.handle_disconnect(sender)),
            WireMessage::Unknown { kind, payload } => {
                warn!("(echo) {kind} {payload} {sender}");
                Ok(SessionOutcome::Echo)
            }
        }
    }

    fn handle_key(
        &mut self,
        key: &str,
        action: KeyAction,
        sender: SocketAddr,
    ) -> Result<SessionOutcome, SessionError> {
        let player = self.resolve_player(sender)?;

        let Some(mapped) = self.bindings.lookup(player, key) else {
            return Err(SessionError::UnmappedBinding {
                player,
                key: key.to_string(),
                sender,
            });
        };

        if !self.controller.triggers_enabled() {
            return Ok(SessionOutcome::Suppressed { player });
        }

        let tag = match action {
            KeyAction::Press => "PRE",
            KeyAction::Release => "REL",
        };
        info!("{sender}[player {player}] TRIGGERED [{tag}] {key} (-> HOST {mapped})");

        self.injector
            .inject(mapped, action)
            .map_err(|source| SessionError::Injection {
                key: mapped.to_string(),
                source,
            })?;

        Ok(SessionOutcome::Injected {
            player,
            key: mapped.to_string(),
            action,
        })
    }

    /// Returns the sender's slot, allocating one if the sender is new.
    fn resolve_player(&mut self, sender: SocketAddr) -> Result<usize, SessionError> {
        if let Some(&player) = self.sessions.get(&sender) {
            return Ok(player);
        }

        let current = self.sessions.len();
        let max = self.bindings.capacity();
        if current >= max {
            return Err(SessionError::CapacityExceeded {
                current,
                max,
                sender,
            });
        }

        self.sessions.insert(sender, current);
        info!("player {current} connected {sender}");
        Ok(current)
    }

    fn handle_disconnect(&mut self, sender: SocketAddr) -> SessionOutcome {
        match self.sessions.remove(&sender) {
            Some(player) => {
                info!("player {player} {sender} disconnected");
                SessionOutcome::Disconnected { player }
            }
            None => SessionOutcome::Ignored,
        }
    }

    /// Slot bound to `sender`, if it has a live session.
    pub fn player_for(&self, sender: SocketAddr) -> Option<usize> {
        self.sessions.get(&sender).copied()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn capacity(&self) -> usize {
        self.bindings.capacity()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
