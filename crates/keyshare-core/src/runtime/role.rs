//! RoleController: the process-wide role and control flags.
//!
//! Every worker thread holds an `Arc<RoleController>` and reads the flags
//! through accessor methods:
//!
//! | Flag       | Set by                          | Read by                      |
//! |------------|---------------------------------|------------------------------|
//! | `role`     | startup, exactly once           | every worker loop            |
//! | `running`  | [`RoleController::trigger_exit`] | every worker loop           |
//! | `tracking` | tracking hotkey (client)        | input loop                   |
//! | `triggers` | triggers hotkey (host)          | session manager              |
//!
//! Worker loops call [`RoleController::wait_for_role`] first; while the role
//! is [`Role::Unset`] they do nothing.
//!
//! # Shutdown
//!
//! Clearing `running` is the only cancellation signal.  The exit key, the
//! force-quit hotkey, a closed key source, a host bind failure and Ctrl-C all
//! go through [`RoleController::trigger_exit`], which also enqueues sentinels
//! so a consumer parked on an empty queue wakes up immediately.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use super::queue::{EventQueue, QueueMessage};

/// Which side of the session this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Not chosen yet; worker loops wait.
    Unset,
    /// Receives datagrams and injects mapped keys.
    Host,
    /// Captures tracked keys and forwards them.
    Client,
}

impl Role {
    fn to_u8(self) -> u8 {
        match self {
            Role::Unset => 0,
            Role::Host => 1,
            Role::Client => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Role::Host,
            2 => Role::Client,
            _ => Role::Unset,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unset => f.write_str("unset"),
            Role::Host => f.write_str("host"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// Error type for role selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("role already set to {0}")]
    AlreadySet(Role),
    #[error("cannot select the unset role")]
    InvalidRole,
}

/// Shared, thread-safe role state.
#[derive(Debug)]
pub struct RoleController {
    role: AtomicU8,
    running: AtomicBool,
    tracking: AtomicBool,
    triggers: AtomicBool,
    exit_requested: AtomicBool,
}

impl RoleController {
    /// Creates a running controller with no role, tracking off and triggers off.
    pub fn new() -> Self {
        Self {
            role: AtomicU8::new(Role::Unset.to_u8()),
            running: AtomicBool::new(true),
            tracking: AtomicBool::new(false),
            triggers: AtomicBool::new(false),
            exit_requested: AtomicBool::new(false),
        }
    }

    /// Selects the role for this process.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::AlreadySet`] on a second call and
    /// [`RoleError::InvalidRole`] for [`Role::Unset`].
    pub fn set_role(&self, role: Role) -> Result<(), RoleError> {
        if role == Role::Unset {
            return Err(RoleError::InvalidRole);
        }
        match self.role.compare_exchange(
            Role::Unset.to_u8(),
            role.to_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {
                info!("selected role: {role}");
                Ok(())
            }
            Err(current) => Err(RoleError::AlreadySet(Role::from_u8(current))),
        }
    }

    pub fn role(&self) -> Role {
        Role::from_u8(self.role.load(Ordering::SeqCst))
    }

    /// Blocks until a role is selected, re-checking every `poll`.
    ///
    /// A role that is already set is returned even after shutdown started; a
    /// worker that starts late must still drain the sentinels queued for it.
    /// Returns `None` only if the process stops before a role is chosen.
    pub fn wait_for_role(&self, poll: Duration) -> Option<Role> {
        loop {
            match self.role() {
                Role::Unset if !self.is_running() => return None,
                Role::Unset => thread::sleep(poll),
                role => return Some(role),
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }

    pub fn set_tracking(&self, enabled: bool) {
        self.tracking.store(enabled, Ordering::SeqCst);
    }

    /// Flips the tracking flag and returns the new value.
    pub fn toggle_tracking(&self) -> bool {
        !self.tracking.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn triggers_enabled(&self) -> bool {
        self.triggers.load(Ordering::SeqCst)
    }

    pub fn set_triggers(&self, enabled: bool) {
        self.triggers.store(enabled, Ordering::SeqCst);
    }

    /// Flips the triggers flag and returns the new value.
    pub fn toggle_triggers(&self) -> bool {
        !self.triggers.fetch_xor(true, Ordering::SeqCst)
    }

    /// Starts shutdown.
    ///
    /// A client enqueues a `Disconnect` for the host followed by the `Exit`
    /// sentinel; a host enqueues `Exit` only.  Tracking is switched off and
    /// `running` is cleared after the sentinels are queued.
    ///
    /// Only the first call has an effect; it returns `true`.
    pub fn trigger_exit(&self, queue: &EventQueue<QueueMessage>) -> bool {
        if self.exit_requested.swap(true, Ordering::SeqCst) {
            debug!("exit already in progress");
            return false;
        }

        if self.role() == Role::Client {
            queue.put(QueueMessage::Disconnect);
        }
        queue.put(QueueMessage::Exit);

        self.tracking.store(false, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        info!("shutdown requested");
        true
    }
}

impl Default for RoleController {
    fn default() -> Self {
        Self::new()
    }
}
