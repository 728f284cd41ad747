//! The host's consumer loop: drains received datagrams into the
//! [`SessionManager`].
//!
//! The loop parks on the queue for at most one poll interval at a time, so a
//! cleared running flag is noticed promptly even when no datagram arrives.
//! The `Exit` sentinel queued by the trigger-exit procedure ends it at once.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use keyshare_core::{EventQueue, QueueMessage, Role, RoleController};
use tracing::{debug, info};

use super::manage_sessions::SessionManager;

/// Owns the session manager for the lifetime of the worker thread.
pub struct SessionWorker {
    manager: SessionManager,
    queue: Arc<EventQueue>,
    controller: Arc<RoleController>,
    poll: Duration,
    role_poll: Duration,
}

impl SessionWorker {
    pub fn new(
        manager: SessionManager,
        queue: Arc<EventQueue>,
        controller: Arc<RoleController>,
        poll: Duration,
        role_poll: Duration,
    ) -> Self {
        Self {
            manager,
            queue,
            controller,
            poll,
            role_poll,
        }
    }

    /// Runs until the `Exit` sentinel arrives or the process stops.
    ///
    /// Returns the manager so callers can inspect the final session table.
    pub fn run(mut self) -> SessionManager {
        if self.controller.wait_for_role(self.role_poll) != Some(Role::Host) {
            return self.manager;
        }

        loop {
            match self.queue.get_timeout(self.poll) {
                Some(QueueMessage::RawDatagram { bytes, sender }) => {
                    self.manager.process_datagram(&bytes, sender);
                }
                Some(QueueMessage::Exit) => break,
                Some(other) => debug!("ignoring {other:?} on host queue"),
                None if !self.controller.is_running() => break,
                None => {}
            }
        }

        info!("exiting host parse thread...");
        self.manager
    }

    /// Runs the worker on a thread named `keyshare-session`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<JoinHandle<SessionManager>> {
        thread::Builder::new()
            .name("keyshare-session".to_string())
            .spawn(move || self.run())
    }
}
