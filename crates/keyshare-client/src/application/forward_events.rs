//! ClientSender: drains the client queue and sends one datagram per event.
//!
//! ```text
//! Key { x, Press }   ─► "key_press|x"
//! Key { x, Release } ─► "key_release|x"
//! Disconnect         ─► "disconnect|", then wait the grace period
//! Exit               ─► stop
//! ```
//!
//! Delivery is best effort.  A failed send is logged and the event dropped;
//! nothing is retried or acknowledged.  After a `Disconnect` the loop sleeps
//! for the configured grace period so the datagram has a chance to reach the
//! host before the process exits.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use keyshare_core::protocol::encode_message;
use keyshare_core::{EventQueue, QueueMessage, Role, RoleController, WireMessage};
use thiserror::Error;
use tracing::{debug, error, info};

/// A single datagram could not be sent.
#[derive(Debug, Error)]
#[error("failed to send to {dest}: {source}")]
pub struct SendError {
    pub dest: SocketAddr,
    #[source]
    pub source: io::Error,
}

/// Destination for encoded datagrams.
pub trait DatagramSink: Send {
    /// Sends one datagram.
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;

    /// Where datagrams go; used in log lines.
    fn destination(&self) -> SocketAddr;
}

/// Timings for [`ClientSender`].
#[derive(Debug, Clone, Copy)]
pub struct SenderTimings {
    pub poll: Duration,
    pub disconnect_grace: Duration,
    pub role_poll: Duration,
}

/// The client's sender loop.
pub struct ClientSender<K> {
    sink: K,
    queue: Arc<EventQueue>,
    controller: Arc<RoleController>,
    timings: SenderTimings,
}

impl<K: DatagramSink> ClientSender<K> {
    pub fn new(
        sink: K,
        queue: Arc<EventQueue>,
        controller: Arc<RoleController>,
        timings: SenderTimings,
    ) -> Self {
        Self {
            sink,
            queue,
            controller,
            timings,
        }
    }

    /// Runs until the `Exit` sentinel arrives or the process stops.
    ///
    /// Returns the number of datagrams sent successfully.
    pub fn run(self) -> usize {
        if self.controller.wait_for_role(self.timings.role_poll) != Some(Role::Client) {
            return 0;
        }

        let mut sent = 0;
        loop {
            match self.queue.get_timeout(self.timings.poll) {
                Some(QueueMessage::Key { name, action }) => {
                    sent += usize::from(self.send(&WireMessage::key(name, action)));
                }
                Some(QueueMessage::Disconnect) => {
                    sent += usize::from(self.send(&WireMessage::Disconnect));
                    thread::sleep(self.timings.disconnect_grace);
                }
                Some(QueueMessage::Exit) => break,
                Some(other) => debug!("ignoring {other:?} on client queue"),
                None if !self.controller.is_running() => break,
                None => {}
            }
        }

        info!("exiting client thread...");
        sent
    }

    fn send(&self, msg: &WireMessage) -> bool {
        let dest = self.sink.destination();
        let payload = encode_message(msg);

        info!("{dest} : {msg}");
        match self.sink.send(&payload) {
            Ok(()) => {
                info!("-- sent {msg} to {dest}");
                true
            }
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }
}

impl<K: DatagramSink + 'static> ClientSender<K> {
    /// Runs the sender on a thread named `keyshare-sender`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<JoinHandle<usize>> {
        thread::Builder::new()
            .name("keyshare-sender".to_string())
            .spawn(move || self.run())
    }
}
