//! HostReceiver: the host's UDP listener.
//!
//! Binds a datagram socket on the configured address and pushes every
//! received datagram, undecoded, onto the host queue together with its
//! source address.  Decoding and all per-message decisions happen on the
//! session worker.
//!
//! # Read timeout
//!
//! The socket is given a read timeout equal to the poll interval, so
//! `recv_from` blocks for at most one interval before the loop re-checks the
//! running flag.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use keyshare_core::protocol::wire::MAX_DATAGRAM_SIZE;
use keyshare_core::{EventQueue, QueueMessage, RoleController};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error type for the host receiver.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// The UDP socket could not be bound.
    #[error("failed to bind host socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The socket could not be configured after binding.
    #[error("failed to configure host socket: {0}")]
    Configure(#[source] io::Error),
    /// The receiver thread could not be started.
    #[error("failed to spawn receiver thread: {0}")]
    Spawn(#[source] io::Error),
}

/// A bound UDP socket feeding the host queue.
pub struct HostReceiver {
    socket: UdpSocket,
    local_addr: SocketAddr,
    queue: Arc<EventQueue>,
    controller: Arc<RoleController>,
}

impl HostReceiver {
    /// Binds `addr` with a read timeout of `poll`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::BindFailed`] if the socket cannot be bound.
    pub fn bind(
        addr: SocketAddr,
        poll: Duration,
        queue: Arc<EventQueue>,
        controller: Arc<RoleController>,
    ) -> Result<Self, ReceiverError> {
        let socket = UdpSocket::bind(addr).map_err(|source| ReceiverError::BindFailed { addr, source })?;
        // A zero timeout is rejected by the OS.
        socket
            .set_read_timeout(Some(poll.max(Duration::from_millis(1))))
            .map_err(ReceiverError::Configure)?;
        let local_addr = socket.local_addr().map_err(ReceiverError::Configure)?;

        Ok(Self {
            socket,
            local_addr,
            queue,
            controller,
        })
    }

    /// The bound address; useful when binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receives until the running flag is cleared.
    pub fn run(self) {
        info!("host listening on UDP {}", self.local_addr);
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        while self.controller.is_running() {
            let (len, sender) = match self.socket.recv_from(&mut buf) {
                Ok(pair) => pair,
                Err(e) if is_timeout_error(&e) => continue,
                Err(e) => {
                    warn!("host recv error: {e}");
                    continue;
                }
            };

            debug!("received {len} bytes from {sender}");
            self.queue.put(QueueMessage::RawDatagram {
                bytes: buf[..len].to_vec(),
                sender,
            });
        }

        info!("exiting host server thread...");
    }

    /// Runs the receiver on a thread named `keyshare-receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Spawn`] if the thread cannot be started.
    pub fn spawn(self) -> Result<JoinHandle<()>, ReceiverError> {
        thread::Builder::new()
            .name("keyshare-receiver".to_string())
            .spawn(move || self.run())
            .map_err(ReceiverError::Spawn)
    }
}

/// Binds and starts the receiver.
///
/// A bind failure is fatal for the host: it is logged and the process is
/// asked to shut down before the error is returned.
///
/// # Errors
///
/// Returns the [`ReceiverError`] from binding or spawning.
pub fn start_host_receiver(
    addr: SocketAddr,
    poll: Duration,
    queue: Arc<EventQueue>,
    controller: Arc<RoleController>,
) -> Result<(SocketAddr, JoinHandle<()>), ReceiverError> {
    let receiver = match HostReceiver::bind(addr, poll, Arc::clone(&queue), Arc::clone(&controller)) {
        Ok(receiver) => receiver,
        Err(e) => {
            error!("{e}");
            controller.trigger_exit(&queue);
            return Err(e);
        }
    };
    let local = receiver.local_addr();
    Ok((local, receiver.spawn()?))
}

/// Returns `true` for OS timeout / would-block errors that should be retried.
fn is_timeout_error(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyshare_core::Role;

    fn loopback() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[test]
    fn test_received_datagram_is_queued_with_sender() {
        // Arrange
        let queue = Arc::new(EventQueue::new());
        let controller = Arc::new(RoleController::new());
        controller.set_role(Role::Host).unwrap();
        let (addr, handle) = start_host_receiver(
            loopback(),
            Duration::from_millis(5),
            Arc::clone(&queue),
            Arc::clone(&controller),
        )
        .unwrap();
        let client = UdpSocket::bind(loopback()).unwrap();

        // Act
        client.send_to(b"key_press|x", addr).unwrap();
        let item = queue.get_timeout(Duration::from_secs(2));
        controller.trigger_exit(&queue);
        handle.join().unwrap();

        // Assert
        assert_eq!(
            item,
            Some(QueueMessage::RawDatagram {
                bytes: b"key_press|x".to_vec(),
                sender: client.local_addr().unwrap(),
            })
        );
    }

    #[test]
    fn test_bind_failure_triggers_exit() {
        // Arrange: occupy a port
        let taken = UdpSocket::bind(loopback()).unwrap();
        let addr = taken.local_addr().unwrap();
        let queue = Arc::new(EventQueue::new());
        let controller = Arc::new(RoleController::new());
        controller.set_role(Role::Host).unwrap();

        // Act
        let result = start_host_receiver(
            addr,
            Duration::from_millis(1),
            Arc::clone(&queue),
            Arc::clone(&controller),
        );

        // Assert
        assert!(matches!(result, Err(ReceiverError::BindFailed { .. })));
        assert!(!controller.is_running());
        assert_eq!(queue.try_get(), Some(QueueMessage::Exit));
    }

    #[test]
    fn test_timeout_errors_are_retryable() {
        assert!(is_timeout_error(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout_error(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_timeout_error(&io::Error::from(io::ErrorKind::ConnectionReset)));
    }
}
