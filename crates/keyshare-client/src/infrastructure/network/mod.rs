//! UDP adapter for the client sender.
//!
//! The socket is bound to an ephemeral local port; every datagram goes to the
//! configured host address with `send_to`.  The host identifies the player by
//! this source address, so one socket is kept for the whole session.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use thiserror::Error;
use tracing::info;

use crate::application::forward_events::{DatagramSink, SendError};

/// Error type for creating the client socket.
#[derive(Debug, Error)]
pub enum SenderError {
    /// The local UDP socket could not be bound.
    #[error("failed to bind client socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// [`DatagramSink`] over a UDP socket.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpSink {
    /// Binds an ephemeral local port of the same address family as `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::BindFailed`] if the socket cannot be bound.
    pub fn connect(dest: SocketAddr) -> Result<Self, SenderError> {
        let addr: SocketAddr = if dest.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(addr).map_err(|source| SenderError::BindFailed { addr, source })?;
        if let Ok(local) = socket.local_addr() {
            info!("client socket {local} sending to {dest}");
        }
        Ok(Self { socket, dest })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramSink for UdpSink {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        self.socket
            .send_to(payload, self.dest)
            .map(|_| ())
            .map_err(|source| SendError {
                dest: self.dest,
                source,
            })
    }

    fn destination(&self) -> SocketAddr {
        self.dest
    }
}
