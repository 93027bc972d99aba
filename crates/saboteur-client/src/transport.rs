//! Transport abstraction for the async (native) socket driver.
//!
//! Decouples [`crate::native`] from the concrete WebSocket library. The browser
//! frontend does not go through these traits; it drives the socket from
//! callbacks and reports [`crate::platform::SocketEvent`]s directly.

use std::future::Future;

use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote peer went away without a close handshake.
    #[error("connection closed")]
    ConnectionClosed,

    /// An I/O or protocol-level error.
    #[error("{0}")]
    Io(String),
}

/// One item read from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame (one JSON document).
    Text(String),
    /// The peer completed a clean close handshake.
    Closed { code: u16, reason: String },
}

/// Read half of a transport connection.
pub trait TransportReader: Send + 'static {
    /// Receive the next text frame or the clean close.
    ///
    /// An `Err` means the connection ended uncleanly.
    fn recv(&mut self) -> impl Future<Output = Result<Inbound, TransportError>> + Send;
}

/// Write half of a transport connection.
pub trait TransportWriter: Send + 'static {
    /// Send a text frame to the remote peer.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// A bidirectional transport that can be split into independent read and write
/// halves, so each can live in its own task.
pub trait Transport: Send + 'static {
    type Reader: TransportReader;
    type Writer: TransportWriter;

    /// Split the transport into independent read and write halves.
    fn split(self) -> (Self::Reader, Self::Writer);
}
