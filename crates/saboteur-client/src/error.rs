//! Client error taxonomy.
//!
//! None of these are fatal. The `Display` text of each user-facing variant is
//! exactly what the status line shows, so callers can surface an error with
//! `err.to_string()`.

use thiserror::Error;

use crate::transport::TransportError;

/// Failure to establish or keep the game socket.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The socket object could not be constructed (bad URL, blocked, ...).
    #[error("Failed to connect to server")]
    Construct(String),

    /// The socket closed without a clean close handshake.
    #[error("connection closed (code {code}): {reason}")]
    Closed { code: u16, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An inbound frame that is not a valid snapshot.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Error parsing game data")]
    Malformed(#[source] serde_json::Error),

    #[error("Error parsing game data")]
    Empty,
}

/// A local pre-send check rejected a placement. Advisory only; the server
/// remains the authority on legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a trap first!")]
    NoTrapSelected,

    #[error("Press START to begin!")]
    NotRunning,

    #[error("Not enough points!")]
    InsufficientPoints { cost: u32, available: u32 },
}

/// An intent could not be handed to the socket. The intent is dropped, never
/// queued or retried.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Not connected to server")]
    NotConnected,

    #[error("Failed to send message")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to send message")]
    Transport(#[source] TransportError),
}

/// Umbrella error for callers that do not care which branch failed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Send(#[from] SendError),
}
