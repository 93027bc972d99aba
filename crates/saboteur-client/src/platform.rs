//! The seam between the client logic and its host environment.
//!
//! The client runs on a single cooperative event loop. A [`Platform`] opens
//! sockets and schedules timers; whatever those produce later (socket
//! callbacks, timer expiry) is fed back into
//! [`ClientController`](crate::controller::ClientController) as a
//! [`PlatformEvent`]. Nothing here is `Send`-bound: the browser frontend holds
//! JS handles, the native frontend holds channel senders.

use std::time::Duration;

use crate::error::ConnectionError;
use crate::transport::TransportError;

/// Identifies one socket instance. Events from a superseded socket carry a
/// stale id and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Something that happened on a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Open,
    Message(String),
    Closed {
        clean: bool,
        code: u16,
        reason: String,
    },
    Error(String),
}

/// The scheduled tasks the client uses. Each kind has at most one pending
/// instance at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Reconnect,
    MessageExpiry,
}

/// Identifies one scheduled task within its [`TimerKind`]. An expiry that
/// was already queued when its task got superseded carries a stale id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Everything a platform can report back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    Socket(ConnectionId, SocketEvent),
    Timer(TimerKind, TimerId),
}

/// A live socket. Dropping it closes the socket and detaches its callbacks.
pub trait Connection {
    /// Hand one text frame to the socket.
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;
}

/// Host services needed by the client.
pub trait Platform {
    type Connection: Connection;
    /// Handle of a scheduled task. Dropping it cancels the task.
    type Timer;

    /// Begin opening a socket to `url`. The outcome arrives later as
    /// [`SocketEvent`]s tagged with `id`. An `Err` means the socket could not
    /// even be constructed.
    fn open(&mut self, id: ConnectionId, url: &str) -> Result<Self::Connection, ConnectionError>;

    /// Arrange for [`PlatformEvent::Timer`] with `kind` and `id` to be
    /// delivered after `delay`.
    fn schedule(&mut self, kind: TimerKind, id: TimerId, delay: Duration) -> Self::Timer;
}
