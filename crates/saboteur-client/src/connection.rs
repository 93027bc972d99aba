//! Socket lifecycle and bounded reconnection.
//!
//! ```text
//! DISCONNECTED ──connect──▶ CONNECTING ──open──▶ OPEN
//!                               │                 │ clean close ──▶ DISCONNECTED
//!                               │                 │ unclean close / error
//!                               ▼                 ▼
//!                          RECONNECTING ◀─────────┘
//!                               │ retry timer ──▶ CONNECTING
//!                               │ attempts exhausted
//!                               ▼
//!                             FAILED
//! ```
//!
//! The manager owns the one live socket and the one pending retry timer.
//! Starting a new attempt drops the previous socket and cancels any pending
//! retry, so neither can ever exist twice.

use std::time::Duration;

use saboteur_core::protocol::ClientMessage;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ConnectionError, SendError};
use crate::platform::{Connection, ConnectionId, Platform, SocketEvent, TimerId, TimerKind};
use crate::timer::TimerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Reconnecting,
    /// Retries exhausted. Only a page reload recovers from here.
    Failed,
}

/// What a socket event did to the connection, for the controller to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUpdate {
    /// The event came from a socket that has since been replaced.
    Stale,
    Opened,
    /// An inbound text frame to hand to the state store.
    Frame(String),
    /// Clean close. Terminal for this session, no retry.
    Disconnected,
    /// A retry is scheduled.
    Retrying { attempt: u32 },
    GaveUp,
}

struct Live<C> {
    id: ConnectionId,
    conn: C,
}

pub struct ConnectionManager<P: Platform> {
    url: String,
    state: ConnectionState,
    attempts: u32,
    max_attempts: u32,
    retry_delay: Duration,
    next_id: u64,
    live: Option<Live<P::Connection>>,
    retry: TimerSlot<P::Timer>,
}

impl<P: Platform> ConnectionManager<P> {
    pub fn new(url: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            url: url.into(),
            state: ConnectionState::Disconnected,
            attempts: 0,
            max_attempts: config.max_reconnect_attempts,
            retry_delay: config.reconnect_delay(),
            next_id: 0,
            live: None,
            retry: TimerSlot::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Retries used since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn retry_pending(&self) -> bool {
        self.retry.is_armed()
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Start a connection attempt.
    ///
    /// Does nothing while an attempt is in flight, while open, or after
    /// retries are exhausted. A construction failure is not returned to the
    /// retry logic's caller as fatal: the manager has already moved into the
    /// reconnect path, and the `Err` only tells the caller what to report.
    pub fn connect(&mut self, platform: &mut P) -> Result<(), ConnectionError> {
        match self.state {
            ConnectionState::Connecting | ConnectionState::Open | ConnectionState::Failed => {
                return Ok(());
            }
            ConnectionState::Disconnected | ConnectionState::Reconnecting => {}
        }

        self.retry.disarm();
        self.live = None;
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.state = ConnectionState::Connecting;
        debug!(id = id.0, url = %self.url, attempt = self.attempts, "opening socket");

        match platform.open(id, &self.url) {
            Ok(conn) => {
                self.live = Some(Live { id, conn });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "socket construction failed");
                self.enter_reconnect(platform);
                Err(err)
            }
        }
    }

    /// Reconnect task `id` fired. Expiries of superseded retries are ignored.
    pub fn on_retry_timer(&mut self, platform: &mut P, id: TimerId) -> Result<(), ConnectionError> {
        if !self.retry.fired(id) {
            debug!(timer = id.0, "ignoring superseded reconnect timer");
            return Ok(());
        }
        if self.state != ConnectionState::Reconnecting {
            return Ok(());
        }
        self.connect(platform)
    }

    /// Apply one socket event.
    pub fn handle_socket(
        &mut self,
        platform: &mut P,
        id: ConnectionId,
        event: SocketEvent,
    ) -> ConnectionUpdate {
        if !self.live.as_ref().is_some_and(|live| live.id == id) {
            debug!(id = id.0, ?event, "ignoring event from superseded socket");
            return ConnectionUpdate::Stale;
        }

        match event {
            SocketEvent::Open => {
                info!(id = id.0, "connected");
                self.state = ConnectionState::Open;
                self.attempts = 0;
                self.retry.disarm();
                ConnectionUpdate::Opened
            }
            SocketEvent::Message(text) => ConnectionUpdate::Frame(text),
            SocketEvent::Closed {
                clean: true,
                code,
                reason,
            } => {
                info!(code, %reason, "server closed the connection");
                self.live = None;
                self.retry.disarm();
                self.state = ConnectionState::Disconnected;
                ConnectionUpdate::Disconnected
            }
            SocketEvent::Closed {
                clean: false,
                code,
                reason,
            } => {
                let err = ConnectionError::Closed { code, reason };
                warn!(error = %err, "connection dropped");
                self.enter_reconnect(platform)
            }
            SocketEvent::Error(message) => {
                warn!(%message, "socket error");
                self.enter_reconnect(platform)
            }
        }
    }

    /// Serialize and transmit `msg`. Fails without touching the socket unless
    /// the connection is open.
    pub fn send(&mut self, msg: &ClientMessage) -> Result<(), SendError> {
        let live = match (&self.state, self.live.as_mut()) {
            (ConnectionState::Open, Some(live)) => live,
            _ => return Err(SendError::NotConnected),
        };
        let text = msg.to_json().map_err(SendError::Encode)?;
        live.conn.send_text(&text).map_err(SendError::Transport)
    }

    /// Drop the socket and any pending retry.
    pub fn shutdown(&mut self) {
        self.live = None;
        self.retry.disarm();
        if self.state != ConnectionState::Failed {
            self.state = ConnectionState::Disconnected;
        }
    }

    fn enter_reconnect(&mut self, platform: &mut P) -> ConnectionUpdate {
        self.live = None;
        if self.attempts >= self.max_attempts {
            warn!(attempts = self.attempts, "giving up on reconnecting");
            self.retry.disarm();
            self.state = ConnectionState::Failed;
            return ConnectionUpdate::GaveUp;
        }
        self.attempts += 1;
        self.state = ConnectionState::Reconnecting;
        let delay = self.retry_delay;
        self.retry
            .arm(|id| platform.schedule(TimerKind::Reconnect, id, delay));
        debug!(attempt = self.attempts, max = self.max_attempts, "reconnect scheduled");
        ConnectionUpdate::Retrying {
            attempt: self.attempts,
        }
    }
}
