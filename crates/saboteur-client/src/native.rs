//! Tokio-backed [`Platform`] for native frontends.
//!
//! Each socket runs in its own task that connects, then pumps the read and
//! write halves of the [`Transport`] until either side ends. Everything the
//! task observes is reported as a [`PlatformEvent`] on one unbounded channel;
//! the frontend's event loop drains that channel into the controller.
//!
//! Dropping a [`NativeConnection`] or [`NativeTimer`] aborts its task, so a
//! superseded socket or cancelled timer never reports again.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ConnectionError;
use crate::platform::{
    Connection, ConnectionId, Platform, PlatformEvent, SocketEvent, TimerId, TimerKind,
};
use crate::transport::{Inbound, Transport, TransportError, TransportReader, TransportWriter};
use crate::ws_transport::WsTransport;

/// Close code reported for a connection that ended without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;

pub struct NativePlatform {
    events: mpsc::UnboundedSender<PlatformEvent>,
}

impl NativePlatform {
    /// Create a platform and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlatformEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl Platform for NativePlatform {
    type Connection = NativeConnection;
    type Timer = NativeTimer;

    fn open(&mut self, id: ConnectionId, url: &str) -> Result<NativeConnection, ConnectionError> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConnectionError::Construct(format!("unsupported url: {url}")));
        }
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let events = self.events.clone();
        let url = url.to_owned();

        let task = tokio::spawn(async move {
            match WsTransport::connect(&url).await {
                Ok(transport) => run_connection(id, transport, outgoing_rx, events).await,
                Err(e) => {
                    let _ = events.send(PlatformEvent::Socket(id, SocketEvent::Error(e.to_string())));
                }
            }
        });
        Ok(NativeConnection { outgoing, task })
    }

    fn schedule(&mut self, kind: TimerKind, id: TimerId, delay: Duration) -> NativeTimer {
        let events = self.events.clone();
        NativeTimer(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(PlatformEvent::Timer(kind, id));
        }))
    }
}

pub struct NativeConnection {
    outgoing: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl Connection for NativeConnection {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.outgoing
            .send(text.to_owned())
            .map_err(|_| TransportError::ConnectionClosed)
    }
}

impl Drop for NativeConnection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A pending timer. Dropping it cancels the timer.
pub struct NativeTimer(JoinHandle<()>);

impl Drop for NativeTimer {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Report the socket open, then pump both halves of `transport` until the
/// read side ends or a write fails.
pub async fn run_connection<T: Transport>(
    id: ConnectionId,
    transport: T,
    outgoing: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<PlatformEvent>,
) {
    if events.send(PlatformEvent::Socket(id, SocketEvent::Open)).is_err() {
        return;
    }
    let (reader, writer) = transport.split();
    tokio::select! {
        _ = pump_reader(id, reader, events.clone()) => {}
        _ = pump_writer(id, writer, outgoing, events) => {}
    }
    debug!(id = id.0, "socket task finished");
}

async fn pump_reader<R: TransportReader>(
    id: ConnectionId,
    mut reader: R,
    events: mpsc::UnboundedSender<PlatformEvent>,
) {
    loop {
        let event = match reader.recv().await {
            Ok(Inbound::Text(text)) => SocketEvent::Message(text),
            Ok(Inbound::Closed { code, reason }) => {
                let _ = events.send(PlatformEvent::Socket(
                    id,
                    SocketEvent::Closed {
                        clean: true,
                        code,
                        reason,
                    },
                ));
                return;
            }
            Err(e) => {
                let _ = events.send(PlatformEvent::Socket(
                    id,
                    SocketEvent::Closed {
                        clean: false,
                        code: ABNORMAL_CLOSURE,
                        reason: e.to_string(),
                    },
                ));
                return;
            }
        };
        if events.send(PlatformEvent::Socket(id, event)).is_err() {
            return;
        }
    }
}

async fn pump_writer<W: TransportWriter>(
    id: ConnectionId,
    mut writer: W,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<PlatformEvent>,
) {
    while let Some(text) = outgoing.recv().await {
        if let Err(e) = writer.send(&text).await {
            let _ = events.send(PlatformEvent::Socket(id, SocketEvent::Error(e.to_string())));
            return;
        }
    }
}
