//! In-memory [`Platform`] for unit tests.
//!
//! Records every socket opened and every frame sent, and tracks which
//! scheduled timers are still live (a timer handle counts as live until it is
//! dropped, i.e. cancelled or consumed).

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::ConnectionError;
use crate::platform::{Connection, ConnectionId, Platform, PlatformEvent, TimerId, TimerKind};
use crate::transport::TransportError;

#[derive(Debug, Default)]
pub struct Recorder {
    pub opened: Vec<(ConnectionId, String)>,
    pub closed: Vec<ConnectionId>,
    pub sent: Vec<String>,
    pub live_timers: Vec<(u64, TimerKind, TimerId, Duration)>,
    pub scheduled: Vec<TimerKind>,
    next_timer: u64,
}

impl Recorder {
    pub fn live(&self, kind: TimerKind) -> usize {
        self.live_timers.iter().filter(|(_, k, _, _)| *k == kind).count()
    }

    /// Id of the most recently scheduled live timer of `kind`.
    pub fn live_id(&self, kind: TimerKind) -> Option<TimerId> {
        self.live_timers
            .iter()
            .rev()
            .find(|(_, k, _, _)| *k == kind)
            .map(|(_, _, id, _)| *id)
    }
}

#[derive(Default)]
pub struct FakePlatform {
    pub log: Rc<RefCell<Recorder>>,
    /// Make the next `open` calls fail at construction.
    pub refuse_open: bool,
    /// Make every `send_text` fail.
    pub broken_pipe: bool,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_id(&self) -> ConnectionId {
        self.log.borrow().opened.last().map(|(id, _)| *id).expect("no socket opened")
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.borrow().sent.clone()
    }

    pub fn live(&self, kind: TimerKind) -> usize {
        self.log.borrow().live(kind)
    }

    /// The event a live timer of `kind` would deliver when it fires.
    pub fn expiry(&self, kind: TimerKind) -> PlatformEvent {
        let id = self.log.borrow().live_id(kind).expect("no live timer of that kind");
        PlatformEvent::Timer(kind, id)
    }
}

pub struct FakeConnection {
    id: ConnectionId,
    log: Rc<RefCell<Recorder>>,
    broken: bool,
}

impl Connection for FakeConnection {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if self.broken {
            return Err(TransportError::Io("broken pipe".into()));
        }
        self.log.borrow_mut().sent.push(text.to_string());
        Ok(())
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.log.borrow_mut().closed.push(self.id);
    }
}

pub struct FakeTimer {
    id: u64,
    log: Rc<RefCell<Recorder>>,
}

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.log.borrow_mut().live_timers.retain(|(id, _, _, _)| *id != self.id);
    }
}

impl Platform for FakePlatform {
    type Connection = FakeConnection;
    type Timer = FakeTimer;

    fn open(&mut self, id: ConnectionId, url: &str) -> Result<FakeConnection, ConnectionError> {
        if self.refuse_open {
            return Err(ConnectionError::Construct(format!("refused: {url}")));
        }
        self.log.borrow_mut().opened.push((id, url.to_string()));
        Ok(FakeConnection {
            id,
            log: self.log.clone(),
            broken: self.broken_pipe,
        })
    }

    fn schedule(&mut self, kind: TimerKind, timer: TimerId, delay: Duration) -> FakeTimer {
        let mut log = self.log.borrow_mut();
        log.next_timer += 1;
        let id = log.next_timer;
        log.live_timers.push((id, kind, timer, delay));
        log.scheduled.push(kind);
        FakeTimer {
            id,
            log: self.log.clone(),
        }
    }
}
