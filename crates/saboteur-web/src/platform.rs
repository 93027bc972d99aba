//! Browser [`Platform`]: `web_sys::WebSocket` sockets and `setTimeout` timers.
//!
//! Socket and timer callbacks hold a weak handle to the controller and feed
//! it [`PlatformEvent`]s directly. JS never invokes them synchronously from
//! inside a controller call, so the controller's `RefCell` is free whenever
//! one runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use saboteur_client::controller::ClientController;
use saboteur_client::error::ConnectionError;
use saboteur_client::platform::{
    Connection, ConnectionId, Platform, PlatformEvent, SocketEvent, TimerId, TimerKind,
};
use saboteur_client::transport::TransportError;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

pub type Controller = ClientController<WebPlatform>;
pub type SharedController = Rc<RefCell<Controller>>;

/// Hand `event` to the controller if it is still alive.
fn deliver(target: &Weak<RefCell<Controller>>, event: PlatformEvent) {
    let Some(controller) = target.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => {
            controller.handle_event(event);
        }
        Err(_) => warn!(?event, "controller busy, event dropped"),
    }
}

pub struct WebPlatform {
    controller: Weak<RefCell<Controller>>,
}

impl WebPlatform {
    pub fn new(controller: Weak<RefCell<Controller>>) -> Self {
        Self { controller }
    }
}

impl Platform for WebPlatform {
    type Connection = WebConnection;
    type Timer = WebTimer;

    fn open(&mut self, id: ConnectionId, url: &str) -> Result<WebConnection, ConnectionError> {
        let ws = WebSocket::new(url).map_err(|e| ConnectionError::Construct(format!("{e:?}")))?;

        let target = self.controller.clone();
        let onopen = Closure::<dyn FnMut()>::new(move || {
            deliver(&target, PlatformEvent::Socket(id, SocketEvent::Open));
        });

        let target = self.controller.clone();
        let onmessage = Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
            match e.data().as_string() {
                Some(text) => deliver(&target, PlatformEvent::Socket(id, SocketEvent::Message(text))),
                None => debug!("ignoring non-text frame"),
            }
        });

        let target = self.controller.clone();
        let onclose = Closure::<dyn FnMut(_)>::new(move |e: CloseEvent| {
            let event = SocketEvent::Closed {
                clean: e.was_clean(),
                code: e.code(),
                reason: e.reason(),
            };
            deliver(&target, PlatformEvent::Socket(id, event));
        });

        let target = self.controller.clone();
        let onerror = Closure::<dyn FnMut(_)>::new(move |e: Event| {
            let event = SocketEvent::Error(e.type_());
            deliver(&target, PlatformEvent::Socket(id, event));
        });

        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        Ok(WebConnection {
            ws,
            _handlers: SocketHandlers {
                _onopen: onopen,
                _onmessage: onmessage,
                _onclose: onclose,
                _onerror: onerror,
            },
        })
    }

    fn schedule(&mut self, kind: TimerKind, id: TimerId, delay: Duration) -> WebTimer {
        let target = self.controller.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        WebTimer(Timeout::new(millis, move || {
            deliver(&target, PlatformEvent::Timer(kind, id));
        }))
    }
}

/// Socket callbacks, kept alive as long as the socket they are attached to.
struct SocketHandlers {
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
}

pub struct WebConnection {
    ws: WebSocket,
    _handlers: SocketHandlers,
}

impl Connection for WebConnection {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.ws
            .send_with_str(text)
            .map_err(|e| TransportError::Io(format!("{e:?}")))
    }
}

impl Drop for WebConnection {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
        let _ = self.ws.close();
    }
}

/// A pending `setTimeout`; dropping it clears the timeout.
pub struct WebTimer(#[allow(dead_code)] Timeout);
