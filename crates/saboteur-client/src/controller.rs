//! Framework-agnostic client controller.
//!
//! Owns every piece of client session state and the [`Platform`] that talks
//! to the outside world:
//!
//! - the [`ConnectionManager`] (socket + reconnect timer),
//! - the [`StateStore`] (current snapshot),
//! - the [`CommandDispatcher`] (trap selection),
//! - the HUD's transient state and the pointer.
//!
//! Frontends only need to:
//! 1. Call [`ClientController::connect`] once.
//! 2. Feed every [`PlatformEvent`] into [`ClientController::handle_event`] and
//!    every user action into [`ClientController::handle_input`].
//! 3. Pull [`ClientController::hud`] and [`ClientController::frame`] whenever
//!    they redraw.

use saboteur_core::geometry::{Point, client_to_canvas};
use saboteur_core::protocol::{ClientMessage, GameSnapshot, TrapType};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, ConnectionState, ConnectionUpdate};
use crate::dispatcher::CommandDispatcher;
use crate::error::{ClientError, SendError};
use crate::hud::{HudState, HudView, LinkStatus};
use crate::input::{InputEvent, PointerState, Shortcut, shortcut_for_key};
use crate::platform::{ConnectionId, Platform, PlatformEvent, SocketEvent, TimerId, TimerKind};
use crate::render::{DrawCmd, Frame, render_frame};
use crate::state_store::StateStore;

/// Outcome of processing a single platform event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// A new snapshot became current.
    Snapshot,
    /// The connection moved to the given state.
    Connection(ConnectionState),
    /// Nothing beyond the status line changed.
    Unchanged,
}

pub struct ClientController<P: Platform> {
    platform: P,
    config: ClientConfig,
    connection: ConnectionManager<P>,
    store: StateStore,
    dispatcher: CommandDispatcher,
    hud: HudState<P::Timer>,
    pointer: PointerState,
}

impl<P: Platform> ClientController<P> {
    pub fn new(platform: P, url: impl Into<String>, config: ClientConfig) -> Self {
        let connection = ConnectionManager::new(url, &config);
        Self {
            platform,
            config,
            connection,
            store: StateStore::new(),
            dispatcher: CommandDispatcher::new(),
            hud: HudState::new(),
            pointer: PointerState::default(),
        }
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Start connecting. Construction failures are reported on the status
    /// line and retried like any other connection loss.
    pub fn connect(&mut self) {
        if let Err(err) = self.connection.connect(&mut self.platform) {
            self.show_message(err.to_string());
        }
    }

    /// Drop the socket and every pending timer.
    pub fn shutdown(&mut self) {
        self.connection.shutdown();
        self.hud.clear_message();
    }

    pub fn handle_event(&mut self, event: PlatformEvent) -> PollResult {
        match event {
            PlatformEvent::Socket(id, event) => self.handle_socket(id, event),
            PlatformEvent::Timer(kind, id) => self.handle_timer(kind, id),
        }
    }

    fn handle_socket(&mut self, id: ConnectionId, event: SocketEvent) -> PollResult {
        let errored = matches!(event, SocketEvent::Error(_));
        match self.connection.handle_socket(&mut self.platform, id, event) {
            ConnectionUpdate::Stale => PollResult::Unchanged,
            ConnectionUpdate::Opened => {
                self.hud.connection_opened();
                PollResult::Connection(ConnectionState::Open)
            }
            ConnectionUpdate::Frame(raw) => match self.store.apply_snapshot(&raw) {
                Ok(snapshot) => {
                    self.hud.snapshot_applied(&snapshot);
                    PollResult::Snapshot
                }
                Err(err) => {
                    self.show_message(err.to_string());
                    PollResult::Unchanged
                }
            },
            ConnectionUpdate::Retrying { .. } => {
                if errored {
                    self.show_message("Connection error");
                }
                PollResult::Connection(self.connection.state())
            }
            ConnectionUpdate::Disconnected | ConnectionUpdate::GaveUp => {
                PollResult::Connection(self.connection.state())
            }
        }
    }

    fn handle_timer(&mut self, kind: TimerKind, id: TimerId) -> PollResult {
        match kind {
            TimerKind::Reconnect => {
                if let Err(err) = self.connection.on_retry_timer(&mut self.platform, id) {
                    self.show_message(err.to_string());
                }
                PollResult::Connection(self.connection.state())
            }
            TimerKind::MessageExpiry => {
                self.hud.message_expired(id);
                PollResult::Unchanged
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Apply one user input. Returns `true` when the frontend should suppress
    /// the input's default browser action.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        match input {
            InputEvent::PointerMoved { client, bounds } => {
                if let Some(at) = client_to_canvas(client, bounds, self.config.canvas) {
                    self.pointer.moved_to(at);
                }
                false
            }
            InputEvent::PointerEntered => {
                self.pointer.entered();
                false
            }
            InputEvent::PointerLeft => {
                self.pointer.left();
                false
            }
            InputEvent::Click { client, bounds } => {
                if let Some(at) = client_to_canvas(client, bounds, self.config.canvas) {
                    // Rejections are already on the status line.
                    let _ = self.attempt_place_trap(at);
                }
                false
            }
            InputEvent::Key { key, in_text_field } => {
                let Some(shortcut) = shortcut_for_key(&key, in_text_field) else {
                    return false;
                };
                match shortcut {
                    Shortcut::SelectTrap(trap) => self.select_trap(trap),
                    Shortcut::StartOrRestart => self.start_game(),
                    Shortcut::ClearSelection => self.deselect(),
                }
                true
            }
            InputEvent::SelectTrap(trap) => {
                self.select_trap(trap);
                false
            }
            InputEvent::Start => {
                self.start_game();
                false
            }
            InputEvent::NextLevel => {
                self.next_level();
                false
            }
        }
    }

    pub fn select_trap(&mut self, trap: TrapType) {
        self.dispatcher.select_trap(trap);
    }

    /// Select by option position (0-based).
    pub fn select_index(&mut self, index: usize) -> Option<TrapType> {
        self.dispatcher.select_index(index)
    }

    pub fn deselect(&mut self) {
        self.dispatcher.deselect();
    }

    /// Place the selected trap at canvas position `at`, or explain on the
    /// status line why not.
    pub fn attempt_place_trap(&mut self, at: Point) -> Result<(), ClientError> {
        let intent = match self.dispatcher.prepare_placement(self.store.current(), at) {
            Ok(intent) => intent,
            Err(err) => {
                debug!(%err, x = at.x, y = at.y, "placement rejected locally");
                self.show_message(err.to_string());
                return Err(err.into());
            }
        };
        self.send(&intent)?;
        Ok(())
    }

    /// Start (or restart) the level.
    pub fn start_game(&mut self) {
        let _ = self.send(&ClientMessage::Start);
        self.hud.started();
    }

    pub fn next_level(&mut self) {
        let _ = self.send(&ClientMessage::NextLevel);
        self.hud.advanced();
    }

    /// Restart the current level without the START relabelling.
    pub fn restart(&mut self) {
        let _ = self.send(&ClientMessage::Restart);
    }

    /// Send `msg`, reporting a failure on the status line. Failed intents are
    /// dropped.
    pub fn send(&mut self, msg: &ClientMessage) -> Result<(), SendError> {
        self.connection.send(msg).inspect_err(|err| {
            warn!(error = %err, ?msg, "intent dropped");
            self.show_message(err.to_string());
        })
    }

    /// Overwrite the status line for the configured message duration.
    pub fn show_message(&mut self, text: impl Into<String>) {
        let (platform, delay) = (&mut self.platform, self.config.message_duration());
        self.hud.show_message(text, |id| {
            platform.schedule(TimerKind::MessageExpiry, id, delay)
        });
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn hud(&self) -> HudView {
        let link = LinkStatus {
            state: self.connection.state(),
            attempts: self.connection.attempts(),
            max_attempts: self.connection.max_attempts(),
        };
        self.hud
            .view(link, self.store.current(), self.dispatcher.selected())
    }

    /// Display list for the game canvas at wall-clock `time` (seconds).
    pub fn frame(&self, time: f64) -> Vec<DrawCmd> {
        render_frame(&Frame {
            snapshot: self.store.current(),
            selected: self.dispatcher.selected(),
            pointer: self.pointer,
            time,
            surface: self.config.canvas,
        })
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.store.current()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn selected(&self) -> Option<TrapType> {
        self.dispatcher.selected()
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::{StartLabel, Tone};
    use crate::state_store::fixtures;
    use crate::testing::FakePlatform;
    use saboteur_core::geometry::Rect;
    use saboteur_core::protocol::GameStatus;

    fn controller() -> ClientController<FakePlatform> {
        ClientController::new(FakePlatform::new(), "ws://test/game", ClientConfig::default())
    }

    fn opened() -> (ClientController<FakePlatform>, ConnectionId) {
        let mut ctl = controller();
        ctl.connect();
        let id = ctl.platform().last_id();
        ctl.handle_event(PlatformEvent::Socket(id, SocketEvent::Open));
        (ctl, id)
    }

    fn push(ctl: &mut ClientController<FakePlatform>, id: ConnectionId, raw: String) -> PollResult {
        ctl.handle_event(PlatformEvent::Socket(id, SocketEvent::Message(raw)))
    }

    #[test]
    fn open_then_snapshot_updates_hud() {
        let (mut ctl, id) = opened();
        assert_eq!(ctl.hud().status.text, "Connected - Click START");

        let result = push(&mut ctl, id, fixtures::json(GameStatus::Waiting, 1, 0));
        assert_eq!(result, PollResult::Snapshot);
        let hud = ctl.hud();
        assert_eq!(hud.level, "Level: 1");
        assert_eq!(hud.status.text, "Click START to play");
    }

    #[test]
    fn placement_rejections_send_nothing() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::Running, 1, 49));

        let err = ctl.attempt_place_trap(Point::new(10.0, 10.0)).unwrap_err();
        assert_eq!(err.to_string(), "Select a trap first!");
        assert_eq!(ctl.hud().status.text, "Select a trap first!");

        ctl.select_trap(TrapType::Spike);
        let err = ctl.attempt_place_trap(Point::new(10.0, 10.0)).unwrap_err();
        assert_eq!(err.to_string(), "Not enough points!");
        assert_eq!(ctl.hud().status.tone, Tone::Alert);
        assert!(ctl.platform().sent().is_empty());
    }

    #[test]
    fn affordable_placement_sends_exactly_one_intent() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::Running, 1, 50));
        ctl.select_trap(TrapType::Spike);

        ctl.attempt_place_trap(Point::new(200.0, 100.0)).unwrap();
        let sent = ctl.platform().sent();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(value["type"], "PLACE_TRAP");
        assert_eq!(value["trapType"], "SPIKE");
    }

    #[test]
    fn click_is_mapped_into_canvas_space() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::Running, 1, 100));
        ctl.select_trap(TrapType::SlowZone);

        ctl.handle_input(InputEvent::Click {
            client: Point::new(110.0, 70.0),
            bounds: Rect::new(10.0, 20.0, 400.0, 225.0),
        });
        let sent = ctl.platform().sent();
        let value: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(value["x"], 200.0);
        assert_eq!(value["y"], 100.0);
    }

    #[test]
    fn send_while_disconnected_is_dropped() {
        let mut ctl = controller();
        ctl.start_game();
        assert!(ctl.platform().sent().is_empty());
        assert_eq!(ctl.hud().status.text, "Not connected to server");
        // The button is relabelled regardless.
        assert_eq!(ctl.hud().start_label, StartLabel::Restart);
    }

    #[test]
    fn one_message_timer_at_a_time() {
        let (mut ctl, _) = opened();
        ctl.show_message("first");
        ctl.show_message("second");
        assert_eq!(ctl.platform().live(TimerKind::MessageExpiry), 1);
        assert_eq!(ctl.hud().status.text, "second");

        let expiry = ctl.platform().expiry(TimerKind::MessageExpiry);
        ctl.handle_event(expiry);
        assert_eq!(ctl.hud().status.text, "Connected - Click START");
    }

    #[test]
    fn expiry_of_replaced_message_keeps_the_new_one() {
        let (mut ctl, _) = opened();
        ctl.show_message("first");
        let stale = ctl.platform().expiry(TimerKind::MessageExpiry);
        ctl.show_message("Not enough points!");

        ctl.handle_event(stale);
        assert_eq!(ctl.hud().status.text, "Not enough points!");
        assert_eq!(ctl.platform().live(TimerKind::MessageExpiry), 1);

        let current = ctl.platform().expiry(TimerKind::MessageExpiry);
        ctl.handle_event(current);
        assert_eq!(ctl.hud().status.text, "Connected - Click START");
    }

    #[cfg(feature = "native")]
    #[tokio::test(start_paused = true)]
    async fn queued_expiry_cannot_clear_a_newer_message() {
        use crate::native::NativePlatform;
        use std::time::Duration;

        let (platform, mut events) = NativePlatform::new();
        let mut ctl = ClientController::new(platform, "ws://127.0.0.1:9/game", ClientConfig::default());

        ctl.show_message("first");
        // Let the first expiry fire into the channel without draining it.
        tokio::time::sleep(Duration::from_millis(1_600)).await;
        ctl.show_message("Not enough points!");

        let queued = events.recv().await.unwrap();
        assert!(matches!(queued, PlatformEvent::Timer(TimerKind::MessageExpiry, _)));
        ctl.handle_event(queued);
        assert_eq!(ctl.hud().status.text, "Not enough points!");

        let fresh = events.recv().await.unwrap();
        ctl.handle_event(fresh);
        assert_eq!(ctl.hud().status.text, "Disconnected");
    }

    #[test]
    fn malformed_frame_reports_and_keeps_state() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::Running, 2, 30));
        push(&mut ctl, id, "not json".to_string());

        assert_eq!(ctl.hud().status.text, "Error parsing game data");
        assert_eq!(ctl.snapshot().map(|s| s.level), Some(2));
        assert_eq!(ctl.connection_state(), ConnectionState::Open);
    }

    #[test]
    fn unclean_close_schedules_retry_and_reports() {
        let (mut ctl, id) = opened();
        let result = ctl.handle_event(PlatformEvent::Socket(
            id,
            SocketEvent::Closed {
                clean: false,
                code: 1006,
                reason: String::new(),
            },
        ));
        assert_eq!(result, PollResult::Connection(ConnectionState::Reconnecting));
        assert_eq!(ctl.platform().live(TimerKind::Reconnect), 1);
        assert_eq!(
            ctl.hud().status.text,
            "Reconnecting... (1/5)"
        );

        let expiry = ctl.platform().expiry(TimerKind::Reconnect);
        ctl.handle_event(expiry);
        assert_eq!(ctl.connection_state(), ConnectionState::Connecting);
        assert_eq!(ctl.platform().log.borrow().opened.len(), 2);
    }

    #[test]
    fn socket_error_flashes_message() {
        let (mut ctl, id) = opened();
        ctl.handle_event(PlatformEvent::Socket(id, SocketEvent::Error("reset".into())));
        assert_eq!(ctl.hud().status.text, "Connection error");
        let expiry = ctl.platform().expiry(TimerKind::MessageExpiry);
        ctl.handle_event(expiry);
        assert_eq!(ctl.hud().status.text, "Reconnecting... (1/5)");
    }

    #[test]
    fn keyboard_shortcuts() {
        let (mut ctl, _) = opened();
        let key = |k: &str| InputEvent::Key {
            key: k.to_string(),
            in_text_field: false,
        };

        assert!(ctl.handle_input(key("2")));
        assert_eq!(ctl.selected(), Some(TrapType::BouncePad));
        assert!(ctl.handle_input(key("Escape")));
        assert_eq!(ctl.selected(), None);
        assert!(!ctl.handle_input(key("q")));

        assert!(ctl.handle_input(key("Enter")));
        assert_eq!(ctl.platform().sent(), vec![r#"{"type":"START"}"#.to_string()]);

        assert!(!ctl.handle_input(InputEvent::Key {
            key: "1".into(),
            in_text_field: true,
        }));
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn continue_affordance_by_level() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::PlayerWins, 3, 10));
        assert!(ctl.hud().continue_visible);

        ctl.next_level();
        assert!(!ctl.hud().continue_visible);
        assert_eq!(ctl.platform().sent(), vec![r#"{"type":"NEXT_LEVEL"}"#.to_string()]);

        push(&mut ctl, id, fixtures::json(GameStatus::PlayerWins, 5, 10));
        let hud = ctl.hud();
        assert!(!hud.continue_visible);
        assert_eq!(hud.status.text, "YOU BEAT ALL LEVELS!");
    }

    #[test]
    fn pointer_drives_preview() {
        let (mut ctl, id) = opened();
        push(&mut ctl, id, fixtures::json(GameStatus::Running, 1, 100));
        ctl.select_trap(TrapType::Spike);
        let bounds = Rect::new(0.0, 0.0, 800.0, 450.0);

        ctl.handle_input(InputEvent::PointerMoved {
            client: Point::new(100.0, 100.0),
            bounds,
        });
        assert!(ctl.frame(0.0).contains(&DrawCmd::Save));

        ctl.handle_input(InputEvent::PointerLeft);
        assert!(!ctl.frame(0.0).contains(&DrawCmd::Save));
        assert_eq!(ctl.frame(1.5), ctl.frame(1.5));
    }

    #[test]
    fn shutdown_clears_timers() {
        let (mut ctl, _) = opened();
        ctl.show_message("bye");
        ctl.shutdown();
        assert_eq!(ctl.platform().live(TimerKind::MessageExpiry), 0);
        assert_eq!(ctl.connection_state(), ConnectionState::Disconnected);
        assert_eq!(ctl.platform().log.borrow().closed.len(), 1);
    }
}
