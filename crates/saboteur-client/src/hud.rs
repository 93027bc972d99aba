//! Text HUD projection: level, points, time, the status line, the start and
//! continue buttons and the trap option flags.
//!
//! [`HudState`] keeps the little UI state that is not derivable from the
//! snapshot (the transient message, the start button label, whether the
//! continue button was just consumed). [`HudState::view`] folds that together
//! with the snapshot and connection state into a [`HudView`] that frontends
//! write out verbatim.

use saboteur_core::protocol::{GameSnapshot, GameStatus, TrapType};

use crate::connection::ConnectionState;
use crate::platform::TimerId;
use crate::timer::TimerSlot;

/// Colour class of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Muted,
    Warning,
    Alert,
}

impl Tone {
    pub fn css(self) -> &'static str {
        match self {
            Tone::Info => "#4d96ff",
            Tone::Muted => "#888",
            Tone::Warning => "#ffd93d",
            Tone::Alert => "#ff6b6b",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLabel {
    Start,
    Restart,
    Retry,
}

impl StartLabel {
    pub fn text(self) -> &'static str {
        match self {
            StartLabel::Start => "START",
            StartLabel::Restart => "RESTART",
            StartLabel::Retry => "RETRY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapOption {
    pub trap: TrapType,
    pub selected: bool,
    /// Purely visual; the option stays clickable.
    pub unaffordable: bool,
}

/// Connection facts the status line depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    pub state: ConnectionState,
    pub attempts: u32,
    pub max_attempts: u32,
}

/// Everything the frontend writes into its status slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub level: String,
    pub points: String,
    pub time: String,
    pub status: StatusLine,
    pub continue_visible: bool,
    pub start_label: StartLabel,
    pub traps: [TrapOption; 3],
}

/// Status copy for a snapshot.
pub fn snapshot_status(snapshot: &GameSnapshot) -> String {
    match snapshot.status {
        GameStatus::Waiting => "Click START to play".to_string(),
        GameStatus::Running => format!("Stop the runner! (Speed: {}%)", snapshot.speed_percent()),
        GameStatus::PlayerWins if snapshot.can_continue() => {
            format!("Level {} complete!", snapshot.level)
        }
        GameStatus::PlayerWins => "YOU BEAT ALL LEVELS!".to_string(),
        GameStatus::RunnerWins => "Runner escaped! Try again.".to_string(),
    }
}

/// Status line for the connection, or `None` when the game status should show.
pub fn connection_status(link: LinkStatus, awaiting_snapshot: bool) -> Option<StatusLine> {
    let line = match link.state {
        ConnectionState::Open if awaiting_snapshot => {
            StatusLine::new("Connected - Click START", Tone::Info)
        }
        ConnectionState::Open => return None,
        ConnectionState::Disconnected => StatusLine::new("Disconnected", Tone::Muted),
        ConnectionState::Connecting if link.attempts == 0 => {
            StatusLine::new("Connecting...", Tone::Muted)
        }
        ConnectionState::Connecting | ConnectionState::Reconnecting => StatusLine::new(
            format!("Reconnecting... ({}/{})", link.attempts, link.max_attempts),
            Tone::Warning,
        ),
        ConnectionState::Failed => StatusLine::new("Connection lost - Refresh page", Tone::Alert),
    };
    Some(line)
}

/// Non-derivable HUD state. `T` is the platform's timer handle.
pub struct HudState<T> {
    message: Option<String>,
    expiry: TimerSlot<T>,
    start_label: StartLabel,
    continue_suppressed: bool,
    awaiting_snapshot: bool,
}

impl<T> Default for HudState<T> {
    fn default() -> Self {
        Self {
            message: None,
            expiry: TimerSlot::new(),
            start_label: StartLabel::Start,
            continue_suppressed: false,
            awaiting_snapshot: true,
        }
    }
}

impl<T> HudState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the status line with `text` until the expiry task built by
    /// `schedule` fires. A message already showing is replaced and its timer
    /// cancelled.
    pub fn show_message(
        &mut self,
        text: impl Into<String>,
        schedule: impl FnOnce(TimerId) -> T,
    ) -> TimerId {
        self.message = Some(text.into());
        self.expiry.arm(schedule)
    }

    /// Expiry task `id` fired: revert to the contextual status, unless a
    /// newer message has replaced the one it belonged to.
    pub fn message_expired(&mut self, id: TimerId) {
        if self.expiry.fired(id) {
            self.message = None;
        }
    }

    /// Drop the message and its pending expiry.
    pub fn clear_message(&mut self) {
        self.expiry.disarm();
        self.message = None;
    }

    /// The socket (re)opened; no snapshot has been seen on it yet.
    pub fn connection_opened(&mut self) {
        self.awaiting_snapshot = true;
    }

    pub fn snapshot_applied(&mut self, snapshot: &GameSnapshot) {
        self.awaiting_snapshot = false;
        self.continue_suppressed = false;
        match snapshot.status {
            GameStatus::PlayerWins => self.start_label = StartLabel::Restart,
            GameStatus::RunnerWins => self.start_label = StartLabel::Retry,
            GameStatus::Waiting | GameStatus::Running => {}
        }
    }

    /// START was pressed.
    pub fn started(&mut self) {
        self.start_label = StartLabel::Restart;
        self.continue_suppressed = true;
    }

    /// NEXT LEVEL was pressed.
    pub fn advanced(&mut self) {
        self.continue_suppressed = true;
    }

    pub fn view(
        &self,
        link: LinkStatus,
        snapshot: Option<&GameSnapshot>,
        selected: Option<TrapType>,
    ) -> HudView {
        let status = match &self.message {
            Some(text) => StatusLine::new(text.clone(), Tone::Alert),
            None => connection_status(link, self.awaiting_snapshot)
                .or_else(|| snapshot.map(|s| StatusLine::new(snapshot_status(s), Tone::Info)))
                .unwrap_or_else(|| StatusLine::new("Connecting...", Tone::Muted)),
        };

        let traps = TrapType::ALL.map(|trap| TrapOption {
            trap,
            selected: selected == Some(trap),
            unaffordable: snapshot
                .is_some_and(|s| !(s.status == GameStatus::Running && s.can_afford(trap))),
        });

        match snapshot {
            Some(s) => HudView {
                level: format!("Level: {}", s.level),
                points: format!("Points: {}", s.player_points),
                time: format!("Time: {:.1}s", s.elapsed_time),
                status,
                continue_visible: s.can_continue() && !self.continue_suppressed,
                start_label: self.start_label,
                traps,
            },
            None => HudView {
                level: "Level: -".to_string(),
                points: "Points: -".to_string(),
                time: "Time: -".to_string(),
                status,
                continue_visible: false,
                start_label: self.start_label,
                traps,
            },
        }
    }
}
