use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest level the server will run. Winning this level ends the campaign.
pub const MAX_LEVEL: u32 = 5;

/// Side length of a trap's square footprint, in canvas pixels.
pub const TRAP_SIZE: f64 = 30.0;

/// Lifecycle of the authoritative game as reported in every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Waiting,
    Running,
    PlayerWins,
    RunnerWins,
}

impl GameStatus {
    /// `true` once a level has been decided either way.
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::PlayerWins | GameStatus::RunnerWins)
    }
}

/// A placeable obstacle. Costs are fixed and mirrored from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrapType {
    Spike,
    BouncePad,
    SlowZone,
}

impl TrapType {
    /// Trap options in the order they are offered to the player (and bound to
    /// the digit keys 1, 2, 3).
    pub const ALL: [TrapType; 3] = [TrapType::Spike, TrapType::BouncePad, TrapType::SlowZone];

    /// Point cost of placing this trap.
    pub fn cost(self) -> u32 {
        match self {
            TrapType::Spike => 50,
            TrapType::BouncePad => 20,
            TrapType::SlowZone => 15,
        }
    }

    /// Trap at the given option position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wire name (`SPIKE`, `BOUNCE_PAD`, `SLOW_ZONE`).
    pub fn wire_name(self) -> &'static str {
        match self {
            TrapType::Spike => "SPIKE",
            TrapType::BouncePad => "BOUNCE_PAD",
            TrapType::SlowZone => "SLOW_ZONE",
        }
    }

    /// Human-readable label for UI display.
    pub fn label(self) -> &'static str {
        match self {
            TrapType::Spike => "Spike",
            TrapType::BouncePad => "Bounce Pad",
            TrapType::SlowZone => "Slow Zone",
        }
    }

    /// Whether `points` covers the cost of this trap.
    pub fn affordable_with(self, points: u32) -> bool {
        points >= self.cost()
    }
}

impl fmt::Display for TrapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TrapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.wire_name() == s)
            .ok_or_else(|| format!("unknown trap type: {s}"))
    }
}

/// Runner position, top-left corner of its body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerInfo {
    pub x: f64,
    pub y: f64,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Server-side identifier. Not used for rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub active: bool,
}

/// A placed trap; `x`/`y` is the top-left of its [`TRAP_SIZE`] footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TrapType,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalInfo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The complete authoritative game state pushed by the server on every tick.
///
/// Snapshots are always received whole. The client never diffs two snapshots
/// or predicts between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub level: u32,
    pub player_points: u32,
    /// Seconds since the level started.
    pub elapsed_time: f64,
    pub speed_multiplier: f64,
    pub runner: RunnerInfo,
    pub platforms: Vec<PlatformInfo>,
    pub traps: Vec<TrapInfo>,
    pub goal: GoalInfo,
}

impl GameSnapshot {
    /// Decode one inbound text frame.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// `true` when the player has cleared the last level.
    pub fn is_campaign_won(&self) -> bool {
        self.status == GameStatus::PlayerWins && self.level >= MAX_LEVEL
    }

    /// `true` when a won level can be followed by another one.
    pub fn can_continue(&self) -> bool {
        self.status == GameStatus::PlayerWins && self.level < MAX_LEVEL
    }

    /// Whether the current points cover `trap`.
    pub fn can_afford(&self, trap: TrapType) -> bool {
        trap.affordable_with(self.player_points)
    }

    /// Runner speed as a whole percentage (`1.25` → `125`).
    pub fn speed_percent(&self) -> i64 {
        (self.speed_multiplier * 100.0).round() as i64
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Start (or restart) the current level.
    Start,

    /// Restart the current level without resetting progress.
    Restart,

    /// Advance after a won level.
    NextLevel,

    /// Place a trap at a canvas-space position.
    PlaceTrap {
        #[serde(rename = "trapType")]
        trap_type: TrapType,
        x: f64,
        y: f64,
    },
}

impl ClientMessage {
    /// Encode as a single outbound text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "RUNNING",
        "playerPoints": 120,
        "elapsedTime": 3.25,
        "level": 2,
        "speedMultiplier": 1.25,
        "runner": {"x": 40.0, "y": 300.0, "alive": true},
        "platforms": [
            {"id": "p1", "x": 0, "y": 420, "width": 800, "height": 30, "active": true},
            {"id": "p2", "x": 200, "y": 350, "width": 100, "height": 15, "active": false}
        ],
        "traps": [{"id": "t1", "type": "BOUNCE_PAD", "x": 310.5, "y": 390}],
        "goal": {"x": 740, "y": 360, "width": 40, "height": 60}
    }"#;

    #[test]
    fn decodes_server_snapshot() {
        let snap = GameSnapshot::from_json(SAMPLE).unwrap();
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.level, 2);
        assert_eq!(snap.player_points, 120);
        assert_eq!(snap.platforms.len(), 2);
        assert!(!snap.platforms[1].active);
        assert_eq!(snap.traps[0].kind, TrapType::BouncePad);
        assert_eq!(snap.traps[0].id.as_deref(), Some("t1"));
        assert_eq!(snap.speed_percent(), 125);
    }

    #[test]
    fn ids_are_optional() {
        let raw = SAMPLE.replace(r#""id": "p1", "#, "");
        let snap = GameSnapshot::from_json(&raw).unwrap();
        assert_eq!(snap.platforms[0].id, None);
    }

    #[test]
    fn rejects_unknown_status() {
        let raw = SAMPLE.replace("RUNNING", "PAUSED");
        assert!(GameSnapshot::from_json(&raw).is_err());
    }

    #[test]
    fn encodes_intents_with_wire_names() {
        assert_eq!(ClientMessage::Start.to_json().unwrap(), r#"{"type":"START"}"#);
        assert_eq!(
            ClientMessage::NextLevel.to_json().unwrap(),
            r#"{"type":"NEXT_LEVEL"}"#
        );
        let place = ClientMessage::PlaceTrap {
            trap_type: TrapType::SlowZone,
            x: 200.0,
            y: 100.5,
        };
        let value: serde_json::Value = serde_json::from_str(&place.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "PLACE_TRAP");
        assert_eq!(value["trapType"], "SLOW_ZONE");
        assert_eq!(value["x"], 200.0);
        assert_eq!(value["y"], 100.5);
    }

    #[test]
    fn trap_costs_and_order() {
        assert_eq!(TrapType::Spike.cost(), 50);
        assert_eq!(TrapType::BouncePad.cost(), 20);
        assert_eq!(TrapType::SlowZone.cost(), 15);
        assert_eq!(TrapType::from_index(1), Some(TrapType::BouncePad));
        assert_eq!(TrapType::from_index(3), None);
        assert!(!TrapType::Spike.affordable_with(49));
        assert!(TrapType::Spike.affordable_with(50));
    }

    #[test]
    fn trap_names_round_trip_through_from_str() {
        for trap in TrapType::ALL {
            assert_eq!(trap.wire_name().parse::<TrapType>(), Ok(trap));
        }
        assert!("LAVA".parse::<TrapType>().is_err());
    }

    #[test]
    fn continue_only_below_max_level() {
        let mut snap = GameSnapshot::from_json(SAMPLE).unwrap();
        snap.status = GameStatus::PlayerWins;
        snap.level = 3;
        assert!(snap.can_continue());
        assert!(!snap.is_campaign_won());
        snap.level = MAX_LEVEL;
        assert!(!snap.can_continue());
        assert!(snap.is_campaign_won());
    }
}
