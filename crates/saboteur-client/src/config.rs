//! Client tuning knobs.
//!
//! Every value has a fixed default matching the live game; frontends may
//! override individual fields (the CLI does so from flags).

use std::time::Duration;

use saboteur_core::geometry::CanvasSize;
use serde::{Deserialize, Serialize};

/// Maximum number of automatic reconnection attempts before giving up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Fixed delay between reconnection attempts in ms (no back-off).
pub const RECONNECT_DELAY_MS: u64 = 3_000;

/// How long a transient status message stays up before reverting.
pub const MESSAGE_DURATION_MS: u64 = 1_500;

/// Path of the game socket on the page's origin.
pub const GAME_PATH: &str = "/game";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub canvas: CanvasSize,
    pub max_reconnect_attempts: u32,
    pub reconnect_delay_ms: u64,
    pub message_duration_ms: u64,
    pub particle_count: usize,
    /// Particles closer than this are joined by a line.
    pub particle_link_distance: f64,
    pub game_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::GAME,
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            message_duration_ms: MESSAGE_DURATION_MS,
            particle_count: 80,
            particle_link_distance: 120.0,
            game_path: GAME_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    /// Build the socket URL for a page served from `host`.
    ///
    /// `secure` selects `wss` (pages loaded over https) over `ws`.
    pub fn socket_url(&self, host: &str, secure: bool) -> String {
        let scheme = if secure { "wss" } else { "ws" };
        let path = if self.game_path.starts_with('/') {
            self.game_path.clone()
        } else {
            format!("/{}", self.game_path)
        };
        format!("{scheme}://{host}{path}")
    }
}
