//! Trap selection and placement validation.
//!
//! The checks here are advisory. They spare the player a round trip for
//! placements that would obviously fail, but the server still decides what is
//! legal.

use saboteur_core::geometry::Point;
use saboteur_core::protocol::{ClientMessage, GameSnapshot, GameStatus, TrapType};
use tracing::debug;

use crate::error::ValidationError;

/// Owns the player's current trap selection.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    selected: Option<TrapType>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `trap`, replacing any previous selection.
    pub fn select_trap(&mut self, trap: TrapType) {
        debug!(%trap, "trap selected");
        self.selected = Some(trap);
    }

    /// Select the trap at option position `index` (0-based). Out-of-range
    /// positions leave the selection unchanged.
    pub fn select_index(&mut self, index: usize) -> Option<TrapType> {
        let trap = TrapType::from_index(index)?;
        self.select_trap(trap);
        Some(trap)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<TrapType> {
        self.selected
    }

    /// Build the `PLACE_TRAP` intent for canvas position `at`, or say why not.
    pub fn prepare_placement(
        &self,
        snapshot: Option<&GameSnapshot>,
        at: Point,
    ) -> Result<ClientMessage, ValidationError> {
        validate_placement(self.selected, snapshot, at)
    }
}

/// Ordered placement checks; the first failure wins.
///
/// 1. a trap is selected,
/// 2. the level is running,
/// 3. the player can pay for the trap.
pub fn validate_placement(
    selected: Option<TrapType>,
    snapshot: Option<&GameSnapshot>,
    at: Point,
) -> Result<ClientMessage, ValidationError> {
    let trap = selected.ok_or(ValidationError::NoTrapSelected)?;
    let snapshot = snapshot
        .filter(|s| s.status == GameStatus::Running)
        .ok_or(ValidationError::NotRunning)?;
    if !snapshot.can_afford(trap) {
        return Err(ValidationError::InsufficientPoints {
            cost: trap.cost(),
            available: snapshot.player_points,
        });
    }
    Ok(ClientMessage::PlaceTrap {
        trap_type: trap,
        x: at.x,
        y: at.y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_store::fixtures::snapshot;

    const AT: Point = Point::new(120.0, 200.0);

    #[test]
    fn selection_is_exclusive() {
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.select_trap(TrapType::Spike);
        dispatcher.select_trap(TrapType::SlowZone);
        assert_eq!(dispatcher.selected(), Some(TrapType::SlowZone));
        dispatcher.deselect();
        assert_eq!(dispatcher.selected(), None);
    }

    #[test]
    fn select_by_position() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(dispatcher.select_index(1), Some(TrapType::BouncePad));
        assert_eq!(dispatcher.select_index(7), None);
        assert_eq!(dispatcher.selected(), Some(TrapType::BouncePad));
    }

    #[test]
    fn no_selection_always_rejected_first() {
        for status in [
            GameStatus::Waiting,
            GameStatus::Running,
            GameStatus::PlayerWins,
            GameStatus::RunnerWins,
        ] {
            let snap = snapshot(status, 1, 1_000);
            assert_eq!(
                validate_placement(None, Some(&snap), AT),
                Err(ValidationError::NoTrapSelected)
            );
        }
        assert_eq!(
            validate_placement(None, None, AT),
            Err(ValidationError::NoTrapSelected)
        );
    }

    #[test]
    fn not_running_rejected() {
        let snap = snapshot(GameStatus::Waiting, 1, 1_000);
        let err = validate_placement(Some(TrapType::SlowZone), Some(&snap), AT).unwrap_err();
        assert_eq!(err.to_string(), "Press START to begin!");
        assert_eq!(
            validate_placement(Some(TrapType::SlowZone), None, AT),
            Err(ValidationError::NotRunning)
        );
    }

    #[test]
    fn affordability_boundary() {
        let poor = snapshot(GameStatus::Running, 1, 49);
        let err = validate_placement(Some(TrapType::Spike), Some(&poor), AT).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientPoints {
                cost: 50,
                available: 49
            }
        );
        assert_eq!(err.to_string(), "Not enough points!");

        let exact = snapshot(GameStatus::Running, 1, 50);
        assert_eq!(
            validate_placement(Some(TrapType::Spike), Some(&exact), AT),
            Ok(ClientMessage::PlaceTrap {
                trap_type: TrapType::Spike,
                x: 120.0,
                y: 200.0
            })
        );
    }
}
