//! Pointer tracking and keyboard shortcuts.

use saboteur_core::geometry::{Point, Rect};
use saboteur_core::protocol::TrapType;

/// A keyboard shortcut, decoded from a DOM-style key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    SelectTrap(TrapType),
    StartOrRestart,
    ClearSelection,
}

/// Decode `key` (a `KeyboardEvent.key` value). Nothing fires while focus is
/// in a text field.
pub fn shortcut_for_key(key: &str, in_text_field: bool) -> Option<Shortcut> {
    if in_text_field {
        return None;
    }
    match key {
        "1" | "2" | "3" => {
            let index = key.parse::<usize>().ok()? - 1;
            TrapType::from_index(index).map(Shortcut::SelectTrap)
        }
        " " | "Enter" => Some(Shortcut::StartOrRestart),
        "Escape" => Some(Shortcut::ClearSelection),
        _ => None,
    }
}

/// Last known pointer position over the game canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Point,
    pub on_surface: bool,
}

impl PointerState {
    pub fn moved_to(&mut self, position: Point) {
        self.position = position;
        self.on_surface = true;
    }

    pub fn entered(&mut self) {
        self.on_surface = true;
    }

    pub fn left(&mut self) {
        self.on_surface = false;
    }

    /// Position to preview a trap at, if the pointer is over the canvas.
    pub fn hover(&self) -> Option<Point> {
        self.on_surface.then_some(self.position)
    }
}

/// Raw user input as delivered by a frontend.
///
/// Pointer events carry client coordinates plus the canvas's displayed
/// bounds at the time of the event; the controller maps them into canvas
/// space.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { client: Point, bounds: Rect },
    PointerEntered,
    PointerLeft,
    Click { client: Point, bounds: Rect },
    Key { key: String, in_text_field: bool },
    /// A trap option was clicked.
    SelectTrap(TrapType),
    Start,
    NextLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_select_by_position() {
        assert_eq!(
            shortcut_for_key("1", false),
            Some(Shortcut::SelectTrap(TrapType::Spike))
        );
        assert_eq!(
            shortcut_for_key("3", false),
            Some(Shortcut::SelectTrap(TrapType::SlowZone))
        );
        assert_eq!(shortcut_for_key("4", false), None);
        assert_eq!(shortcut_for_key("0", false), None);
    }

    #[test]
    fn start_and_escape() {
        assert_eq!(shortcut_for_key(" ", false), Some(Shortcut::StartOrRestart));
        assert_eq!(shortcut_for_key("Enter", false), Some(Shortcut::StartOrRestart));
        assert_eq!(shortcut_for_key("Escape", false), Some(Shortcut::ClearSelection));
        assert_eq!(shortcut_for_key("a", false), None);
    }

    #[test]
    fn suppressed_in_text_fields() {
        for key in ["1", " ", "Enter", "Escape"] {
            assert_eq!(shortcut_for_key(key, true), None);
        }
    }

    #[test]
    fn pointer_hover_tracks_surface() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.hover(), None);
        pointer.moved_to(Point::new(10.0, 20.0));
        assert_eq!(pointer.hover(), Some(Point::new(10.0, 20.0)));
        pointer.left();
        assert_eq!(pointer.hover(), None);
        pointer.entered();
        assert_eq!(pointer.hover(), Some(Point::new(10.0, 20.0)));
    }
}
