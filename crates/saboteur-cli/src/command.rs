//! Line commands typed at the prompt.

use saboteur_core::geometry::Point;
use saboteur_core::protocol::TrapType;

pub const HELP: &str = "\
commands:
  start            start or restart the level
  next             advance to the next level
  restart          restart the current level
  select <1-3|name> pick a trap (spike, bounce_pad, slow_zone)
  clear            drop the trap selection
  place <x> <y>    place the selected trap at canvas coordinates
  status           print the HUD
  quit             disconnect and exit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Next,
    Restart,
    /// Zero-based trap option index.
    Select(usize),
    SelectTrap(TrapType),
    Clear,
    Place(Point),
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let args: Vec<&str> = words.collect();

        let cmd = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("start", []) => Self::Start,
            ("next", []) => Self::Next,
            ("restart", []) => Self::Restart,
            ("select", [which]) => match which.parse::<usize>() {
                Ok(n) if (1..=TrapType::ALL.len()).contains(&n) => Self::Select(n - 1),
                Ok(n) => return Err(format!("no trap option {n}")),
                Err(_) => Self::SelectTrap(which.to_ascii_uppercase().parse()?),
            },
            ("clear", []) => Self::Clear,
            ("place", [x, y]) => {
                let coord = |s: &str| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| format!("bad coordinate: {s}"))
                };
                Self::Place(Point::new(coord(x)?, coord(y)?))
            }
            ("status", []) => Self::Status,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (verb, _) => return Err(format!("unrecognised command: {verb} (try 'help')")),
        };
        Ok(cmd)
    }
}
