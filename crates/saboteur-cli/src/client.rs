//! Terminal event loop: feeds socket and timer events plus typed commands
//! into a [`ClientController`] and prints the HUD when it changes.

use saboteur_client::config::ClientConfig;
use saboteur_client::connection::ConnectionState;
use saboteur_client::controller::{ClientController, PollResult};
use saboteur_client::hud::HudView;
use saboteur_client::native::NativePlatform;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::command::{Command, HELP};

type Controller = ClientController<NativePlatform>;

/// Connect to `url` and run until the user quits, stdin closes, or the
/// connection gives up.
pub async fn run(url: String, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (platform, mut events) = NativePlatform::new();
    let mut ctrl = ClientController::new(platform, url, config);
    ctrl.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = None;

    let result = loop {
        print_if_changed(&ctrl.hud(), &mut shown);

        tokio::select! {
            Some(event) = events.recv() => {
                if ctrl.handle_event(event) == PollResult::Connection(ConnectionState::Failed) {
                    print_if_changed(&ctrl.hud(), &mut shown);
                    warn!("reconnect attempts exhausted, exiting");
                    break Err("connection failed".into());
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break Ok(()),
                    Ok(cmd) => apply(&mut ctrl, cmd, &mut shown),
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    };

    info!("shutting down");
    ctrl.shutdown();
    result
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn apply(ctrl: &mut Controller, cmd: Command, shown: &mut Option<Summary>) {
    match cmd {
        Command::Start => ctrl.start_game(),
        Command::Next => ctrl.next_level(),
        Command::Restart => ctrl.restart(),
        Command::Select(index) => {
            if let Some(trap) = ctrl.select_index(index) {
                println!("Selected {} ({} points)", trap.label(), trap.cost());
            }
        }
        Command::SelectTrap(trap) => {
            ctrl.select_trap(trap);
            println!("Selected {} ({} points)", trap.label(), trap.cost());
        }
        Command::Clear => ctrl.deselect(),
        Command::Place(at) => {
            // Rejections already land on the status line.
            let _ = ctrl.attempt_place_trap(at);
        }
        Command::Status => {
            *shown = None;
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The parts of the HUD worth a new line. The clock ticks every snapshot and
/// is only printed alongside a change here.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Summary {
    level: String,
    points: String,
    status: String,
    continue_visible: bool,
}

impl From<&HudView> for Summary {
    fn from(view: &HudView) -> Self {
        Self {
            level: view.level.clone(),
            points: view.points.clone(),
            status: view.status.text.clone(),
            continue_visible: view.continue_visible,
        }
    }
}

fn format_hud(view: &HudView) -> String {
    let mut line = format!(
        "{} | {} | {} | {}",
        view.level, view.points, view.time, view.status.text
    );
    if view.continue_visible {
        line.push_str(" ['next' to continue]");
    }
    line
}

fn print_if_changed(view: &HudView, shown: &mut Option<Summary>) {
    let summary = Summary::from(view);
    if shown.as_ref() != Some(&summary) {
        println!("{}", format_hud(view));
        *shown = Some(summary);
    }
}
