//! The game canvas render pipeline.
//!
//! [`render_frame`] is a pure function from a [`Frame`] (snapshot, selection,
//! pointer, wall-clock time, surface size) to a display list of [`DrawCmd`]s.
//! Frontends replay the list onto whatever 2D surface they have. The same
//! frame always yields the same list; `time` only feeds the pulsing and
//! bouncing elements.

use saboteur_core::geometry::{CanvasSize, Point, Rect};
use saboteur_core::protocol::{
    GameSnapshot, GameStatus, GoalInfo, MAX_LEVEL, PlatformInfo, RunnerInfo, TRAP_SIZE, TrapType,
};

use crate::input::PointerState;

// ----------------------------------------------------------------------------
// Display list
// ----------------------------------------------------------------------------

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string, `#rrggbb` when opaque.
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient from `from` to `to`, stops at offsets in `0..=1`.
    Linear {
        from: Point,
        to: Point,
        stops: Vec<(f64, Color)>,
    },
    /// Radial gradient between two concentric circles.
    Radial {
        center: Point,
        inner: f64,
        outer: f64,
        stops: Vec<(f64, Color)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    pub const fn glow(color: Color, blur: f64) -> Self {
        Self {
            color,
            blur,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub const fn drop(color: Color, blur: f64, offset_y: f64) -> Self {
        Self {
            color,
            blur,
            offset_x: 0.0,
            offset_y,
        }
    }
}

/// One drawing operation. Text is always centred horizontally on `at.x`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    SetAlpha(f64),
    SetShadow(Option<Shadow>),
    ClearRect(Rect),
    FillRect { rect: Rect, paint: Paint },
    StrokeRect { rect: Rect, color: Color, width: f64 },
    FillPolygon { points: Vec<Point>, paint: Paint },
    /// Open polyline through `points`.
    StrokePath { points: Vec<Point>, color: Color, width: f64 },
    FillCircle { center: Point, radius: f64, color: Color },
    Text {
        text: String,
        at: Point,
        font: &'static str,
        color: Color,
    },
}

// ----------------------------------------------------------------------------
// Palette and dimensions
// ----------------------------------------------------------------------------

pub const BACKGROUND: Color = Color::rgb(0x1a, 0x1a, 0x2e);
const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
const GRAY: Color = Color::rgb(0x88, 0x88, 0x88);
const YELLOW: Color = Color::rgb(0xff, 0xd9, 0x3d);
const RED: Color = Color::rgb(0xff, 0x6b, 0x6b);
const RED_LIGHT: Color = Color::rgb(0xff, 0x87, 0x87);
const GREEN: Color = Color::rgb(0x6b, 0xcb, 0x77);
const GREEN_LIGHT: Color = Color::rgb(0x8b, 0xdb, 0x9d);
const TEAL: Color = Color::rgb(0x4e, 0xcd, 0xc4);
const TEAL_LIGHT: Color = Color::rgb(0x6e, 0xe7, 0xdf);
const PURPLE: Color = Color::rgb(0xa8, 0x55, 0xf7);
const PLATFORM_TOP: Color = Color::rgb(0x5a, 0x65, 0x78);
const PLATFORM_BOTTOM: Color = Color::rgb(0x4a, 0x55, 0x68);
const RUNNER_DEAD: Color = Color::rgb(0x66, 0x66, 0x66);
const BLACK: Color = Color::rgb(0, 0, 0);

const RUNNER_WIDTH: f64 = 20.0;
const RUNNER_HEIGHT: f64 = 30.0;
const EYE: Rect = Rect::new(12.0, 8.0, 4.0, 4.0);
const MOUTH: Rect = Rect::new(8.0, 18.0, 8.0, 2.0);

const PREVIEW_ALPHA: f64 = 0.5;
const PREVIEW_ALPHA_UNAFFORDABLE: f64 = 0.3;
const CROSS_ALPHA: f64 = 0.8;
const CROSS_INSET: f64 = 5.0;

/// `sin(time · rate) · depth + base`.
fn pulse(time: f64, rate: f64, depth: f64, base: f64) -> f64 {
    (time * rate).sin() * depth + base
}

// ----------------------------------------------------------------------------
// Frame
// ----------------------------------------------------------------------------

/// Inputs to one render.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snapshot: Option<&'a GameSnapshot>,
    pub selected: Option<TrapType>,
    pub pointer: PointerState,
    /// Wall-clock seconds.
    pub time: f64,
    pub surface: CanvasSize,
}

/// Produce the display list for one animation tick.
pub fn render_frame(frame: &Frame<'_>) -> Vec<DrawCmd> {
    let mut out = Vec::with_capacity(64);
    out.push(DrawCmd::FillRect {
        rect: frame.surface.bounds(),
        paint: Paint::Solid(BACKGROUND),
    });

    let Some(snapshot) = frame.snapshot else {
        waiting_screen(&mut out, frame.surface, frame.time);
        return out;
    };

    for platform in snapshot.platforms.iter().filter(|p| p.active) {
        platform_shape(&mut out, platform);
    }
    out.push(DrawCmd::SetShadow(None));

    goal_shape(&mut out, &snapshot.goal, frame.time);

    for trap in &snapshot.traps {
        trap_shape(&mut out, trap.kind, Point::new(trap.x, trap.y));
    }

    runner_shape(&mut out, &snapshot.runner);

    if snapshot.status.is_over() {
        game_over_overlay(&mut out, snapshot, frame.surface, frame.time);
    }

    if let (Some(trap), Some(at), GameStatus::Running) =
        (frame.selected, frame.pointer.hover(), snapshot.status)
    {
        trap_preview(&mut out, trap, at, snapshot.can_afford(trap));
    }

    out
}

fn vertical(rect: Rect, top: Color, bottom: Color) -> Paint {
    Paint::Linear {
        from: Point::new(rect.x, rect.y),
        to: Point::new(rect.x, rect.y + rect.height),
        stops: vec![(0.0, top), (1.0, bottom)],
    }
}

fn text(out: &mut Vec<DrawCmd>, text: impl Into<String>, at: Point, font: &'static str, color: Color) {
    out.push(DrawCmd::Text {
        text: text.into(),
        at,
        font,
        color,
    });
}

fn waiting_screen(out: &mut Vec<DrawCmd>, surface: CanvasSize, time: f64) {
    let c = surface.center();
    out.push(DrawCmd::SetShadow(Some(Shadow::glow(RED.with_alpha(0.8), 30.0))));
    text(out, "SABOTEUR", Point::new(c.x, c.y - 20.0), "bold 48px Orbitron, Arial", WHITE);
    out.push(DrawCmd::SetShadow(None));
    text(out, "Click START to begin", Point::new(c.x, c.y + 20.0), "20px Rajdhani, Arial", GRAY);
    text(
        out,
        "▼",
        Point::new(c.x, c.y + 50.0),
        "16px Rajdhani, Arial",
        RED.with_alpha(pulse(time, 2.0, 0.4, 0.6)),
    );
}

fn platform_shape(out: &mut Vec<DrawCmd>, platform: &PlatformInfo) {
    let rect = Rect::new(platform.x, platform.y, platform.width, platform.height);
    out.push(DrawCmd::SetShadow(Some(Shadow::drop(BLACK.with_alpha(0.5), 10.0, 4.0))));
    out.push(DrawCmd::FillRect {
        rect,
        paint: vertical(rect, PLATFORM_TOP, PLATFORM_BOTTOM),
    });
    out.push(DrawCmd::SetShadow(None));
    out.push(DrawCmd::FillRect {
        rect: Rect::new(rect.x, rect.y, rect.width, 2.0),
        paint: Paint::Solid(WHITE.with_alpha(0.1)),
    });
}

fn goal_shape(out: &mut Vec<DrawCmd>, goal: &GoalInfo, time: f64) {
    let rect = Rect::new(goal.x, goal.y, goal.width, goal.height);
    out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN.with_alpha(0.8), 30.0))));
    out.push(DrawCmd::FillRect {
        rect,
        paint: vertical(rect, GREEN_LIGHT, GREEN),
    });
    out.push(DrawCmd::StrokeRect {
        rect,
        color: WHITE.with_alpha(pulse(time, 3.0, 0.3, 0.7)),
        width: 3.0,
    });
    out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN.with_alpha(0.8), 5.0))));
    let c = rect.center();
    text(out, "GOAL", Point::new(c.x, c.y + 4.0), "bold 12px Arial", WHITE);
    out.push(DrawCmd::SetShadow(None));
}

/// Draw a trap of `kind` whose footprint's top-left corner is `origin`.
fn trap_shape(out: &mut Vec<DrawCmd>, kind: TrapType, origin: Point) {
    let s = TRAP_SIZE;
    let Point { x, y } = origin;
    let footprint = Rect::new(x, y, s, s);

    match kind {
        TrapType::Spike => {
            out.push(DrawCmd::SetShadow(Some(Shadow::drop(RED.with_alpha(0.5), 15.0, 4.0))));
            out.push(DrawCmd::FillPolygon {
                points: vec![
                    Point::new(x, y + s),
                    Point::new(x + s / 2.0, y),
                    Point::new(x + s, y + s),
                ],
                paint: vertical(footprint, RED_LIGHT, RED),
            });
            out.push(DrawCmd::SetShadow(None));
            out.push(DrawCmd::StrokePath {
                points: vec![Point::new(x + s / 2.0, y), Point::new(x + s * 0.3, y + s * 0.6)],
                color: WHITE.with_alpha(0.3),
                width: 2.0,
            });
        }
        TrapType::BouncePad => {
            let band = Rect::new(x, y + s - 10.0, s, 10.0);
            out.push(DrawCmd::SetShadow(Some(Shadow::drop(TEAL.with_alpha(0.5), 15.0, 4.0))));
            out.push(DrawCmd::FillRect {
                rect: band,
                paint: vertical(band, TEAL_LIGHT, TEAL),
            });
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(WHITE.with_alpha(0.8), 8.0))));
            out.push(DrawCmd::StrokePath {
                points: vec![
                    Point::new(x + 5.0, y + s - 5.0),
                    Point::new(x + 15.0, y + s - 15.0),
                    Point::new(x + 25.0, y + s - 5.0),
                ],
                color: WHITE,
                width: 2.5,
            });
        }
        TrapType::SlowZone => {
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(PURPLE.with_alpha(0.6), 20.0))));
            out.push(DrawCmd::FillRect {
                rect: footprint,
                paint: Paint::Radial {
                    center: footprint.center(),
                    inner: 0.0,
                    outer: s / 2.0,
                    stops: vec![(0.0, PURPLE.with_alpha(0.6)), (1.0, PURPLE.with_alpha(0.3))],
                },
            });
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(PURPLE.with_alpha(0.6), 10.0))));
            out.push(DrawCmd::StrokeRect {
                rect: footprint,
                color: PURPLE,
                width: 2.0,
            });
            out.push(DrawCmd::SetShadow(None));
            const DIVISIONS: u32 = 4;
            for i in 1..DIVISIONS {
                let offset = s / f64::from(DIVISIONS) * f64::from(i);
                out.push(DrawCmd::StrokePath {
                    points: vec![Point::new(x + offset, y), Point::new(x + offset, y + s)],
                    color: PURPLE.with_alpha(0.4),
                    width: 1.0,
                });
                out.push(DrawCmd::StrokePath {
                    points: vec![Point::new(x, y + offset), Point::new(x + s, y + offset)],
                    color: PURPLE.with_alpha(0.4),
                    width: 1.0,
                });
            }
        }
    }
    out.push(DrawCmd::SetShadow(None));
}

fn runner_shape(out: &mut Vec<DrawCmd>, runner: &RunnerInfo) {
    let body = Rect::new(runner.x, runner.y, RUNNER_WIDTH, RUNNER_HEIGHT);
    if runner.alive {
        out.push(DrawCmd::SetShadow(Some(Shadow::glow(RED.with_alpha(0.8), 20.0))));
        out.push(DrawCmd::FillRect {
            rect: body,
            paint: vertical(body, RED_LIGHT, RED),
        });
    } else {
        out.push(DrawCmd::SetShadow(Some(Shadow::glow(BLACK.with_alpha(0.5), 5.0))));
        out.push(DrawCmd::FillRect {
            rect: body,
            paint: Paint::Solid(RUNNER_DEAD),
        });
    }
    out.push(DrawCmd::SetShadow(None));

    if !runner.alive {
        return;
    }
    let offset = |r: Rect| Rect::new(runner.x + r.x, runner.y + r.y, r.width, r.height);
    out.push(DrawCmd::FillRect {
        rect: offset(EYE),
        paint: Paint::Solid(WHITE),
    });
    out.push(DrawCmd::FillRect {
        rect: offset(MOUTH),
        paint: Paint::Solid(WHITE),
    });
    out.push(DrawCmd::FillRect {
        rect: Rect::new(runner.x + 2.0, runner.y + 2.0, RUNNER_WIDTH - 4.0, 3.0),
        paint: Paint::Solid(WHITE.with_alpha(0.3)),
    });
}

fn game_over_overlay(out: &mut Vec<DrawCmd>, snapshot: &GameSnapshot, surface: CanvasSize, time: f64) {
    let c = surface.center();
    out.push(DrawCmd::FillRect {
        rect: surface.bounds(),
        paint: Paint::Radial {
            center: c,
            inner: 0.0,
            outer: surface.width / 2.0,
            stops: vec![(0.0, BLACK.with_alpha(0.6)), (1.0, BLACK.with_alpha(0.9))],
        },
    });
    let at = |dy: f64| Point::new(c.x, c.y + dy);

    match snapshot.status {
        GameStatus::PlayerWins if snapshot.is_campaign_won() => {
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 40.0))));
            text(out, "VICTORY!", at(-40.0), "bold 64px Orbitron, Arial", GREEN);
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 20.0))));
            text(
                out,
                format!("You beat all {MAX_LEVEL} levels!"),
                at(10.0),
                "32px Rajdhani, Arial",
                YELLOW,
            );
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 10.0))));
            text(
                out,
                format!("Final Score: {}", snapshot.player_points),
                at(50.0),
                "bold 24px Rajdhani, Arial",
                WHITE,
            );
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 15.0))));
            for i in 0..5u32 {
                let bounce = (time * 3.0 + f64::from(i)).sin() * 5.0;
                text(
                    out,
                    "★",
                    Point::new(c.x - 100.0 + f64::from(i) * 50.0, c.y + 100.0 + bounce),
                    "40px Arial",
                    YELLOW,
                );
            }
        }
        GameStatus::PlayerWins => {
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 40.0))));
            text(
                out,
                format!("LEVEL {} CLEAR!", snapshot.level),
                at(-20.0),
                "bold 64px Orbitron, Arial",
                GREEN,
            );
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 15.0))));
            text(out, "Click NEXT LEVEL to continue", at(30.0), "28px Rajdhani, Arial", WHITE);
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(GREEN, 20.0))));
            text(
                out,
                "▶",
                at(70.0),
                "32px Arial",
                GREEN.with_alpha(pulse(time, 3.0, 0.4, 0.6)),
            );
        }
        GameStatus::RunnerWins => {
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(RED, 40.0))));
            text(out, "RUNNER ESCAPED!", at(-20.0), "bold 56px Orbitron, Arial", RED);
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(RED, 15.0))));
            text(
                out,
                format!("Level {} - Click RETRY", snapshot.level),
                at(30.0),
                "28px Rajdhani, Arial",
                WHITE,
            );
            out.push(DrawCmd::SetShadow(Some(Shadow::glow(RED, 25.0))));
            text(
                out,
                "⚠",
                at(80.0),
                "bold 48px Arial",
                RED.with_alpha(pulse(time, 3.0, 0.3, 0.7)),
            );
        }
        GameStatus::Waiting | GameStatus::Running => {}
    }
    out.push(DrawCmd::SetShadow(None));
}

fn trap_preview(out: &mut Vec<DrawCmd>, kind: TrapType, at: Point, affordable: bool) {
    let footprint = placement_footprint(at);
    out.push(DrawCmd::Save);
    out.push(DrawCmd::SetAlpha(if affordable {
        PREVIEW_ALPHA
    } else {
        PREVIEW_ALPHA_UNAFFORDABLE
    }));
    trap_shape(out, kind, Point::new(footprint.x, footprint.y));

    if !affordable {
        let (l, t) = (footprint.x + CROSS_INSET, footprint.y + CROSS_INSET);
        let (r, b) = (
            footprint.x + TRAP_SIZE - CROSS_INSET,
            footprint.y + TRAP_SIZE - CROSS_INSET,
        );
        out.push(DrawCmd::SetAlpha(CROSS_ALPHA));
        out.push(DrawCmd::StrokePath {
            points: vec![Point::new(l, t), Point::new(r, b)],
            color: RED,
            width: 3.0,
        });
        out.push(DrawCmd::StrokePath {
            points: vec![Point::new(r, t), Point::new(l, b)],
            color: RED,
            width: 3.0,
        });
    }
    out.push(DrawCmd::Restore);
}

/// The footprint a trap placed at `center` would occupy.
pub fn placement_footprint(center: Point) -> Rect {
    Rect::centered_square(center, TRAP_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_store::fixtures::snapshot;
    use saboteur_core::protocol::TrapInfo;

    fn frame<'a>(snapshot: Option<&'a GameSnapshot>, time: f64) -> Frame<'a> {
        Frame {
            snapshot,
            selected: None,
            pointer: PointerState::default(),
            time,
            surface: CanvasSize::GAME,
        }
    }

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn hovering(at: Point) -> PointerState {
        let mut pointer = PointerState::default();
        pointer.moved_to(at);
        pointer
    }

    #[test]
    fn identical_inputs_render_identically() {
        let mut snap = snapshot(GameStatus::Running, 2, 30);
        snap.traps.push(TrapInfo {
            id: None,
            kind: TrapType::SlowZone,
            x: 100.0,
            y: 380.0,
        });
        let f = Frame {
            selected: Some(TrapType::Spike),
            pointer: hovering(Point::new(300.0, 200.0)),
            ..frame(Some(&snap), 42.125)
        };
        assert_eq!(render_frame(&f), render_frame(&f));
    }

    #[test]
    fn time_only_moves_pulsing_elements() {
        let snap = snapshot(GameStatus::Running, 1, 30);
        let a = render_frame(&frame(Some(&snap), 1.0));
        let b = render_frame(&frame(Some(&snap), 2.0));
        assert_eq!(a.len(), b.len());
        let differing: Vec<_> = a.iter().zip(&b).filter(|(x, y)| x != y).collect();
        assert_eq!(differing.len(), 1);
        assert!(matches!(differing[0].0, DrawCmd::StrokeRect { width, .. } if *width == 3.0));
    }

    #[test]
    fn waiting_screen_without_snapshot() {
        let cmds = render_frame(&frame(None, 0.0));
        assert_eq!(
            cmds[0],
            DrawCmd::FillRect {
                rect: CanvasSize::GAME.bounds(),
                paint: Paint::Solid(BACKGROUND)
            }
        );
        assert_eq!(texts(&cmds), vec!["SABOTEUR", "Click START to begin", "▼"]);
    }

    #[test]
    fn inactive_platforms_are_skipped() {
        let snap = snapshot(GameStatus::Running, 1, 0);
        let cmds = render_frame(&frame(Some(&snap), 0.0));
        let platform_fills = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillRect { paint: Paint::Linear { stops, .. }, .. } if stops[0].1 == PLATFORM_TOP))
            .count();
        assert_eq!(platform_fills, 1);
    }

    #[test]
    fn dead_runner_has_no_face() {
        let mut snap = snapshot(GameStatus::RunnerWins, 1, 0);
        snap.runner.alive = false;
        let cmds = render_frame(&frame(Some(&snap), 0.0));
        let eye = Rect::new(snap.runner.x + 12.0, snap.runner.y + 8.0, 4.0, 4.0);
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::FillRect { paint: Paint::Solid(color), .. } if *color == RUNNER_DEAD)));
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::FillRect { rect, .. } if *rect == eye)));

        snap.runner.alive = true;
        let cmds = render_frame(&frame(Some(&snap), 0.0));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::FillRect { rect, .. } if *rect == eye)));
    }

    #[test]
    fn overlay_copy_by_outcome() {
        let clear = snapshot(GameStatus::PlayerWins, 3, 10);
        assert_eq!(
            texts(&render_frame(&frame(Some(&clear), 0.0)))[1..],
            ["LEVEL 3 CLEAR!", "Click NEXT LEVEL to continue", "▶"]
        );

        let won = snapshot(GameStatus::PlayerWins, 5, 640);
        let cmds = render_frame(&frame(Some(&won), 0.0));
        let t = texts(&cmds);
        assert!(t.contains(&"VICTORY!"));
        assert!(t.contains(&"Final Score: 640"));
        assert_eq!(t.iter().filter(|s| **s == "★").count(), 5);
        assert!(!t.contains(&"Click NEXT LEVEL to continue"));

        let lost = snapshot(GameStatus::RunnerWins, 4, 0);
        assert_eq!(
            texts(&render_frame(&frame(Some(&lost), 0.0)))[1..],
            ["RUNNER ESCAPED!", "Level 4 - Click RETRY", "⚠"]
        );

        let running = snapshot(GameStatus::Running, 1, 0);
        assert_eq!(texts(&render_frame(&frame(Some(&running), 0.0))), vec!["GOAL"]);
    }

    #[test]
    fn preview_requires_selection_running_and_hover() {
        let running = snapshot(GameStatus::Running, 1, 100);
        let at = Point::new(200.0, 200.0);

        let with = |snap: &GameSnapshot, selected, pointer| {
            render_frame(&Frame {
                selected,
                pointer,
                ..frame(Some(snap), 0.0)
            })
        };
        fn has_preview(cmds: &[DrawCmd]) -> bool {
            cmds.contains(&DrawCmd::Save)
        }

        assert!(has_preview(&with(&running, Some(TrapType::Spike), hovering(at))));
        assert!(!has_preview(&with(&running, None, hovering(at))));
        assert!(!has_preview(&with(&running, Some(TrapType::Spike), PointerState::default())));

        let waiting = snapshot(GameStatus::Waiting, 1, 100);
        assert!(!has_preview(&with(&waiting, Some(TrapType::Spike), hovering(at))));
    }

    #[test]
    fn unaffordable_preview_is_crossed_out() {
        let at = Point::new(200.0, 200.0);
        let render = |points| {
            let snap = snapshot(GameStatus::Running, 1, points);
            render_frame(&Frame {
                selected: Some(TrapType::Spike),
                pointer: hovering(at),
                ..frame(Some(&snap), 0.0)
            })
        };

        let rich = render(50);
        assert!(rich.contains(&DrawCmd::SetAlpha(PREVIEW_ALPHA)));
        assert!(!rich.contains(&DrawCmd::SetAlpha(CROSS_ALPHA)));

        let poor = render(49);
        assert!(poor.contains(&DrawCmd::SetAlpha(PREVIEW_ALPHA_UNAFFORDABLE)));
        assert!(poor.contains(&DrawCmd::SetAlpha(CROSS_ALPHA)));
        assert!(poor.contains(&DrawCmd::StrokePath {
            points: vec![Point::new(190.0, 190.0), Point::new(210.0, 210.0)],
            color: RED,
            width: 3.0,
        }));
        assert_eq!(poor.last(), Some(&DrawCmd::Restore));
    }

    #[test]
    fn preview_is_centred_on_pointer() {
        assert_eq!(
            placement_footprint(Point::new(100.0, 100.0)),
            Rect::new(85.0, 85.0, 30.0, 30.0)
        );
    }

    #[test]
    fn css_colours() {
        assert_eq!(BACKGROUND.to_css(), "#1a1a2e");
        assert_eq!(RED.with_alpha(0.5).to_css(), "rgba(255, 107, 107, 0.5)");
    }
}
