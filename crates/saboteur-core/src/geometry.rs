//! Canvas-space geometry and the pointer → canvas coordinate mapping.
//!
//! The canvas has a fixed internal resolution but is displayed at whatever
//! size the page layout gives it. Every pointer position must be mapped into
//! internal canvas pixels before it is used for placement or previews.

use serde::{Deserialize, Serialize};

/// A point in some 2D space (client or canvas pixels, depending on context).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centred on `center`.
    pub fn centered_square(center: Point, size: f64) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Internal pixel resolution of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Resolution of the game canvas.
    pub const GAME: CanvasSize = CanvasSize {
        width: 800.0,
        height: 450.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::GAME
    }
}

/// Map a pointer position in client space into canvas pixel space.
///
/// `displayed` is the canvas's on-screen bounding rectangle and `resolution`
/// its internal size. Returns `None` while the canvas has no displayed area
/// (e.g. hidden), since no meaningful mapping exists then.
pub fn client_to_canvas(client: Point, displayed: Rect, resolution: CanvasSize) -> Option<Point> {
    if displayed.width <= 0.0 || displayed.height <= 0.0 {
        return None;
    }
    Some(Point::new(
        (client.x - displayed.x) * resolution.width / displayed.width,
        (client.y - displayed.y) * resolution.height / displayed.height,
    ))
}
