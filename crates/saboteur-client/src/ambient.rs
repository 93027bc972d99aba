//! Decorative background particles.
//!
//! Entirely independent of the game: particles drift across the viewport,
//! bounce off its edges, and nearby pairs are joined by faint lines. The
//! population is a flat `Vec` of plain records driven by free functions.
//!
//! Linking is an all-pairs pass, O(n²) per tick. Fine at 80 particles; a
//! much larger population would need spatial bucketing.

use rand::RngExt;
use saboteur_core::geometry::{CanvasSize, Point, Rect};

use crate::render::{Color, DrawCmd};

const PARTICLE_COLOR: Color = Color::rgba(255, 107, 107, 1.0);
const MAX_LINK_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    pub opacity: f64,
}

/// Scatter `count` particles uniformly over `viewport`.
pub fn spawn_particles<R: RngExt + ?Sized>(
    rng: &mut R,
    count: usize,
    viewport: CanvasSize,
) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            position: Point::new(
                rng.random_range(0.0..=viewport.width.max(0.0)),
                rng.random_range(0.0..=viewport.height.max(0.0)),
            ),
            velocity: Point::new(rng.random_range(-0.25..0.25), rng.random_range(-0.25..0.25)),
            radius: rng.random_range(1.0..3.0),
            opacity: rng.random_range(0.2..0.7),
        })
        .collect()
}

/// Advance every particle by one tick. A particle outside the viewport has
/// the matching velocity component pointed back inside.
pub fn step_particles(particles: &mut [Particle], viewport: CanvasSize) {
    for p in particles {
        p.position.x += p.velocity.x;
        p.position.y += p.velocity.y;

        if p.position.x < 0.0 {
            p.velocity.x = p.velocity.x.abs();
        } else if p.position.x > viewport.width {
            p.velocity.x = -p.velocity.x.abs();
        }
        if p.position.y < 0.0 {
            p.velocity.y = p.velocity.y.abs();
        } else if p.position.y > viewport.height {
            p.velocity.y = -p.velocity.y.abs();
        }
    }
}

/// Opacity of the link between two particles `distance` apart, or `None`
/// when they are too far apart to be linked.
pub fn link_alpha(distance: f64, max_distance: f64) -> Option<f64> {
    (distance < max_distance).then(|| MAX_LINK_ALPHA * (1.0 - distance / max_distance))
}

/// Display list for one ambient tick: clear, dots, then links.
pub fn draw_particles(particles: &[Particle], viewport: CanvasSize, link_distance: f64) -> Vec<DrawCmd> {
    let mut out = Vec::with_capacity(particles.len() * 2 + 1);
    out.push(DrawCmd::ClearRect(Rect::new(0.0, 0.0, viewport.width, viewport.height)));

    out.extend(particles.iter().map(|p| DrawCmd::FillCircle {
        center: p.position,
        radius: p.radius,
        color: PARTICLE_COLOR.with_alpha(p.opacity),
    }));

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            if let Some(alpha) = link_alpha(a.position.distance_to(b.position), link_distance) {
                out.push(DrawCmd::StrokePath {
                    points: vec![a.position, b.position],
                    color: PARTICLE_COLOR.with_alpha(alpha),
                    width: 1.0,
                });
            }
        }
    }
    out
}

/// A particle population bound to a viewport.
#[derive(Debug, Clone)]
pub struct AmbientField {
    particles: Vec<Particle>,
    viewport: CanvasSize,
    link_distance: f64,
}

impl AmbientField {
    pub fn new<R: RngExt + ?Sized>(
        rng: &mut R,
        count: usize,
        viewport: CanvasSize,
        link_distance: f64,
    ) -> Self {
        Self {
            particles: spawn_particles(rng, count, viewport),
            viewport,
            link_distance,
        }
    }

    /// The viewport changed size. Particles keep their positions; any now
    /// outside drift back in via the edge bounce.
    pub fn resize(&mut self, viewport: CanvasSize) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> CanvasSize {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Step once and return the display list for the new positions.
    pub fn tick(&mut self) -> Vec<DrawCmd> {
        step_particles(&mut self.particles, self.viewport);
        draw_particles(&self.particles, self.viewport, self.link_distance)
    }
}
