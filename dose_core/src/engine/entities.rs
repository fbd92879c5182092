//! Entities living in the arena during a round

use crate::types::Rgb;

/// Position or velocity in arena units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A fired shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Units per reference frame
    pub velocity: Vec2,
    pub active: bool,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Projectile {
            position,
            velocity,
            active: true,
        }
    }

    /// Advance and bounce off the side walls
    pub(crate) fn advance(&mut self, frames: f64, width: f64) {
        self.position.x += self.velocity.x * frames;
        self.position.y += self.velocity.y * frames;

        if self.position.x <= 0.0 {
            self.position.x = 0.0;
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x >= width {
            self.position.x = width;
            self.velocity.x = -self.velocity.x.abs();
        }
    }
}

/// One unit of infection
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub position: Vec2,
    pub radius: f64,
    pub hit_points: u32,
    pub active: bool,
    /// Oscillation phase, display only
    pub phase: f64,
}

impl Target {
    /// Remove hit points; returns true if this hit destroyed the target
    pub(crate) fn take_hit(&mut self, damage: u32) -> bool {
        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Displayed position including the oscillation
    pub fn wobble_position(&self, amplitude: f64) -> Vec2 {
        Vec2::new(
            self.position.x + self.phase.cos() * amplitude,
            self.position.y + self.phase.sin() * amplitude,
        )
    }
}

/// Short-lived hit effect
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// 1.0 when spawned, removed at 0
    pub life: f64,
    pub color: Rgb,
}
