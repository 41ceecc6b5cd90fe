//! Camera and viewport

use std::time::Duration;

/// Continuously advancing camera that sways horizontally over the room
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    phase: f32,
    speed: f32,
    sway: f32,
}

impl Camera {
    /// `speed` in radians per second, `sway` in scene units
    pub fn new(speed: f32, sway: f32) -> Self {
        Self {
            phase: 0.0,
            speed,
            sway,
        }
    }

    /// A camera that never moves
    pub fn fixed() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn advance(&mut self, dt: Duration) {
        self.phase = (self.phase + self.speed * dt.as_secs_f32()) % std::f32::consts::TAU;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Offset applied to every object when drawing
    pub fn offset(&self) -> (f32, f32) {
        (self.sway * self.phase.sin(), 0.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.5, 10.0)
    }
}

/// Drawing area size in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
