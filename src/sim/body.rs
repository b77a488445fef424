//! Point-mass projectile under constant acceleration and quadratic drag

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec3,
    pub vel: Vec3,
    pub active: bool,
    /// Set by bat contact, cleared on the next throw
    pub struck: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: Vec3::from_array(BALL_PARK_POSITION),
            vel: Vec3::ZERO,
            active: false,
            struck: false,
        }
    }
}

impl Body {
    /// Put a fresh, un-struck ball in flight
    pub fn throw(&mut self, pos: Vec3, vel: Vec3) {
        self.pos = pos;
        self.vel = vel;
        self.active = true;
        self.struck = false;
    }

    /// Advance one step: acceleration, then drag against the new velocity, then position.
    ///
    /// `accel` is the total constant acceleration (gravity plus any pitch break).
    pub fn update(&mut self, dt: f32, accel: Vec3, drag: f32) {
        if !self.active {
            return;
        }

        self.vel += accel * dt;

        let speed = self.vel.length();
        if speed > MIN_DRAG_SPEED {
            self.vel += (self.vel / speed) * (-drag * speed * speed) * dt;
        }

        self.pos += self.vel * dt;
    }

    /// Bat impact: discontinuous velocity change
    pub fn launch(&mut self, vel: Vec3) {
        self.vel = vel;
        self.active = true;
        self.struck = true;
    }

    /// Stop integrating. Position is left where it is.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Move an inactive ball off the field
    pub fn park(&mut self) {
        self.active = false;
        self.pos = Vec3::from_array(BALL_PARK_POSITION);
        self.vel = Vec3::ZERO;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
