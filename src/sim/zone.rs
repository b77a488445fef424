//! Strike zone geometry and plate-crossing detection

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::ZoneTuning;

/// Umpire's call at the plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchCall {
    Strike,
    Ball,
}

impl PitchCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchCall::Strike => "Strike",
            PitchCall::Ball => "Ball",
        }
    }
}

/// Axis-aligned rectangle in the plate plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeZone {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl StrikeZone {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            left: center_x - width / 2.0,
            right: center_x + width / 2.0,
            bottom: center_y - height / 2.0,
            top: center_y + height / 2.0,
        }
    }

    pub fn from_tuning(zone: &ZoneTuning) -> Self {
        Self::new(zone.center_x, zone.center_y, zone.width, zone.height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center_y(&self) -> f32 {
        (self.bottom + self.top) * 0.5
    }

    /// Zero-size zones contain nothing
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Inclusive on every edge
    pub fn contains(&self, x: f32, y: f32) -> bool {
        !self.is_degenerate()
            && x >= self.left
            && x <= self.right
            && y >= self.bottom
            && y <= self.top
    }

    pub fn call(&self, point: Vec3) -> PitchCall {
        if self.contains(point.x, point.y) {
            PitchCall::Strike
        } else {
            PitchCall::Ball
        }
    }
}

/// Interpolation factor where the segment `prev → curr` meets the plate plane.
///
/// Only a crossing in the direction of travel (`prev.z < plate_z <= curr.z`) counts.
pub fn crossing_t(prev_z: f32, curr_z: f32, plate_z: f32) -> Option<f32> {
    if prev_z < plate_z && plate_z <= curr_z {
        Some((plate_z - prev_z) / (curr_z - prev_z))
    } else {
        None
    }
}

/// Exact point where the ball crossed the plate this step, if it did
pub fn plate_crossing(prev: Vec3, curr: Vec3, plate_z: f32) -> Option<Vec3> {
    crossing_t(prev.z, curr.z, plate_z).map(|t| prev.lerp(curr, t))
}
