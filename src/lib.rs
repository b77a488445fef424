//! Batter's Box - An arcade baseball batting simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pitch flight, swing, contact, at-bat flow)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (difficulty, auto-pitch)

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz keeps a 100 mph pitch under 1.3 ft per step)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Miles per hour to feet per second
    pub const MPH_TO_FPS: f32 = 5280.0 / 3600.0;
    /// Standard gravity in ft/s²
    pub const GRAVITY_FPS2: f32 = 32.174;

    /// Plate plane depth (z grows from the mound toward the batter)
    pub const PLATE_Z: f32 = 0.0;
    /// Release point: 60.5 ft rubber minus ~5.5 ft of stride/extension
    pub const RELEASE_Z: f32 = -55.0;
    pub const RELEASE_HEIGHT: f32 = 6.0;
    /// Release side offset (right-handed pitcher, third-base side of the rubber)
    pub const RELEASE_SIDE: f32 = -1.5;

    /// Where an inactive ball is parked, well away from the field of play
    pub const BALL_PARK_POSITION: [f32; 3] = [0.0, -100.0, 0.0];
    /// Speeds below this skip the drag term (avoids normalizing a zero vector)
    pub const MIN_DRAG_SPEED: f32 = 1e-4;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `value` from [`edge0`, `edge1`] to a [1, 0] falloff, clamped.
///
/// Returns 1.0 at or below `edge0`, 0.0 at or above `edge1`.
#[inline]
pub fn linear_falloff(value: f32, edge0: f32, edge1: f32) -> f32 {
    if value <= edge0 {
        1.0
    } else if value >= edge1 || edge1 <= edge0 {
        0.0
    } else {
        1.0 - (value - edge0) / (edge1 - edge0)
    }
}

/// Convert mph to ft/s
#[inline]
pub fn mph_to_fps(mph: f32) -> f32 {
    mph * consts::MPH_TO_FPS
}

/// Convert ft/s to mph
#[inline]
pub fn fps_to_mph(fps: f32) -> f32 {
    fps / consts::MPH_TO_FPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_falloff() {
        assert_eq!(linear_falloff(0.1, 0.25, 1.0), 1.0);
        assert_eq!(linear_falloff(1.5, 0.25, 1.0), 0.0);
        assert!((linear_falloff(0.625, 0.25, 1.0) - 0.5).abs() < 1e-6);
        // Degenerate band never divides by zero
        assert_eq!(linear_falloff(0.5, 0.5, 0.5), 1.0);
        assert_eq!(linear_falloff(0.6, 0.5, 0.5), 0.0);
    }

    #[test]
    fn test_speed_conversions() {
        assert!((mph_to_fps(60.0) - 88.0).abs() < 1e-3);
        assert!((fps_to_mph(mph_to_fps(95.0)) - 95.0).abs() < 1e-3);
    }
}
