//! Pitcher AI: archetype selection, per-pitch variation and aiming
//!
//! A pitch is picked by weight, its stats are jittered so no two deliveries are
//! identical, and it is aimed at a target point chosen with a strike/ball bias.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::zone::{PitchCall, StrikeZone, plate_crossing};
use crate::consts::*;
use crate::mph_to_fps;
use crate::tuning::{PhysicsTuning, PitchingTuning};

/// Immutable pitch archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchDefinition {
    pub id: String,
    pub name: String,
    pub speed_min_mph: f32,
    pub speed_max_mph: f32,
    /// Constant lateral acceleration, ft/s² (+x is glove side for a righty)
    pub break_x: f32,
    /// Constant vertical acceleration on top of gravity, ft/s² (+ is ride)
    pub break_y: f32,
    pub gravity_scale: f32,
    /// Relative selection weight
    pub weight: f32,
}

impl PitchDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        speed_min_mph: f32,
        speed_max_mph: f32,
        break_x: f32,
        break_y: f32,
        gravity_scale: f32,
        weight: f32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            speed_min_mph,
            speed_max_mph,
            break_x,
            break_y,
            gravity_scale,
            weight,
        }
    }
}

/// One concrete delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchInstance {
    pub id: String,
    pub name: String,
    pub speed_mph: f32,
    pub break_x: f32,
    pub break_y: f32,
    pub gravity_scale: f32,
}

impl PitchInstance {
    /// A pitch with no break and normal gravity
    pub fn straight(name: &str, speed_mph: f32) -> Self {
        Self {
            id: "ST".to_string(),
            name: name.to_string(),
            speed_mph,
            break_x: 0.0,
            break_y: 0.0,
            gravity_scale: 1.0,
        }
    }

    /// Total constant acceleration while in flight to the plate
    pub fn accel(&self, gravity: f32) -> Vec3 {
        Vec3::new(
            self.break_x,
            self.break_y - gravity * self.gravity_scale,
            0.0,
        )
    }

    pub fn describe(&self) -> String {
        format!("{} {:.1} mph", self.name, self.speed_mph)
    }
}

/// Where a pitch is headed and whether it was meant as a strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchTarget {
    pub point: Vec3,
    pub intent: PitchCall,
}

/// Lowest aim point for a pitch below the zone, ft
const LOW_TARGET_FLOOR: f32 = 0.25;

/// Index of the weighted entry that `r` lands in.
///
/// `r` is expected in `[0, total)`. Rounding can leave `r` past the last cumulative
/// sum, in which case the last entry is returned.
pub fn choose_weighted(weights: &[f32], r: f32) -> usize {
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > r {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

/// `value` jittered by up to ±`pct` of itself
fn perturb<R: Rng>(rng: &mut R, value: f32, pct: f32) -> f32 {
    value + value * pct * rng.random_range(-1.0f32..=1.0)
}

/// Pitch selection and targeting
#[derive(Debug, Clone)]
pub struct PitchSelector {
    definitions: Vec<PitchDefinition>,
    weights: Vec<f32>,
    total_weight: f32,
    perturb_pct: f32,
    strike_intent: f32,
    edge_margin: f32,
    ball_band: f32,
    speed_scale: f32,
}

impl PitchSelector {
    pub fn from_tuning(tuning: &PitchingTuning) -> Self {
        let weights: Vec<f32> = tuning.arsenal.iter().map(|d| d.weight.max(0.0)).collect();
        Self {
            definitions: tuning.arsenal.clone(),
            total_weight: weights.iter().sum(),
            weights,
            perturb_pct: tuning.perturb_pct,
            strike_intent: tuning.strike_intent,
            edge_margin: tuning.edge_margin,
            ball_band: tuning.ball_band,
            speed_scale: tuning.speed_scale,
        }
    }

    pub fn definitions(&self) -> &[PitchDefinition] {
        &self.definitions
    }

    /// Weighted archetype pick
    pub fn choose_definition<R: Rng>(&self, rng: &mut R) -> &PitchDefinition {
        let r = rng.random::<f32>() * self.total_weight;
        &self.definitions[choose_weighted(&self.weights, r)]
    }

    /// Pick an archetype and realize it as a concrete pitch
    pub fn choose_next_pitch<R: Rng>(&self, rng: &mut R) -> PitchInstance {
        let def = self.choose_definition(rng);
        let speed = rng.random_range(def.speed_min_mph..=def.speed_max_mph) * self.speed_scale;
        let pct = self.perturb_pct;
        PitchInstance {
            id: def.id.clone(),
            name: def.name.clone(),
            speed_mph: speed,
            break_x: perturb(rng, def.break_x, pct),
            break_y: perturb(rng, def.break_y, pct),
            gravity_scale: perturb(rng, def.gravity_scale, pct),
        }
    }

    /// Plate-plane aim point: inside the zone with probability `strike_intent`,
    /// otherwise in a band just off one of the four edges.
    pub fn choose_target<R: Rng>(&self, rng: &mut R, zone: &StrikeZone) -> PitchTarget {
        if zone.is_degenerate() {
            let center = (zone.left + zone.right) * 0.5;
            return PitchTarget {
                point: Vec3::new(center, zone.center_y(), PLATE_Z),
                intent: PitchCall::Ball,
            };
        }

        let m = self.edge_margin.min(zone.width() * 0.5).min(zone.height() * 0.5);

        if rng.random::<f32>() < self.strike_intent {
            let x = rng.random_range(zone.left + m..=zone.right - m);
            let y = rng.random_range(zone.bottom + m..=zone.top - m);
            return PitchTarget {
                point: Vec3::new(x, y, PLATE_Z),
                intent: PitchCall::Strike,
            };
        }

        let band_min = self.edge_margin.max(0.05);
        let band_max = self.ball_band.max(band_min + 0.05);
        let off = rng.random_range(band_min..=band_max);
        let (x, y) = match rng.random_range(0..4u32) {
            0 => (zone.left - off, rng.random_range(zone.bottom..=zone.top)),
            1 => (zone.right + off, rng.random_range(zone.bottom..=zone.top)),
            2 => (rng.random_range(zone.left..=zone.right), zone.top + off),
            _ => {
                // Keep low targets off the ground, but never back inside the band
                let floor = LOW_TARGET_FLOOR.min(zone.bottom - band_min);
                (
                    rng.random_range(zone.left..=zone.right),
                    (zone.bottom - off).max(floor),
                )
            }
        };
        PitchTarget {
            point: Vec3::new(x, y, PLATE_Z),
            intent: PitchCall::Ball,
        }
    }
}

/// Fly a pitch with the real integrator and report where it crosses the plate
fn simulate_crossing(release: Vec3, vel: Vec3, accel: Vec3, drag: f32) -> Option<Vec3> {
    let mut body = Body::default();
    body.throw(release, vel);
    let max_steps = (5.0 / SIM_DT) as usize;
    for _ in 0..max_steps {
        let prev = body.pos;
        body.update(SIM_DT, accel, drag);
        if let Some(point) = plate_crossing(prev, body.pos, PLATE_Z) {
            return Some(point);
        }
        if body.pos.y < 0.0 || body.vel.z <= 0.0 {
            return None;
        }
    }
    None
}

/// Initial velocity that carries `pitch` from `release` through `target`.
///
/// Starts from the drag-free constant-acceleration solution, then corrects the
/// lateral and vertical components by shooting through the integrator.
pub fn aim_velocity(
    release: Vec3,
    target: Vec3,
    pitch: &PitchInstance,
    physics: &PhysicsTuning,
    iterations: u32,
) -> Vec3 {
    let speed = mph_to_fps(pitch.speed_mph).max(1.0);
    let accel = pitch.accel(physics.gravity);
    let depth = (target.z - release.z).max(1.0);
    let flight_time = depth / speed;

    let mut vel = (target - release) / flight_time - accel * (0.5 * flight_time);
    vel.z = speed;

    for _ in 0..iterations {
        let Some(crossing) = simulate_crossing(release, vel, accel, physics.pitch_drag) else {
            break;
        };
        let miss = target - crossing;
        if miss.x.abs() < 1e-3 && miss.y.abs() < 1e-3 {
            break;
        }
        vel.x += miss.x / flight_time;
        vel.y += miss.y / flight_time;
    }

    vel
}
