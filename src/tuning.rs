//! Data-driven game balance
//!
//! Every number the simulation uses lives in [`Tuning`]. The defaults describe the
//! shipped game; a JSON override can replace any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::pitch::PitchDefinition;

/// Rejected tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pitch arsenal is empty")]
    NoPitches,
    #[error("pitch `{id}` has a negative weight ({weight})")]
    NegativeWeight { id: String, weight: f32 },
    #[error("pitch weights sum to zero")]
    ZeroTotalWeight,
    #[error("pitch `{id}` has an invalid speed range {min}..{max} mph")]
    InvalidSpeedRange { id: String, min: f32, max: f32 },
    #[error("strike zone must have positive size (got {width} x {height})")]
    InvalidZone { width: f32, height: f32 },
    #[error("contact window {start}..{end}s does not fit a {duration}s swing")]
    InvalidSwingWindow { start: f32, end: f32, duration: f32 },
    #[error("sweet spot radius {sweet} must be below max contact radius {max}")]
    InvalidContactRadii { sweet: f32, max: f32 },
    #[error("`{field}` must be within 0..=1 (got {value})")]
    InvalidProbability { field: &'static str, value: f32 },
}

/// Integration constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration, ft/s²
    pub gravity: f32,
    /// Quadratic drag while the pitch is in flight (1/ft)
    pub pitch_drag: f32,
    /// Quadratic drag on a batted ball (1/ft), lower so hits carry
    pub flight_drag: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_FPS2,
            pitch_drag: 0.0015,
            flight_drag: 0.0010,
        }
    }
}

/// Strike zone placement at the plate plane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    pub center_x: f32,
    pub center_y: f32,
    /// Plate width: 17 inches
    pub width: f32,
    pub height: f32,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 2.5,
            width: 17.0 / 12.0,
            height: 2.0,
        }
    }
}

/// Swing timing and bat geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingTuning {
    /// Full swing length in seconds (load through recovery)
    pub duration: f32,
    /// Contact window, seconds since swing start
    pub window_start: f32,
    pub window_end: f32,
    /// Lateral position of the hands (bat pivot)
    pub hands_x: f32,
    /// Ideal contact depth; the hands sit on this plane
    pub contact_z: f32,
    /// Hands to sweet spot
    pub barrel_length: f32,
}

impl Default for SwingTuning {
    fn default() -> Self {
        Self {
            duration: 0.5,
            window_start: 0.14,
            window_end: 0.27,
            hands_x: -2.0,
            contact_z: PLATE_Z - 1.5,
            barrel_length: 2.0,
        }
    }
}

/// Contact scoring and launch shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    /// Beyond this ball-to-barrel distance the swing whiffs
    pub max_radius: f32,
    /// Inside this distance barrel quality is perfect
    pub sweet_radius: f32,
    /// Depth offset from `contact_z` still graded as perfect timing
    pub timing_tight: f32,
    /// Depth offset at which timing quality reaches zero (foul beyond)
    pub timing_loose: f32,
    /// Composite quality below this is fouled off
    pub foul_quality: f32,
    pub min_exit_mph: f32,
    pub max_exit_mph: f32,
    pub base_launch_deg: f32,
    pub quality_launch_bonus_deg: f32,
    /// Launch change per unit of normalized vertical offset
    pub vertical_launch_gain_deg: f32,
    pub min_launch_deg: f32,
    pub max_launch_deg: f32,
    pub max_spray_deg: f32,
    pub spray_jitter_deg: f32,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            max_radius: 1.0,
            sweet_radius: 0.25,
            timing_tight: 0.25,
            timing_loose: 1.0,
            foul_quality: 0.25,
            min_exit_mph: 62.0,
            max_exit_mph: 110.0,
            base_launch_deg: 8.0,
            quality_launch_bonus_deg: 16.0,
            vertical_launch_gain_deg: 25.0,
            min_launch_deg: -5.0,
            max_launch_deg: 45.0,
            max_spray_deg: 32.0,
            spray_jitter_deg: 4.0,
        }
    }
}

/// Pitcher AI behaviour and the pitch arsenal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingTuning {
    pub release: [f32; 3],
    /// Fraction of pitches aimed inside the zone
    pub strike_intent: f32,
    /// Break/gravity perturbation, fraction of the archetype value
    pub perturb_pct: f32,
    /// In-zone targets stay this far inside the edges
    pub edge_margin: f32,
    /// Out-of-zone targets land up to this far outside an edge
    pub ball_band: f32,
    /// Multiplier applied to sampled pitch speeds (difficulty)
    pub speed_scale: f32,
    /// Shooting iterations used to compensate drag when aiming
    pub aim_iterations: u32,
    pub arsenal: Vec<PitchDefinition>,
}

impl Default for PitchingTuning {
    fn default() -> Self {
        Self {
            release: [RELEASE_SIDE, RELEASE_HEIGHT, RELEASE_Z],
            strike_intent: 0.7,
            perturb_pct: 0.2,
            edge_margin: 0.1,
            ball_band: 0.9,
            speed_scale: 1.0,
            aim_iterations: 3,
            arsenal: default_arsenal(),
        }
    }
}

/// The built-in right-handed arsenal
pub fn default_arsenal() -> Vec<PitchDefinition> {
    vec![
        PitchDefinition::new("FF", "Four-Seam Fastball", 90.0, 98.0, 0.0, 14.0, 1.0, 0.5),
        PitchDefinition::new("SL", "Slider", 82.0, 88.0, 9.0, 2.0, 1.0, 0.2),
        PitchDefinition::new("CU", "Curveball", 74.0, 80.0, 5.0, -10.0, 1.1, 0.15),
        PitchDefinition::new("CH", "Changeup", 82.0, 87.0, -7.0, 6.0, 1.05, 0.15),
    ]
}

/// At-bat pacing, bounds and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTuning {
    pub max_strikes: u32,
    /// Outcome display time before returning to Idle
    pub result_dwell: f32,
    /// Throw automatically from Idle
    pub auto_pitch: bool,
    pub auto_pitch_delay: f32,
    /// Pitch is dead once this far past the plate
    pub past_plate_margin: f32,
    /// Batted balls stop being tracked past this distance
    pub max_travel_ft: f32,
    pub points_per_foot: f32,
    pub exit_bonus_floor_mph: f32,
    pub exit_bonus_per_mph: f32,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            max_strikes: 3,
            result_dwell: 1.0,
            auto_pitch: false,
            auto_pitch_delay: 1.5,
            past_plate_margin: 1.0,
            max_travel_ft: 600.0,
            points_per_foot: 0.5,
            exit_bonus_floor_mph: 60.0,
            exit_bonus_per_mph: 1.1,
        }
    }
}

/// Complete, validated balance record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub zone: ZoneTuning,
    pub swing: SwingTuning,
    pub contact: ContactTuning,
    pub pitching: PitchingTuning,
    pub flow: FlowTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let arsenal = &self.pitching.arsenal;
        if arsenal.is_empty() {
            return Err(TuningError::NoPitches);
        }
        for def in arsenal {
            if def.weight < 0.0 {
                return Err(TuningError::NegativeWeight {
                    id: def.id.clone(),
                    weight: def.weight,
                });
            }
            if def.speed_min_mph <= 0.0 || def.speed_min_mph > def.speed_max_mph {
                return Err(TuningError::InvalidSpeedRange {
                    id: def.id.clone(),
                    min: def.speed_min_mph,
                    max: def.speed_max_mph,
                });
            }
        }
        if arsenal.iter().map(|d| d.weight).sum::<f32>() <= 0.0 {
            return Err(TuningError::ZeroTotalWeight);
        }

        let zone = &self.zone;
        if zone.width <= 0.0 || zone.height <= 0.0 {
            return Err(TuningError::InvalidZone {
                width: zone.width,
                height: zone.height,
            });
        }

        let swing = &self.swing;
        if !(0.0 <= swing.window_start
            && swing.window_start < swing.window_end
            && swing.window_end <= swing.duration)
        {
            return Err(TuningError::InvalidSwingWindow {
                start: swing.window_start,
                end: swing.window_end,
                duration: swing.duration,
            });
        }

        let contact = &self.contact;
        if contact.sweet_radius < 0.0 || contact.sweet_radius >= contact.max_radius {
            return Err(TuningError::InvalidContactRadii {
                sweet: contact.sweet_radius,
                max: contact.max_radius,
            });
        }

        for (field, value) in [
            ("pitching.strike_intent", self.pitching.strike_intent),
            ("pitching.perturb_pct", self.pitching.perturb_pct),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::InvalidProbability { field, value });
            }
        }

        Ok(())
    }

    /// Load an override, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!(
                    "Loaded tuning override ({} pitches)",
                    tuning.pitching.arsenal.len()
                );
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }
}
