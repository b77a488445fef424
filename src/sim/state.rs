//! Game state and core simulation types
//!
//! The whole session lives in [`GameState`], owned by the caller and passed to
//! [`tick`](super::tick::tick) by mutable reference. Nothing is global.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::contact::{ClosestApproach, ContactOutcome};
use super::pitch::{PitchInstance, PitchSelector, PitchTarget};
use super::swing::Bat;
use super::zone::{PitchCall, StrikeZone};
use crate::fps_to_mph;
use crate::tuning::Tuning;

/// Current phase of the at-bat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a pitch request
    Idle,
    /// Ball in flight toward the plate
    Pitching,
    /// Ball in flight toward the plate with a swing under way
    Swinging,
    /// Batted ball in flight
    BallInPlay,
    /// Showing the outcome before returning to Idle
    Result,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Pitching => "Pitching",
            GamePhase::Swinging => "Swinging",
            GamePhase::BallInPlay => "BallInPlay",
            GamePhase::Result => "Result",
        }
    }

    /// Ball is on its way to the plate
    pub fn is_pitch_live(&self) -> bool {
        matches!(self, GamePhase::Pitching | GamePhase::Swinging)
    }
}

/// Ways to add a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikeKind {
    Swinging,
    Looking,
    /// Never the third strike
    Foul,
}

/// How a pitch ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Ball,
    InTheDirt,
    StrikeSwinging,
    StrikeLooking,
    /// Pitch died without a call or a swing
    Miss,
    Foul,
    Hit { distance_ft: f32, points: u64 },
}

impl Outcome {
    pub fn label(&self) -> String {
        match self {
            Outcome::Ball => "Ball".to_string(),
            Outcome::InTheDirt => "Ball (in the dirt)".to_string(),
            Outcome::StrikeSwinging => "Strike (swinging)".to_string(),
            Outcome::StrikeLooking => "Strike (looking)".to_string(),
            Outcome::Miss => "Miss".to_string(),
            Outcome::Foul => "Foul".to_string(),
            Outcome::Hit { distance_ft, points } => {
                format!("Hit! {:.0} ft (+{})", distance_ft, points)
            }
        }
    }
}

/// Count, outs and score for the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtBatCounters {
    pub strikes: u32,
    /// Never capped
    pub outs: u32,
    pub score: u64,
    pub last_result: String,
    pub last_outcome: Option<Outcome>,
    pub last_call: Option<PitchCall>,
    pub last_pitch_name: String,
    pub last_pitch_mph: f32,
    pub last_distance_ft: f32,
    pub last_exit_mph: f32,
}

impl AtBatCounters {
    /// Add a strike. Returns true when it completes a strikeout.
    ///
    /// A foul with two strikes leaves the count alone.
    pub fn register_strike(&mut self, kind: StrikeKind, max_strikes: u32) -> bool {
        let max_strikes = max_strikes.max(1);
        if kind == StrikeKind::Foul && self.strikes + 1 >= max_strikes {
            return false;
        }
        self.strikes += 1;
        if self.strikes >= max_strikes {
            self.strikes = 0;
            self.outs += 1;
            return true;
        }
        false
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.last_result = outcome.label();
        self.last_outcome = Some(outcome);
    }
}

/// Running totals for the HUD
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub pitches: u32,
    pub swings: u32,
    pub hits: u32,
    pub fouls: u32,
    pub strikeouts: u32,
    pub longest_hit_ft: f32,
}

/// Things that happened during the last tick (for audio/effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PitchThrown,
    SwingStarted,
    PlateCrossed { call: PitchCall },
    Contact { foul: bool, exit_mph: f32 },
    Landed { distance_ft: f32, points: u64 },
    PitchOver(Outcome),
    StrikeOut,
}

/// Demo batter's plan for the current pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoPlan {
    pub will_swing: bool,
    /// Seconds added to the ideal trigger time
    pub timing_error: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Seconds spent in the current phase
    pub phase_timer: f32,
    pub time_ticks: u64,
    pub counters: AtBatCounters,
    pub stats: SessionStats,
    pub ball: Body,
    pub bat: Bat,
    pub zone: StrikeZone,

    // Per-pitch state, cleared when the result dwell ends
    pub pitch: Option<PitchInstance>,
    pub target: Option<PitchTarget>,
    pub call: Option<PitchCall>,
    pub crossing_point: Option<Vec3>,
    pub crossed_plate: bool,
    pub in_dirt: bool,
    /// A swing was started during this pitch
    pub swung: bool,
    pub contact: Option<ContactOutcome>,
    /// Nearest bat-ball candidate while the contact window is open
    pub approach: ClosestApproach,
    pub demo_plan: Option<DemoPlan>,

    /// Events from the most recent tick
    pub events: Vec<GameEvent>,

    pub(crate) selector: PitchSelector,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New session with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// New session with a custom balance record. An invalid record is replaced
    /// by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let zone = StrikeZone::from_tuning(&tuning.zone);
        let selector = PitchSelector::from_tuning(&tuning.pitching);
        let bat = Bat::new(tuning.zone.center_y);
        Self {
            seed,
            phase: GamePhase::Idle,
            phase_timer: 0.0,
            time_ticks: 0,
            counters: AtBatCounters::default(),
            stats: SessionStats::default(),
            ball: Body::default(),
            bat,
            zone,
            pitch: None,
            target: None,
            call: None,
            crossing_point: None,
            crossed_plate: false,
            in_dirt: false,
            swung: false,
            contact: None,
            approach: ClosestApproach::default(),
            demo_plan: None,
            events: Vec::new(),
            selector,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Reset everything that belongs to a single pitch
    pub fn clear_pitch(&mut self) {
        self.pitch = None;
        self.target = None;
        self.call = None;
        self.crossing_point = None;
        self.crossed_plate = false;
        self.in_dirt = false;
        self.swung = false;
        self.contact = None;
        self.approach.clear();
        self.demo_plan = None;
    }

    /// Read-only view for renderers and the HUD
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.counters.score,
            strikes: self.counters.strikes,
            outs: self.counters.outs,
            last_result: self.counters.last_result.clone(),
            last_pitch_name: self.counters.last_pitch_name.clone(),
            last_pitch_mph: self.counters.last_pitch_mph,
            last_distance_ft: self.counters.last_distance_ft,
            last_exit_mph: self.counters.last_exit_mph,
            phase: self.phase.as_str(),
            pitch_live: self.phase.is_pitch_live(),
            pitch: self.pitch.as_ref().map(|p| p.describe()),
            last_call: self.call.or(self.counters.last_call).map(|c| c.as_str()),
            ball_pos: self.ball.pos.to_array(),
            ball_vel: self.ball.vel.to_array(),
            ball_active: self.ball.active,
            ball_speed_mph: fps_to_mph(self.ball.speed()),
            bat_yaw: self.bat.pose.yaw,
            bat_tilt: self.bat.pose.tilt,
            bat_height: self.bat.height,
            contact_window: self.bat.in_contact_window(&self.tuning.swing),
            stats: self.stats.clone(),
        }
    }
}

/// Per-tick display data. Consumers never write back.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub strikes: u32,
    pub outs: u32,
    pub last_result: String,
    pub last_pitch_name: String,
    pub last_pitch_mph: f32,
    pub last_distance_ft: f32,
    pub last_exit_mph: f32,
    pub phase: &'static str,
    pub pitch_live: bool,
    pub pitch: Option<String>,
    pub last_call: Option<&'static str>,
    pub ball_pos: [f32; 3],
    pub ball_vel: [f32; 3],
    pub ball_active: bool,
    pub ball_speed_mph: f32,
    pub bat_yaw: f32,
    pub bat_tilt: f32,
    pub bat_height: f32,
    pub contact_window: bool,
    pub stats: SessionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_strikes_is_an_out() {
        let mut c = AtBatCounters::default();
        assert!(!c.register_strike(StrikeKind::Swinging, 3));
        assert!(!c.register_strike(StrikeKind::Looking, 3));
        assert!(c.register_strike(StrikeKind::Swinging, 3));
        assert_eq!(c.strikes, 0);
        assert_eq!(c.outs, 1);
    }

    #[test]
    fn test_foul_cannot_strike_out() {
        let mut c = AtBatCounters::default();
        assert!(!c.register_strike(StrikeKind::Foul, 3));
        assert!(!c.register_strike(StrikeKind::Foul, 3));
        assert_eq!(c.strikes, 2);
        for _ in 0..5 {
            assert!(!c.register_strike(StrikeKind::Foul, 3));
        }
        assert_eq!(c.strikes, 2);
        assert_eq!(c.outs, 0);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::StrikeLooking.label(), "Strike (looking)");
        assert_eq!(Outcome::InTheDirt.label(), "Ball (in the dirt)");
        let hit = Outcome::Hit {
            distance_ft: 350.0,
            points: 219,
        };
        assert_eq!(hit.label(), "Hit! 350 ft (+219)");
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let mut empty = Tuning::default();
        empty.pitching.arsenal.clear();
        let state = GameState::with_tuning(1, empty);
        assert!(!state.selector.definitions().is_empty());

        let mut inverted = Tuning::default();
        inverted.zone.width = -0.5;
        let state = GameState::with_tuning(1, inverted);
        assert!(!state.zone.is_degenerate());
        assert_eq!(state.tuning.zone.width, Tuning::default().zone.width);
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.ball.active);
        assert_eq!(state.counters.strikes, 0);
        let snap = state.snapshot();
        assert_eq!(snap.phase, "Idle");
        assert!(!snap.pitch_live);
        assert_eq!(snap.ball_speed_mph, 0.0);
        assert!(snap.pitch.is_none());
        assert!(serde_json::to_string(&snap).is_ok());
    }
}
