//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod body;
pub mod contact;
pub mod pitch;
pub mod state;
pub mod swing;
pub mod tick;
pub mod zone;

pub use body::Body;
pub use contact::{
    ClosestApproach, ContactCandidate, ContactOutcome, ContactScore, Launch, measure_contact,
    resolve_contact, score_contact,
};
pub use pitch::{PitchDefinition, PitchInstance, PitchSelector, PitchTarget, choose_weighted};
pub use state::{
    AtBatCounters, GameEvent, GamePhase, GameState, Outcome, SessionStats, Snapshot, StrikeKind,
};
pub use swing::{Bat, BatPose, Easing};
pub use tick::{TickInput, hit_points, start_pitch, throw_pitch, tick};
pub use zone::{PitchCall, StrikeZone, plate_crossing};
