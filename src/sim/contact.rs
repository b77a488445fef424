//! Ball-bat contact: proximity test, quality scoring and launch vector
//!
//! Contact is judged against the ball's swept segment for the step rather than
//! its end position; a 100 mph pitch covers more than a foot per step.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::swing::Bat;
use crate::tuning::{ContactTuning, SwingTuning};
use crate::{lerp, linear_falloff, mph_to_fps};

const BARREL_WEIGHT: f32 = 0.55;
const TIMING_WEIGHT: f32 = 0.35;
const VERTICAL_WEIGHT: f32 = 0.10;

/// Closest point to `p` on the segment `a → b`
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 1e-8 {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    a + seg * t
}

/// How well the ball was struck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactScore {
    /// Ball to sweet spot
    pub distance: f32,
    pub barrel: f32,
    pub timing: f32,
    pub vertical: f32,
    /// Ball depth relative to the ideal contact plane (negative = out front, early)
    pub timing_offset: f32,
    /// Ball height relative to the sweet spot (positive = bat under the ball)
    pub vertical_offset: f32,
    pub quality: f32,
    pub foul: bool,
}

/// Grade a ball position against the sweet spot. `None` means the bat missed.
pub fn score_contact(
    ball: Vec3,
    sweet_spot: Vec3,
    contact_z: f32,
    tuning: &ContactTuning,
) -> Option<ContactScore> {
    let distance = ball.distance(sweet_spot);
    if distance > tuning.max_radius {
        return None;
    }

    let barrel = linear_falloff(distance, tuning.sweet_radius, tuning.max_radius);

    let timing_offset = ball.z - contact_z;
    let late_or_early = timing_offset.abs();
    let timing = linear_falloff(late_or_early, tuning.timing_tight, tuning.timing_loose);
    let timing_miss = late_or_early > tuning.timing_loose;

    let vertical_offset = ball.y - sweet_spot.y;
    let vertical = (1.0 - vertical_offset.abs() / tuning.max_radius).max(0.0);

    let quality = BARREL_WEIGHT * barrel + TIMING_WEIGHT * timing + VERTICAL_WEIGHT * vertical;

    Some(ContactScore {
        distance,
        barrel,
        timing,
        vertical,
        timing_offset,
        vertical_offset,
        quality,
        foul: timing_miss || quality < tuning.foul_quality,
    })
}

/// Batted-ball departure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub exit_speed_mph: f32,
    pub launch_angle_deg: f32,
    /// Positive toward the pull side (third base for a righty)
    pub spray_angle_deg: f32,
    pub velocity: Vec3,
}

/// Turn a contact grade into a launch vector. `jitter` in `[-1, 1]` adds spray noise.
pub fn launch_from_score(score: &ContactScore, tuning: &ContactTuning, jitter: f32) -> Launch {
    let q = score.quality.clamp(0.0, 1.0);
    let exit_speed_mph = lerp(tuning.min_exit_mph, tuning.max_exit_mph, q);

    let launch_angle_deg = (tuning.base_launch_deg
        + q * tuning.quality_launch_bonus_deg
        + (score.vertical_offset / tuning.max_radius) * tuning.vertical_launch_gain_deg)
        .clamp(tuning.min_launch_deg, tuning.max_launch_deg);

    let pull = -(score.timing_offset / tuning.timing_loose) * tuning.max_spray_deg;
    let spray_angle_deg = pull.clamp(-tuning.max_spray_deg, tuning.max_spray_deg)
        + jitter.clamp(-1.0, 1.0) * tuning.spray_jitter_deg;

    let elevation = launch_angle_deg.to_radians();
    let spray = spray_angle_deg.to_radians();
    // Out toward the field is -z; pull side is -x
    let horizontal = Vec3::new(-spray.sin(), 0.0, -spray.cos());
    let direction = horizontal * elevation.cos() + Vec3::Y * elevation.sin();

    Launch {
        exit_speed_mph,
        launch_angle_deg,
        spray_angle_deg,
        velocity: direction * mph_to_fps(exit_speed_mph),
    }
}

/// Everything the at-bat needs to know about a collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    /// Ball position at impact
    pub point: Vec3,
    pub score: ContactScore,
    pub launch: Launch,
}

/// The ball's closest approach to the sweet spot during one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactCandidate {
    pub point: Vec3,
    pub score: ContactScore,
}

/// Check the ball's step `prev → curr` against the bat's sweet spot. `None` when out of reach.
pub fn measure_contact(
    prev: Vec3,
    curr: Vec3,
    bat: &Bat,
    swing: &SwingTuning,
    tuning: &ContactTuning,
) -> Option<ContactCandidate> {
    let sweet_spot = bat.contact_point(swing);
    let point = closest_point_on_segment(prev, curr, sweet_spot);
    let score = score_contact(point, sweet_spot, swing.contact_z, tuning)?;
    Some(ContactCandidate { point, score })
}

/// Tracks the nearest candidate while the contact window is open.
///
/// The ball always enters reach from the pitcher's side, so the first step in
/// reach is always early. Contact is taken at the minimum distance instead.
#[derive(Debug, Clone, Default)]
pub struct ClosestApproach {
    best: Option<ContactCandidate>,
}

impl ClosestApproach {
    /// Feed this step's measurement. Returns the nearest candidate once the ball
    /// has started moving away from the sweet spot or has left reach.
    pub fn offer(&mut self, candidate: Option<ContactCandidate>) -> Option<ContactCandidate> {
        match (candidate, self.best) {
            (Some(c), None) => {
                self.best = Some(c);
                None
            }
            (Some(c), Some(best)) if c.score.distance <= best.score.distance => {
                self.best = Some(c);
                None
            }
            _ => self.best.take(),
        }
    }

    /// Nearest candidate so far, for when the window closes or the pitch ends
    pub fn take(&mut self) -> Option<ContactCandidate> {
        self.best.take()
    }

    pub fn clear(&mut self) {
        self.best = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.best.is_some()
    }
}

/// Turn the chosen candidate into a batted ball
pub fn resolve_contact<R: Rng>(
    candidate: ContactCandidate,
    tuning: &ContactTuning,
    rng: &mut R,
) -> ContactOutcome {
    let ContactCandidate { point, score } = candidate;
    let launch = launch_from_score(&score, tuning, rng.random_range(-1.0f32..=1.0));

    log::debug!(
        "Contact: dist={:.2} barrel={:.2} timing={:.2} ({:+.2} ft) vertical={:.2} q={:.2}{}",
        score.distance,
        score.barrel,
        score.timing,
        score.timing_offset,
        score.vertical,
        score.quality,
        if score.foul { " foul" } else { "" }
    );

    ContactOutcome {
        point,
        score,
        launch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONTACT_Z: f32 = -1.5;

    fn sweet_spot() -> Vec3 {
        Vec3::new(0.0, 2.5, CONTACT_Z)
    }

    fn quality_at(offset: Vec3) -> f32 {
        let tuning = ContactTuning::default();
        score_contact(sweet_spot() + offset, sweet_spot(), CONTACT_Z, &tuning)
            .map(|s| s.quality)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_closest_point_on_segment() {
        let a = Vec3::new(0.0, 0.0, -1.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        let p = closest_point_on_segment(a, b, Vec3::new(0.5, 0.0, 0.25));
        assert!((p - Vec3::new(0.0, 0.0, 0.25)).length() < 1e-6);
        // Clamped to the ends
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(0.0, 0.0, 5.0)), b);
        // Zero-length step
        assert_eq!(closest_point_on_segment(a, a, Vec3::ONE), a);
    }

    #[test]
    fn test_perfect_contact() {
        let tuning = ContactTuning::default();
        let score = score_contact(sweet_spot(), sweet_spot(), CONTACT_Z, &tuning).unwrap();
        assert!((score.quality - 1.0).abs() < 1e-5);
        assert!(!score.foul);

        let launch = launch_from_score(&score, &tuning, 0.0);
        assert!((launch.exit_speed_mph - tuning.max_exit_mph).abs() < 1e-3);
        assert!((launch.launch_angle_deg - 24.0).abs() < 1e-4);
        assert!(launch.spray_angle_deg.abs() < 1e-4);
        // Straight out to center field, climbing
        assert!(launch.velocity.z < 0.0 && launch.velocity.y > 0.0);
        assert!(launch.velocity.x.abs() < 1e-3);
    }

    #[test]
    fn test_out_of_reach_is_whiff() {
        let tuning = ContactTuning::default();
        let ball = sweet_spot() + Vec3::new(1.01, 0.0, 0.0);
        assert!(score_contact(ball, sweet_spot(), CONTACT_Z, &tuning).is_none());
    }

    #[test]
    fn test_low_quality_is_foul() {
        let tuning = ContactTuning::default();
        // Ball a full radius above a barrel that swung through late
        let bat = Vec3::new(0.0, 2.5, CONTACT_Z + 1.5);
        let score =
            score_contact(bat + Vec3::new(0.0, 1.0, 0.0), bat, CONTACT_Z, &tuning).unwrap();
        assert!(score.quality < tuning.foul_quality);
        assert!(score.foul);
    }

    #[test]
    fn test_timing_miss_is_foul() {
        let tuning = ContactTuning::default();
        let bat = Vec3::new(0.0, 2.5, CONTACT_Z + tuning.timing_loose + 0.1);
        let score = score_contact(bat, bat, CONTACT_Z, &tuning).unwrap();
        assert_eq!(score.barrel, 1.0);
        assert!(score.foul);
    }

    #[test]
    fn test_timing_drives_spray() {
        let tuning = ContactTuning::default();
        let early = score_contact(
            sweet_spot() + Vec3::new(0.0, 0.0, -0.8),
            sweet_spot(),
            CONTACT_Z,
            &tuning,
        )
        .unwrap();
        let late = score_contact(
            sweet_spot() + Vec3::new(0.0, 0.0, 0.8),
            sweet_spot(),
            CONTACT_Z,
            &tuning,
        )
        .unwrap();
        let pulled = launch_from_score(&early, &tuning, 0.0);
        let oppo = launch_from_score(&late, &tuning, 0.0);
        assert!(pulled.spray_angle_deg > 0.0 && pulled.velocity.x < 0.0);
        assert!(oppo.spray_angle_deg < 0.0 && oppo.velocity.x > 0.0);
        assert!(pulled.spray_angle_deg <= tuning.max_spray_deg);
    }

    #[test]
    fn test_vertical_offset_shapes_launch() {
        let tuning = ContactTuning::default();
        let under = score_contact(
            sweet_spot() + Vec3::new(0.0, 0.9, 0.0),
            sweet_spot(),
            CONTACT_Z,
            &tuning,
        )
        .unwrap();
        let over = score_contact(
            sweet_spot() + Vec3::new(0.0, -0.9, 0.0),
            sweet_spot(),
            CONTACT_Z,
            &tuning,
        )
        .unwrap();
        let fly = launch_from_score(&under, &tuning, 0.0);
        let grounder = launch_from_score(&over, &tuning, 0.0);
        assert!(fly.launch_angle_deg > grounder.launch_angle_deg);
        assert!(grounder.launch_angle_deg >= tuning.min_launch_deg);
        assert!(fly.launch_angle_deg <= tuning.max_launch_deg);
    }

    fn candidate_at(z: f32) -> Option<ContactCandidate> {
        let tuning = ContactTuning::default();
        let point = sweet_spot() + Vec3::new(0.0, 0.0, z);
        score_contact(point, sweet_spot(), CONTACT_Z, &tuning)
            .map(|score| ContactCandidate { point, score })
    }

    #[test]
    fn test_closest_approach_waits_for_minimum() {
        let mut approach = ClosestApproach::default();
        assert!(approach.offer(None).is_none());
        assert!(approach.offer(candidate_at(-0.9)).is_none());
        assert!(approach.offer(candidate_at(-0.4)).is_none());
        assert!(approach.offer(candidate_at(0.1)).is_none());
        assert!(approach.is_tracking());
        // Moving away again: the previous step was the closest
        let best = approach.offer(candidate_at(0.6)).unwrap();
        assert!((best.score.timing_offset - 0.1).abs() < 1e-5);
        assert!(!approach.is_tracking());
    }

    #[test]
    fn test_closest_approach_resolves_when_leaving_reach() {
        let mut approach = ClosestApproach::default();
        approach.offer(candidate_at(-0.5));
        let best = approach.offer(None).unwrap();
        assert!((best.score.timing_offset + 0.5).abs() < 1e-5);
        assert!(approach.take().is_none());
    }

    #[test]
    fn test_late_contact_goes_the_other_way() {
        let tuning = ContactTuning::default();
        let mut approach = ClosestApproach::default();
        assert!(approach.offer(candidate_at(-0.6)).is_none());
        assert!(approach.offer(candidate_at(0.3)).is_none());
        let best = approach.offer(candidate_at(0.7)).unwrap();
        assert!((best.score.timing_offset - 0.3).abs() < 1e-5);
        let mut rng = rand_pcg::Pcg32::new(7, 11);
        let outcome = resolve_contact(best, &tuning, &mut rng);
        assert!(!outcome.score.foul);
        assert!(outcome.launch.spray_angle_deg < 0.0);
        assert!(outcome.launch.velocity.x > 0.0);
    }

    proptest! {
        #[test]
        fn prop_closer_never_worse(
            x in -1.0f32..1.0,
            y in -1.0f32..1.0,
            z in -1.0f32..1.0,
            shrink in 0.0f32..1.0,
        ) {
            // Pull the ball toward the sweet spot laterally/vertically, timing fixed
            let far = quality_at(Vec3::new(x, y, z));
            let near = quality_at(Vec3::new(x * shrink, y * shrink, z));
            prop_assert!(near >= far - 1e-5);
        }

        #[test]
        fn prop_better_timing_never_worse(
            x in -0.7f32..0.7,
            y in -0.7f32..0.7,
            z in -1.0f32..1.0,
            shrink in 0.0f32..1.0,
        ) {
            let far = quality_at(Vec3::new(x, y, z));
            let near = quality_at(Vec3::new(x, y, z * shrink));
            prop_assert!(near >= far - 1e-5);
        }
    }
}
