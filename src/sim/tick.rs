//! Simulation tick
//!
//! Advances the at-bat by one timestep: bat animation, pitch flight, plate call,
//! contact, batted-ball flight and the result dwell.

use glam::Vec3;
use rand::Rng;

use super::contact::{ContactCandidate, measure_contact, resolve_contact};
use super::pitch::{PitchInstance, PitchTarget, aim_velocity};
use super::state::{DemoPlan, GameEvent, GamePhase, GameState, Outcome, StrikeKind};
use super::zone::{PitchCall, plate_crossing};
use crate::consts::*;
use crate::tuning::FlowTuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Ask for the next pitch (only honored in Idle)
    pub request_pitch: bool,
    /// Start a swing
    pub swing: bool,
    /// Hands height aim, ft
    pub bat_height: Option<f32>,
    /// Idle/demo mode - AI pitches and bats
    pub idle_mode: bool,
}

/// Demo batter takes this long after Idle before asking for a pitch
const DEMO_PITCH_DELAY: f32 = 0.6;
/// Demo batter chases this fraction of pitches thrown for balls
const DEMO_CHASE_RATE: f32 = 0.25;
/// Demo batter timing spread, seconds
const DEMO_TIMING_SPREAD: f32 = 0.03;

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;
    state.phase_timer += dt;

    let mut input = input.clone();
    if input.idle_mode {
        demo_batter(state, &mut input);
    }
    let input = &input;

    if let Some(height) = input.bat_height {
        state.bat.set_height(height, &state.tuning.zone);
    }

    // A swing may be thrown at any time; it only counts while a pitch is live
    if input.swing && state.bat.start_swing() {
        state.events.push(GameEvent::SwingStarted);
        if state.phase == GamePhase::Pitching {
            state.phase = GamePhase::Swinging;
            state.swung = true;
            state.stats.swings += 1;
        }
    }
    state.bat.update(dt, &state.tuning.swing);

    match state.phase {
        GamePhase::Idle => {
            let flow = &state.tuning.flow;
            let auto_due = flow.auto_pitch && state.phase_timer >= flow.auto_pitch_delay;
            if input.request_pitch || auto_due {
                start_pitch(state);
            }
        }

        GamePhase::Pitching | GamePhase::Swinging => {
            update_pitch(state, dt);
            if state.phase == GamePhase::Swinging && !state.bat.active {
                state.phase = GamePhase::Pitching;
            }
        }

        GamePhase::BallInPlay => {
            if let Some((distance, _)) = advance_batted_ball(state, dt) {
                land(state, distance);
            }
        }

        GamePhase::Result => {
            // Fouls keep flying while the result is shown
            advance_batted_ball(state, dt);
            if state.phase_timer >= state.tuning.flow.result_dwell {
                state.ball.park();
                state.clear_pitch();
                enter_phase(state, GamePhase::Idle);
            }
        }
    }
}

fn enter_phase(state: &mut GameState, phase: GamePhase) {
    state.phase = phase;
    state.phase_timer = 0.0;
}

/// Pitcher AI picks, targets and throws the next pitch
pub fn start_pitch(state: &mut GameState) -> bool {
    let pitch = state.selector.choose_next_pitch(&mut state.rng);
    let target = state.selector.choose_target(&mut state.rng, &state.zone);
    throw_pitch(state, pitch, target)
}

/// Throw a specific pitch at a specific plate target. Only works from Idle.
pub fn throw_pitch(state: &mut GameState, pitch: PitchInstance, target: PitchTarget) -> bool {
    if state.phase != GamePhase::Idle {
        return false;
    }

    let release = Vec3::from_array(state.tuning.pitching.release);
    let vel = aim_velocity(
        release,
        target.point,
        &pitch,
        &state.tuning.physics,
        state.tuning.pitching.aim_iterations,
    );

    state.clear_pitch();
    state.ball.throw(release, vel);

    log::info!(
        "Pitch: {} aimed at ({:.2}, {:.2}) for a {}",
        pitch.describe(),
        target.point.x,
        target.point.y,
        target.intent.as_str().to_lowercase()
    );

    state.counters.last_pitch_name = pitch.name.clone();
    state.counters.last_pitch_mph = pitch.speed_mph;
    state.stats.pitches += 1;
    state.pitch = Some(pitch);
    state.target = Some(target);
    state.events.push(GameEvent::PitchThrown);
    enter_phase(state, GamePhase::Pitching);
    true
}

/// Pitch flight: integrate, call the plate, look for contact, end the pitch
fn update_pitch(state: &mut GameState, dt: f32) {
    let Some(pitch) = state.pitch.as_ref() else {
        // Nothing in flight; treat as a dead pitch
        finish_pitch(state);
        return;
    };
    let accel = pitch.accel(state.tuning.physics.gravity);

    let prev = state.ball.pos;
    state.ball.update(dt, accel, state.tuning.physics.pitch_drag);
    let curr = state.ball.pos;

    if !state.crossed_plate {
        if let Some(point) = plate_crossing(prev, curr, PLATE_Z) {
            state.crossed_plate = true;
            state.crossing_point = Some(point);
            // A zero-size zone can't call anything
            if !state.zone.is_degenerate() {
                let call = state.zone.call(point);
                state.call = Some(call);
                state.events.push(GameEvent::PlateCrossed { call });
                log::debug!("Plate: {} at ({:.2}, {:.2})", call.as_str(), point.x, point.y);
            }
        }
    }

    let window_open = state.swung
        && state.ball.active
        && !state.ball.struck
        && state.bat.in_contact_window(&state.tuning.swing);
    let chosen = if window_open {
        let candidate = measure_contact(
            prev,
            curr,
            &state.bat,
            &state.tuning.swing,
            &state.tuning.contact,
        );
        state.approach.offer(candidate)
    } else {
        state.approach.take()
    };
    if let Some(candidate) = chosen {
        on_contact(state, candidate);
        return;
    }

    let ball = &state.ball;
    if !state.crossed_plate && ball.pos.y < 0.0 {
        state.in_dirt = true;
        state.call = Some(PitchCall::Ball);
    }

    let past_plate = ball.pos.z > PLATE_Z + state.tuning.flow.past_plate_margin;
    if past_plate || ball.pos.y < 0.0 || !ball.active {
        // Still closing on the bat when the pitch ran out
        if let Some(candidate) = state.approach.take() {
            on_contact(state, candidate);
            return;
        }
        finish_pitch(state);
    }
}

/// Pitch ended without contact: settle the count
fn finish_pitch(state: &mut GameState) {
    let outcome = if state.in_dirt {
        Outcome::InTheDirt
    } else {
        match (state.call, state.swung) {
            (Some(PitchCall::Ball), _) => Outcome::Ball,
            (_, true) => Outcome::StrikeSwinging,
            (Some(PitchCall::Strike), false) => Outcome::StrikeLooking,
            (None, false) => Outcome::Miss,
        }
    };

    let max = state.tuning.flow.max_strikes;
    let struck_out = match outcome {
        Outcome::StrikeSwinging => state.counters.register_strike(StrikeKind::Swinging, max),
        Outcome::StrikeLooking => state.counters.register_strike(StrikeKind::Looking, max),
        _ => false,
    };

    log::info!("Result: {}", outcome.label());
    state.ball.deactivate();
    conclude(state, outcome, struck_out);
}

/// Bat met ball at the closest approach
fn on_contact(state: &mut GameState, candidate: ContactCandidate) {
    let outcome = resolve_contact(candidate, &state.tuning.contact, &mut state.rng);
    let launch = outcome.launch;
    state.ball.pos = outcome.point;
    state.ball.launch(launch.velocity);
    state.contact = Some(outcome);
    state.counters.last_exit_mph = launch.exit_speed_mph;
    state.events.push(GameEvent::Contact {
        foul: outcome.score.foul,
        exit_mph: launch.exit_speed_mph,
    });

    log::info!(
        "Contact: {:.1} mph, launch {:.1}°, spray {:.1}°, quality {:.2}",
        launch.exit_speed_mph,
        launch.launch_angle_deg,
        launch.spray_angle_deg,
        outcome.score.quality
    );

    if outcome.score.foul {
        let max = state.tuning.flow.max_strikes;
        state.counters.register_strike(StrikeKind::Foul, max);
        state.stats.fouls += 1;
        log::info!("Result: Foul");
        conclude(state, Outcome::Foul, false);
    } else {
        enter_phase(state, GamePhase::BallInPlay);
    }
}

/// Integrate a struck ball. Returns the landing distance and point once it is down
/// or out of range; the ball is deactivated at that point.
fn advance_batted_ball(state: &mut GameState, dt: f32) -> Option<(f32, Vec3)> {
    if !state.ball.active || !state.ball.struck {
        return None;
    }

    let gravity = Vec3::new(0.0, -state.tuning.physics.gravity, 0.0);
    let prev = state.ball.pos;
    state.ball.update(dt, gravity, state.tuning.physics.flight_drag);
    let curr = state.ball.pos;

    let landing = if curr.y <= 0.0 {
        // Interpolate back to the ground plane
        let t = if prev.y > curr.y {
            (prev.y / (prev.y - curr.y)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mut point = prev.lerp(curr, t);
        point.y = 0.0;
        point
    } else if horizontal_distance(curr) > state.tuning.flow.max_travel_ft {
        curr
    } else {
        return None;
    };

    state.ball.pos = landing;
    state.ball.deactivate();
    Some((horizontal_distance(landing), landing))
}

/// Distance from the plate along the ground
pub fn horizontal_distance(point: Vec3) -> f32 {
    Vec3::new(point.x, 0.0, point.z - PLATE_Z).length()
}

/// Points for a fair ball
pub fn hit_points(distance_ft: f32, exit_speed_mph: f32, flow: &FlowTuning) -> u64 {
    let bonus = (exit_speed_mph - flow.exit_bonus_floor_mph).max(0.0) * flow.exit_bonus_per_mph;
    (distance_ft * flow.points_per_foot + bonus).round().max(0.0) as u64
}

/// Fair ball came down
fn land(state: &mut GameState, distance_ft: f32) {
    let exit_mph = state
        .contact
        .map(|c| c.launch.exit_speed_mph)
        .unwrap_or(state.counters.last_exit_mph);
    let points = hit_points(distance_ft, exit_mph, &state.tuning.flow);

    state.counters.score += points;
    state.counters.last_distance_ft = distance_ft;
    state.stats.hits += 1;
    state.stats.longest_hit_ft = state.stats.longest_hit_ft.max(distance_ft);
    state.events.push(GameEvent::Landed {
        distance_ft,
        points,
    });

    let outcome = Outcome::Hit {
        distance_ft,
        points,
    };
    log::info!("Result: {} (score {})", outcome.label(), state.counters.score);
    conclude(state, outcome, false);
}

fn conclude(state: &mut GameState, outcome: Outcome, struck_out: bool) {
    state.counters.record(outcome);
    state.counters.last_call = state.call;
    state.events.push(GameEvent::PitchOver(outcome));
    if struck_out {
        state.stats.strikeouts += 1;
        state.events.push(GameEvent::StrikeOut);
        log::info!("Strikeout! Outs: {}", state.counters.outs);
    }
    enter_phase(state, GamePhase::Result);
}

/// Demo mode: request pitches and swing at (mostly) strikes
fn demo_batter(state: &mut GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Idle => {
            if state.phase_timer >= DEMO_PITCH_DELAY {
                input.request_pitch = true;
            }
        }
        GamePhase::Pitching if !state.swung => {
            let plan = match state.demo_plan {
                Some(plan) => plan,
                None => {
                    let aimed_strike = state
                        .target
                        .is_some_and(|t| t.intent == PitchCall::Strike);
                    let plan = DemoPlan {
                        will_swing: aimed_strike || state.rng.random::<f32>() < DEMO_CHASE_RATE,
                        timing_error: state
                            .rng
                            .random_range(-DEMO_TIMING_SPREAD..=DEMO_TIMING_SPREAD),
                    };
                    state.demo_plan = Some(plan);
                    plan
                }
            };
            if !plan.will_swing || state.ball.vel.z <= 0.0 {
                return;
            }

            let swing = &state.tuning.swing;
            let time_to_contact = (swing.contact_z - state.ball.pos.z) / state.ball.vel.z;
            // Contact pose is reached halfway through the swing
            let lead = swing.duration * 0.5 + plan.timing_error;
            if time_to_contact <= lead {
                let accel_y = state
                    .pitch
                    .as_ref()
                    .map(|p| p.accel(state.tuning.physics.gravity).y)
                    .unwrap_or(-state.tuning.physics.gravity);
                let t = time_to_contact.max(0.0);
                let height = state.ball.pos.y + state.ball.vel.y * t + 0.5 * accel_y * t * t;
                input.bat_height = Some(height);
                input.swing = true;
            }
        }
        _ => {}
    }
}
