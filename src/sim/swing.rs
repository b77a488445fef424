//! Bat swing animation and contact window
//!
//! The swing is a fixed keyframe track. Each segment eases into its keyframe with
//! a curve that suits the phase: a slow load, a violent whip through contact, a
//! smooth follow-through and a settling recovery.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::{SwingTuning, ZoneTuning};

/// Easing applied across one keyframe segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Aggressive deceleration: most of the travel happens early
    EaseOutQuart,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

/// Bat orientation: yaw about the vertical axis, tilt of the barrel above level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatPose {
    pub yaw: f32,
    pub tilt: f32,
}

impl BatPose {
    pub const fn degrees(yaw: f32, tilt: f32) -> Self {
        Self {
            yaw: yaw * std::f32::consts::PI / 180.0,
            tilt: tilt * std::f32::consts::PI / 180.0,
        }
    }

    fn lerp(self, other: BatPose, t: f32) -> BatPose {
        BatPose {
            yaw: lerp(self.yaw, other.yaw, t),
            tilt: lerp(self.tilt, other.tilt, t),
        }
    }

    /// World rotation. Barrel points along +x at yaw 0, tilt 0 (level, over the plate).
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_z(self.tilt)
    }
}

/// A pose reached at normalized swing time `t`, eased in from the previous key
#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    pub t: f32,
    pub pose: BatPose,
    pub easing: Easing,
}

const REST: BatPose = BatPose::degrees(-70.0, 65.0);

/// Stance → load → launch → contact → follow-through → recover
pub const SWING_KEYFRAMES: [Keyframe; 6] = [
    Keyframe { t: 0.0, pose: REST, easing: Easing::Linear },
    Keyframe { t: 0.22, pose: BatPose::degrees(-110.0, 50.0), easing: Easing::EaseIn },
    Keyframe { t: 0.40, pose: BatPose::degrees(-45.0, 15.0), easing: Easing::EaseOutQuart },
    Keyframe { t: 0.50, pose: BatPose::degrees(0.0, 0.0), easing: Easing::EaseOutQuart },
    Keyframe { t: 0.75, pose: BatPose::degrees(120.0, 35.0), easing: Easing::EaseInOut },
    Keyframe { t: 1.0, pose: REST, easing: Easing::EaseOut },
];

/// Pose at normalized time `t` (clamped to the track)
pub fn sample_pose(keys: &[Keyframe], t: f32) -> BatPose {
    let Some(first) = keys.first() else {
        return REST;
    };
    if t <= first.t {
        return first.pose;
    }
    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.t {
            let span = b.t - a.t;
            let local = if span > 0.0 { (t - a.t) / span } else { 1.0 };
            return a.pose.lerp(b.pose, b.easing.apply(local));
        }
    }
    keys[keys.len() - 1].pose
}

/// The batter's bat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bat {
    /// Seconds since the current swing started
    pub elapsed: f32,
    pub active: bool,
    pub pose: BatPose,
    /// Hands height; follows the aim input
    pub height: f32,
}

impl Bat {
    pub fn new(height: f32) -> Self {
        Self {
            elapsed: 0.0,
            active: false,
            pose: REST,
            height,
        }
    }

    /// Begin a swing. Rejected while a swing is already in progress.
    pub fn start_swing(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.elapsed = 0.0;
        self.active = true;
        self.pose = SWING_KEYFRAMES[0].pose;
        true
    }

    pub fn update(&mut self, dt: f32, swing: &SwingTuning) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= swing.duration {
            self.active = false;
            self.pose = SWING_KEYFRAMES[SWING_KEYFRAMES.len() - 1].pose;
            return;
        }
        self.pose = sample_pose(&SWING_KEYFRAMES, self.elapsed / swing.duration);
    }

    pub fn in_contact_window(&self, swing: &SwingTuning) -> bool {
        self.active && self.elapsed >= swing.window_start && self.elapsed <= swing.window_end
    }

    /// Aim the hands at a height, kept within the zone's vertical extent
    pub fn set_height(&mut self, height: f32, zone: &ZoneTuning) {
        let half = zone.height * 0.5;
        self.height = height.clamp(zone.center_y - half, zone.center_y + half);
    }

    pub fn hands(&self, swing: &SwingTuning) -> Vec3 {
        Vec3::new(swing.hands_x, self.height, swing.contact_z)
    }

    /// World-space sweet spot of the barrel
    pub fn contact_point(&self, swing: &SwingTuning) -> Vec3 {
        self.hands(swing) + self.pose.rotation() * Vec3::new(swing.barrel_length, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 120.0;

    #[test]
    fn test_easing_endpoints() {
        for e in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseOutQuart,
        ] {
            assert!(e.apply(0.0).abs() < 1e-6);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
        }
        // The whip is front-loaded
        assert!(Easing::EaseOutQuart.apply(0.25) > Easing::EaseOut.apply(0.25));
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
    }

    #[test]
    fn test_sample_pose_hits_keyframes() {
        for key in SWING_KEYFRAMES {
            let pose = sample_pose(&SWING_KEYFRAMES, key.t);
            assert!((pose.yaw - key.pose.yaw).abs() < 1e-5);
            assert!((pose.tilt - key.pose.tilt).abs() < 1e-5);
        }
    }

    #[test]
    fn test_contact_window_timing() {
        let swing = SwingTuning::default();
        let mut bat = Bat::new(2.5);
        assert!(!bat.in_contact_window(&swing));
        assert!(bat.start_swing());

        let mut opened_at = None;
        let mut closed_at = None;
        let mut t = 0.0;
        while bat.active {
            bat.update(DT, &swing);
            t += DT;
            let open = bat.in_contact_window(&swing);
            if open && opened_at.is_none() {
                opened_at = Some(t);
            }
            if !open && opened_at.is_some() && closed_at.is_none() {
                closed_at = Some(t);
            }
        }

        let opened = opened_at.unwrap();
        let closed = closed_at.unwrap();
        assert!((opened - swing.window_start).abs() <= DT + 1e-4);
        assert!((closed - swing.window_end).abs() <= DT + 1e-4);
        // Window opens after the load phase ends
        assert!(opened > SWING_KEYFRAMES[1].t * swing.duration);
        assert!((t - swing.duration).abs() <= DT + 1e-4);
    }

    #[test]
    fn test_swing_ends_at_rest() {
        let swing = SwingTuning::default();
        let mut bat = Bat::new(2.5);
        bat.start_swing();
        bat.update(swing.duration * 0.5, &swing);
        assert_ne!(bat.pose, REST);
        bat.update(swing.duration, &swing);
        assert!(!bat.active);
        assert_eq!(bat.pose, REST);
    }

    #[test]
    fn test_retrigger_rejected_while_active() {
        let swing = SwingTuning::default();
        let mut bat = Bat::new(2.5);
        assert!(bat.start_swing());
        bat.update(0.1, &swing);
        assert!(!bat.start_swing());
        assert!((bat.elapsed - 0.1).abs() < 1e-6);

        bat.update(swing.duration, &swing);
        assert!(bat.start_swing());
        assert_eq!(bat.elapsed, 0.0);
    }

    #[test]
    fn test_contact_pose_puts_barrel_over_plate() {
        let swing = SwingTuning::default();
        let mut bat = Bat::new(2.5);
        bat.pose = BatPose::degrees(0.0, 0.0);
        let p = bat.contact_point(&swing);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.5).abs() < 1e-5);
        assert!((p.z - swing.contact_z).abs() < 1e-5);

        // Load pose wraps the barrel back toward the catcher
        bat.pose = SWING_KEYFRAMES[1].pose;
        assert!(bat.contact_point(&swing).z > swing.contact_z);
    }

    #[test]
    fn test_height_clamped_to_zone() {
        let zone = ZoneTuning::default();
        let mut bat = Bat::new(2.5);
        bat.set_height(10.0, &zone);
        assert_eq!(bat.height, zone.center_y + zone.height * 0.5);
        bat.set_height(-3.0, &zone);
        assert_eq!(bat.height, zone.center_y - zone.height * 0.5);
    }
}
