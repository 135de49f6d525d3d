//! Movement domain: body state shared by every ability within a tick.

use bevy::prelude::*;

/// Planar/vertical magnitudes below this are treated as zero.
pub const EPSILON: f32 = 1e-4;

/// Kinematic state of the controlled body.
///
/// Only yaw is authoritative orientation; pitch and roll live in the
/// cosmetic tilt and never feed back into motion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    pub position: Vec3,
    /// Rotation around world up, radians. Zero faces -Z.
    pub yaw: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl BodyState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Horizontal facing direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Horizontal direction to the body's right.
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Velocity with the component along `up` removed.
    pub fn planar_velocity(&self, up: Vec3) -> Vec3 {
        self.velocity - up * self.velocity.dot(up)
    }

    pub fn vertical_speed(&self, up: Vec3) -> f32 {
        self.velocity.dot(up)
    }

    /// Rebuild velocity from a planar part and a speed along `up`.
    pub fn set_velocity_parts(&mut self, planar: Vec3, up: Vec3, vertical: f32) {
        self.velocity = planar + up * vertical;
    }

    /// Zero every velocity. Position and orientation are kept.
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}

/// Step `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance < EPSILON {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Scalar counterpart of [`move_towards`].
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

/// Clamp the length of `v` to `max`, never producing NaN.
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    let max = max.max(0.0);
    let length = v.length();
    if length > max && length > EPSILON {
        v * (max / length)
    } else {
        v
    }
}

/// Horizontal part of `v`, normalized, or `None` when degenerate.
pub fn flatten(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, 0.0, v.z).try_normalize()
}

/// Yaw that makes [`BodyState::forward`] point along `direction`.
pub fn yaw_of(direction: Vec3) -> f32 {
    f32::atan2(-direction.x, -direction.z)
}

/// Shortest signed difference `to - from`, wrapped to [-PI, PI].
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(std::f32::consts::TAU);
    if diff > std::f32::consts::PI {
        diff - std::f32::consts::TAU
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_right_follow_yaw() {
        let body = BodyState::default();
        assert!((body.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((body.right() - Vec3::X).length() < 1e-5);

        let turned = BodyState {
            yaw: -std::f32::consts::FRAC_PI_2,
            ..default()
        };
        // Turning right by a quarter faces +X.
        assert!((turned.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn yaw_of_inverts_forward() {
        for yaw in [-2.5_f32, -1.0, 0.0, 0.7, 3.0] {
            let body = BodyState { yaw, ..default() };
            assert!(angle_delta(yaw_of(body.forward()), yaw).abs() < 1e-4);
        }
    }

    #[test]
    fn move_towards_does_not_overshoot() {
        let v = move_towards(Vec3::ZERO, Vec3::X * 10.0, 3.0);
        assert!((v - Vec3::X * 3.0).length() < 1e-5);

        let v = move_towards(Vec3::X * 9.0, Vec3::X * 10.0, 3.0);
        assert_eq!(v, Vec3::X * 10.0);
    }

    #[test]
    fn clamp_length_handles_zero_and_negative_caps() {
        assert_eq!(clamp_length(Vec3::ZERO, 5.0), Vec3::ZERO);
        assert_eq!(clamp_length(Vec3::X * 3.0, -1.0), Vec3::ZERO);
        assert!((clamp_length(Vec3::X * 30.0, 5.0).length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn flatten_rejects_vertical_vectors() {
        assert!(flatten(Vec3::Y).is_none());
        assert!(flatten(Vec3::ZERO).is_none());
        let f = flatten(Vec3::new(2.0, 5.0, 0.0)).unwrap();
        assert!((f - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn angle_delta_wraps() {
        let d = angle_delta(3.0, -3.0);
        assert!((d - (std::f32::consts::TAU - 6.0)).abs() < 1e-4);
    }
}
