//! Movement domain: environment queries for ground and wall contact.
//!
//! The controller only sees the [`EnvironmentSensor`] trait. The avian
//! implementation lives in `systems::collisions`; tests use scripted sensors.

use bevy::prelude::*;

use crate::movement::WallProbePattern;

/// Result of the downward ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub grounded: bool,
    pub normal: Vec3,
    pub distance: f32,
}

impl GroundHit {
    pub fn none() -> Self {
        Self {
            grounded: false,
            normal: Vec3::Y,
            distance: f32::INFINITY,
        }
    }

    pub fn flat(distance: f32) -> Self {
        Self {
            grounded: true,
            normal: Vec3::Y,
            distance,
        }
    }
}

impl Default for GroundHit {
    fn default() -> Self {
        Self::none()
    }
}

/// A near-vertical surface found by the wall sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub normal: Vec3,
    pub distance: f32,
    /// Probe direction that found the wall.
    pub direction: Vec3,
}

/// Read-only world queries. Safe to call any number of times per tick.
pub trait EnvironmentSensor {
    /// Single downward ray from the body's probe point.
    fn query_ground(&self, origin: Vec3) -> GroundHit;

    /// First near-vertical surface hit along `directions`, in order.
    fn query_wall(&self, origin: Vec3, directions: &[Vec3]) -> Option<WallHit>;

    /// Distance straight down to any surface within `max_distance`.
    fn height_above_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32>;
}

/// Sensor with no world attached: never grounded, never near a wall.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSensor;

impl EnvironmentSensor for NullSensor {
    fn query_ground(&self, _origin: Vec3) -> GroundHit {
        GroundHit::none()
    }

    fn query_wall(&self, _origin: Vec3, _directions: &[Vec3]) -> Option<WallHit> {
        None
    }

    fn height_above_ground(&self, _origin: Vec3, _max_distance: f32) -> Option<f32> {
        None
    }
}

/// A missing environment reference behaves like [`NullSensor`].
impl<S: EnvironmentSensor> EnvironmentSensor for Option<S> {
    fn query_ground(&self, origin: Vec3) -> GroundHit {
        match self {
            Some(sensor) => sensor.query_ground(origin),
            None => GroundHit::none(),
        }
    }

    fn query_wall(&self, origin: Vec3, directions: &[Vec3]) -> Option<WallHit> {
        self.as_ref()
            .and_then(|sensor| sensor.query_wall(origin, directions))
    }

    fn height_above_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        self.as_ref()
            .and_then(|sensor| sensor.height_above_ground(origin, max_distance))
    }
}

impl<S: EnvironmentSensor + ?Sized> EnvironmentSensor for &S {
    fn query_ground(&self, origin: Vec3) -> GroundHit {
        (**self).query_ground(origin)
    }

    fn query_wall(&self, origin: Vec3, directions: &[Vec3]) -> Option<WallHit> {
        (**self).query_wall(origin, directions)
    }

    fn height_above_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        (**self).height_above_ground(origin, max_distance)
    }
}

/// True when `normal` is steep enough to count as a wall.
pub fn is_wall_normal(normal: Vec3, max_normal_y: f32) -> bool {
    normal.length_squared() > 0.25 && normal.y.abs() < max_normal_y
}

/// True when `normal` is flat enough to stand on.
pub fn is_ground_normal(normal: Vec3, max_normal_y: f32) -> bool {
    normal.y >= max_normal_y
}

/// Horizontal probe directions for the given pattern.
pub fn probe_directions(pattern: WallProbePattern, forward: Vec3, right: Vec3) -> Vec<Vec3> {
    match pattern {
        WallProbePattern::Ring(count) => {
            let count = count.max(1);
            (0..count)
                .map(|i| {
                    let angle = std::f32::consts::TAU * i as f32 / count as f32;
                    Vec3::new(angle.sin(), 0.0, -angle.cos())
                })
                .collect()
        }
        WallProbePattern::Cardinal => vec![forward, -forward, right, -right],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sensor_is_always_airborne() {
        let sensor = NullSensor;
        assert!(!sensor.query_ground(Vec3::ZERO).grounded);
        assert!(sensor.query_wall(Vec3::ZERO, &[Vec3::X]).is_none());
        assert!(sensor.height_above_ground(Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn missing_sensor_defaults_safely() {
        let sensor: Option<NullSensor> = None;
        assert!(!sensor.query_ground(Vec3::ZERO).grounded);
        assert!(sensor.query_wall(Vec3::ZERO, &[Vec3::X]).is_none());
    }

    #[test]
    fn wall_normal_threshold() {
        assert!(is_wall_normal(Vec3::X, 0.5));
        assert!(is_wall_normal(Vec3::new(0.9, 0.4, 0.0).normalize(), 0.5));
        assert!(!is_wall_normal(Vec3::Y, 0.5));
        assert!(!is_wall_normal(Vec3::NEG_Y, 0.5));
        assert!(!is_wall_normal(Vec3::ZERO, 0.5));
    }

    #[test]
    fn ring_is_evenly_spaced_and_horizontal() {
        let dirs = probe_directions(WallProbePattern::Ring(12), Vec3::NEG_Z, Vec3::X);
        assert_eq!(dirs.len(), 12);
        for dir in &dirs {
            assert!(dir.y.abs() < 1e-6);
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
        let step = dirs[0].angle_between(dirs[1]);
        assert!((step - std::f32::consts::TAU / 12.0).abs() < 1e-4);
    }

    #[test]
    fn cardinal_pattern_is_body_relative() {
        let dirs = probe_directions(WallProbePattern::Cardinal, Vec3::X, Vec3::Z);
        assert_eq!(dirs, vec![Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z]);
    }
}
