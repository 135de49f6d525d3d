//! Movement domain: input sampling and buffering for the fixed tick.

use bevy::prelude::*;

use crate::movement::MovementInput;

/// Axis magnitude below which input counts as released.
pub const DEADZONE: f32 = 0.1;

/// Held direction at the moment the dash key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl DashDirection {
    /// Classify held axes. Lateral wins when both axes are pressed, and
    /// no input at all dashes forward.
    pub fn classify(axis: Vec2) -> Self {
        if axis.x > DEADZONE {
            DashDirection::Right
        } else if axis.x < -DEADZONE {
            DashDirection::Left
        } else if axis.y < -DEADZONE {
            DashDirection::Backward
        } else {
            DashDirection::Forward
        }
    }

    pub fn is_lateral(self) -> bool {
        matches!(self, DashDirection::Left | DashDirection::Right)
    }
}

/// A jump press remembered until it is consumed or its window lapses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpBuffer {
    pub pressed_at: Option<f32>,
}

impl JumpBuffer {
    pub fn press(&mut self, now: f32) {
        self.pressed_at = Some(now);
    }

    /// Whether a press is still inside its window at `now`.
    pub fn is_buffered(&self, now: f32, window: f32) -> bool {
        self.pressed_at
            .is_some_and(|pressed| now >= pressed && now - pressed <= window)
    }

    pub fn consume(&mut self) {
        self.pressed_at = None;
    }

    /// Drop a press whose window has passed.
    pub fn expire(&mut self, now: f32, window: f32) {
        if self.pressed_at.is_some() && !self.is_buffered(now, window) {
            self.pressed_at = None;
        }
    }
}

/// Input as seen by one fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// x = steer (+ right), y = throttle (+ forward), each in [-1, 1].
    pub axis: Vec2,
    pub jump: JumpBuffer,
    pub jump_held: bool,
    /// Dash edge for this tick only.
    pub dash: Option<DashDirection>,
}

impl InputSnapshot {
    pub fn steer(&self) -> f32 {
        self.axis.x
    }

    pub fn throttle(&self) -> f32 {
        self.axis.y
    }

    /// World-space wish direction: facing direction scaled by throttle.
    pub fn wish_direction(&self, forward: Vec3) -> Vec3 {
        if self.axis.y.abs() <= DEADZONE {
            Vec3::ZERO
        } else {
            forward.normalize_or_zero() * self.axis.y.clamp(-1.0, 1.0)
        }
    }

    /// Take the dash edge; it is never seen twice.
    pub fn take_dash(&mut self) -> Option<DashDirection> {
        self.dash.take()
    }
}

/// Per-body sampler turning raw input into tick snapshots.
#[derive(Component, Debug, Default)]
pub struct InputSampler {
    pub snapshot: InputSnapshot,
}

impl InputSampler {
    /// Latch raw input for the tick at `now`, clearing the raw edges.
    pub fn sample(&mut self, raw: &mut MovementInput, now: f32, buffer_window: f32) {
        let snapshot = &mut self.snapshot;
        snapshot.axis = raw.axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
        snapshot.jump_held = raw.jump_held;

        if raw.jump_just_pressed {
            snapshot.jump.press(now);
        } else {
            snapshot.jump.expire(now, buffer_window);
        }

        let axis = snapshot.axis;
        snapshot.dash = raw
            .dash_just_pressed
            .then(|| DashDirection::classify(axis));

        raw.clear_edges();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_lateral() {
        assert_eq!(DashDirection::classify(Vec2::new(1.0, 1.0)), DashDirection::Right);
        assert_eq!(DashDirection::classify(Vec2::new(-1.0, -1.0)), DashDirection::Left);
        assert_eq!(DashDirection::classify(Vec2::new(0.0, -1.0)), DashDirection::Backward);
        assert_eq!(DashDirection::classify(Vec2::new(0.0, 1.0)), DashDirection::Forward);
        assert_eq!(DashDirection::classify(Vec2::ZERO), DashDirection::Forward);
        // Inside the deadzone is not lateral
        assert_eq!(DashDirection::classify(Vec2::new(0.05, -1.0)), DashDirection::Backward);
    }

    #[test]
    fn jump_buffer_window() {
        let mut buffer = JumpBuffer::default();
        assert!(!buffer.is_buffered(0.0, 0.12));

        buffer.press(0.0);
        assert!(buffer.is_buffered(0.1, 0.12));
        assert!(!buffer.is_buffered(0.2, 0.12));

        buffer.expire(0.2, 0.12);
        assert!(buffer.pressed_at.is_none());
    }

    #[test]
    fn consume_clears_buffer() {
        let mut buffer = JumpBuffer::default();
        buffer.press(1.0);
        buffer.consume();
        assert!(!buffer.is_buffered(1.0, 0.12));
    }

    #[test]
    fn sampler_latches_edges_once() {
        let mut raw = MovementInput {
            axis: Vec2::new(0.0, 1.0),
            jump_just_pressed: true,
            jump_held: true,
            dash_just_pressed: true,
        };
        let mut sampler = InputSampler::default();

        sampler.sample(&mut raw, 0.0, 0.12);
        assert_eq!(sampler.snapshot.dash, Some(DashDirection::Forward));
        assert_eq!(sampler.snapshot.jump.pressed_at, Some(0.0));
        assert!(!raw.jump_just_pressed);
        assert!(!raw.dash_just_pressed);

        // Next tick: dash edge gone, jump still buffered
        sampler.sample(&mut raw, 1.0 / 64.0, 0.12);
        assert!(sampler.snapshot.dash.is_none());
        assert!(sampler.snapshot.jump.is_buffered(1.0 / 64.0, 0.12));

        // Past the window the press expires
        sampler.sample(&mut raw, 0.5, 0.12);
        assert!(sampler.snapshot.jump.pressed_at.is_none());
    }

    #[test]
    fn wish_direction_follows_throttle() {
        let snapshot = InputSnapshot {
            axis: Vec2::new(1.0, 0.5),
            ..default()
        };
        let wish = snapshot.wish_direction(Vec3::NEG_Z);
        assert!((wish - Vec3::NEG_Z * 0.5).length() < 1e-5);

        let idle = InputSnapshot::default();
        assert_eq!(idle.wish_direction(Vec3::NEG_Z), Vec3::ZERO);
    }
}
