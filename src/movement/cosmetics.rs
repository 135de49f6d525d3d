//! Movement domain: cosmetic tilt derived from the tick's final state.
//!
//! Never feeds back into velocity or yaw.

use bevy::prelude::*;

use crate::movement::arbitration::TickContext;
use crate::movement::locomotion::Locomotion;
use crate::movement::wall_run::{WallRunAbility, WallSide};

/// Roll (positive leans right) and pitch (positive noses up), in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    pub roll: f32,
    pub pitch: f32,
}

impl Tilt {
    /// Local rotation for a visual child, relative to the body's yaw.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XZY, self.pitch, -self.roll, 0.0)
    }
}

/// Ease `tilt` toward the lean the current state calls for.
pub fn update_tilt(
    tilt: &mut Tilt,
    ctx: &TickContext<'_>,
    wall_run: &WallRunAbility,
    locomotion: &Locomotion,
) {
    let target = if let Some(contact) = wall_run.contact() {
        let lean = ctx.tuning.wall_run_lean;
        Tilt {
            roll: match contact.side {
                WallSide::Right => lean,
                WallSide::Left => -lean,
            },
            pitch: 0.0,
        }
    } else if ctx.ground.grounded && !locomotion.is_upright_locked(ctx.now) {
        ground_alignment(ctx.ground.normal, ctx.body.forward(), ctx.body.right())
    } else {
        Tilt::default()
    };

    let blend = 1.0 - (-ctx.tuning.tilt_smoothing * ctx.dt).exp();
    tilt.roll += (target.roll - tilt.roll) * blend;
    tilt.pitch += (target.pitch - tilt.pitch) * blend;
}

/// Lean that lays the body flat against a sloped ground normal.
fn ground_alignment(normal: Vec3, forward: Vec3, right: Vec3) -> Tilt {
    let Some(normal) = normal.try_normalize() else {
        return Tilt::default();
    };
    Tilt {
        roll: normal.dot(right).asin() * -1.0,
        pitch: normal.dot(forward).asin() * -1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_is_upright() {
        let tilt = ground_alignment(Vec3::Y, Vec3::NEG_Z, Vec3::X);
        assert!(tilt.roll.abs() < 1e-6);
        assert!(tilt.pitch.abs() < 1e-6);
    }

    #[test]
    fn uphill_slope_pitches_up() {
        // Ground rising ahead: normal leans back toward +Z.
        let normal = Vec3::new(0.0, 1.0, 0.3).normalize();
        let tilt = ground_alignment(normal, Vec3::NEG_Z, Vec3::X);
        assert!(tilt.pitch > 0.0);
        assert!(tilt.roll.abs() < 1e-6);
    }
}
