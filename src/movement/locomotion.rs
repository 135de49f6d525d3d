//! Movement domain: baseline grounded/aerial mover.
//!
//! Runs last in the tick and only authors the body when no ability has
//! claimed it. Jumps are executed on request from the wall-jump decision.

use bevy::prelude::*;

use crate::movement::arbitration::{AbilityFlags, GroundContact, TickContext};
use crate::movement::body::{
    BodyState, EPSILON, angle_delta, clamp_length, move_towards,
};
use crate::movement::sensor::{EnvironmentSensor, is_ground_normal};
use crate::movement::{MovementStats, MovementTuning, SpeedModifiers};

/// State owned by the Locomotion Core between ticks.
#[derive(Debug, Clone, Default)]
pub struct Locomotion {
    /// Clock time of the last ground or wall jump.
    pub last_jump_at: Option<f32>,
    /// Visual uprighting is suppressed until this time.
    pub upright_lock_until: f32,
    coyote_consumed: bool,
    jumped_this_tick: bool,
}

impl Locomotion {
    /// Refresh `ground` from a fresh downward probe.
    pub fn sense_ground<S: EnvironmentSensor>(
        &mut self,
        ground: &mut GroundContact,
        sensor: &S,
        body: &BodyState,
        tuning: &MovementTuning,
        now: f32,
    ) {
        let hit = sensor.query_ground(body.position);
        let launching = self
            .last_jump_at
            .is_some_and(|jumped| now - jumped < tuning.jump_ground_ignore);
        let grounded =
            hit.grounded && is_ground_normal(hit.normal, tuning.wall_max_normal_y) && !launching;

        let was_grounded = ground.grounded;
        ground.grounded = grounded;
        ground.distance = hit.distance;

        if grounded {
            ground.normal = hit.normal.try_normalize().unwrap_or(Vec3::Y);
            ground.last_grounded_time = now;
            self.coyote_consumed = false;
            if !was_grounded {
                ground.landed_at = now;
                debug!("Landed at t={:.3}", now);
            }
        } else {
            ground.normal = Vec3::Y;
            if was_grounded {
                debug!("Left ground at t={:.3}", now);
            }
        }
    }

    /// Grounded, or airborne for less than the coyote window without
    /// having jumped since.
    pub fn can_jump(&self, ground: &GroundContact, now: f32, tuning: &MovementTuning) -> bool {
        ground.grounded
            || (!self.coyote_consumed && now - ground.last_grounded_time <= tuning.coyote_time)
    }

    /// Execute a normal jump if grounded or inside coyote time.
    /// Consumes the buffered press on success.
    pub fn try_jump(&mut self, ctx: &mut TickContext<'_>) -> bool {
        if !self.can_jump(ctx.ground, ctx.now, ctx.tuning) {
            return false;
        }

        let planar = ctx.body.planar_velocity(Vec3::Y);
        let vertical = ctx.body.vertical_speed(Vec3::Y).max(0.0) + ctx.stats.jump_force;
        ctx.body.set_velocity_parts(planar, Vec3::Y, vertical);

        self.mark_jump(ctx.now);
        ctx.input.jump.consume();
        debug!(
            "Ground jump: grounded={}, t={:.3}, vy={:.2}",
            ctx.ground.grounded, ctx.now, vertical
        );
        true
    }

    /// Record a jump authored elsewhere (wall jump) so this tick's gravity
    /// and the next ground probe leave the launch alone.
    pub fn mark_jump(&mut self, now: f32) {
        self.last_jump_at = Some(now);
        self.coyote_consumed = true;
        self.jumped_this_tick = true;
    }

    pub fn lock_upright(&mut self, until: f32) {
        self.upright_lock_until = self.upright_lock_until.max(until);
    }

    pub fn is_upright_locked(&self, now: f32) -> bool {
        now < self.upright_lock_until
    }

    /// Base movement pass. Early-returns while any ability owns the body.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        let jumped = std::mem::take(&mut self.jumped_this_tick);
        if ctx.flags.claims_body() {
            return;
        }

        let dt = ctx.dt;
        let grounded = ctx.ground.grounded;
        let up = ctx.ground.up();

        // Steering
        let yaw_rate = -ctx.input.steer() * ctx.stats.turn_speed;
        ctx.body.yaw = angle_delta(0.0, ctx.body.yaw + yaw_rate * dt);
        ctx.body.angular_velocity = up * yaw_rate;

        let forward = ctx.body.forward().reject_from(up).normalize_or_zero();
        let mut planar = ctx.body.planar_velocity(up);
        let speed_before = planar.length();
        let mut vertical = ctx.body.vertical_speed(up);

        let cap = speed_cap(ctx.stats, ctx.modifiers, ctx.flags);
        let base_accel = if grounded {
            ctx.stats.ground_accel
        } else {
            ctx.stats.air_accel
        };
        let accel = ctx.modifiers.accel(base_accel);

        let wish = ctx.input.wish_direction(forward);
        if wish.length_squared() > EPSILON {
            planar = move_towards(planar, wish * cap, accel * dt);
        } else if grounded {
            planar = move_towards(planar, Vec3::ZERO, ctx.stats.ground_friction * dt);
        }

        if grounded {
            planar = self.apply_grip(planar, forward, cap, ctx);
        }

        // Cap last so nothing above can push past it.
        planar = ease_to_cap(planar, cap, speed_before, ctx.tuning.over_cap_decel * dt);

        if !jumped {
            vertical = settle_vertical(vertical, grounded, ctx.input.jump_held, ctx.tuning, dt);
        }

        ctx.body.set_velocity_parts(planar, up, vertical);
    }

    fn apply_grip(&self, planar: Vec3, forward: Vec3, cap: f32, ctx: &TickContext<'_>) -> Vec3 {
        if forward.length_squared() < EPSILON {
            return planar;
        }

        let along = forward * planar.dot(forward);
        let side = planar - along;

        let speed_fraction = if cap > EPSILON {
            (planar.length() / cap).min(1.0)
        } else {
            1.0
        };
        let sharpness = (ctx.input.steer().abs() * speed_fraction).clamp(0.0, 1.0);
        let tuning = ctx.tuning;
        let grip = (tuning.grip_max + (tuning.grip_min - tuning.grip_max) * sharpness)
            * grip_fade(ctx.ground, ctx.now, tuning.grip_fade_in);

        along + side * (-grip * ctx.dt).exp()
    }
}

/// Effective planar speed cap: stat block, collaborator modifiers and the
/// dash boost, floored at zero.
pub fn speed_cap(stats: &MovementStats, modifiers: &SpeedModifiers, flags: &AbilityFlags) -> f32 {
    (modifiers.speed_cap(stats.max_speed) * flags.speed_multiplier.max(0.0)).max(0.0)
}

/// Clamp planar speed to `cap`. Speed that was already above the cap at the
/// start of the tick drops by at most `max_drop` instead.
pub fn ease_to_cap(planar: Vec3, cap: f32, speed_before: f32, max_drop: f32) -> Vec3 {
    clamp_length(planar, cap.max(speed_before - max_drop.max(0.0)))
}

/// Traction ramps from 0 to 1 over `fade_in` seconds after landing.
pub fn grip_fade(ground: &GroundContact, now: f32, fade_in: f32) -> f32 {
    if fade_in <= 0.0 {
        1.0
    } else {
        ((now - ground.landed_at) / fade_in).clamp(0.0, 1.0)
    }
}

/// Gravity with fall and low-jump shaping, clamped to terminal velocity.
pub fn shaped_gravity(vertical: f32, jump_held: bool, tuning: &MovementTuning, dt: f32) -> f32 {
    let scale = if vertical < 0.0 {
        tuning.fall_multiplier
    } else if vertical > 0.0 && !jump_held {
        tuning.low_jump_multiplier
    } else {
        1.0
    };
    plain_gravity(vertical, scale, tuning, dt)
}

/// Gravity at a fixed scale, clamped to terminal velocity.
pub fn plain_gravity(vertical: f32, scale: f32, tuning: &MovementTuning, dt: f32) -> f32 {
    (vertical - tuning.gravity * scale * dt).max(-tuning.terminal_velocity)
}

/// Resting bodies keep zero vertical speed; everything else falls.
pub fn settle_vertical(
    vertical: f32,
    grounded: bool,
    jump_held: bool,
    tuning: &MovementTuning,
    dt: f32,
) -> f32 {
    if grounded && vertical <= 0.0 {
        0.0
    } else {
        shaped_gravity(vertical, jump_held, tuning, dt)
    }
}
